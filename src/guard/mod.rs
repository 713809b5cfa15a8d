pub mod clock;
pub mod login;
pub mod policy;
pub mod report;
pub mod state;
pub mod status;

pub use clock::SystemClock;
pub use login::LoginAttemptGuard;
pub use policy::LockoutPolicy;
pub use report::TracingReporter;
pub use status::Status;
