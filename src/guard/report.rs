/// Sink for conditions that degrade the guard without failing the login flow.
pub trait ErrorReporter {
    fn report_warning(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ErrorReporter for RecordingReporter {
    fn report_warning(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
