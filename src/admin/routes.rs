use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::admin::auth::{AuthOutcome, Credentials};
use crate::admin::messages::status_message;
use crate::error::AppError;
use crate::guard::Status;
use crate::guard::status::ceil_secs_of;
use crate::state::AppState;

// Templates

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
    username: String,
    retry_after_secs: u64,
    allow_reset: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    username: String,
}

// Form structs

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct AccountQuery {
    username: String,
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.into()))
}

fn login_response(state: &AppState, username: &str, status: Status) -> Result<Response, AppError> {
    let code = if status.is_locked() {
        StatusCode::TOO_MANY_REQUESTS
    } else {
        StatusCode::UNAUTHORIZED
    };
    let retry_after_secs = status.retry_after().map(ceil_secs_of).unwrap_or(0);

    let html = render(&LoginTemplate {
        error: status_message(&status),
        username: username.to_string(),
        retry_after_secs,
        allow_reset: state.allow_reset,
    })?;

    let mut response = (code, html).into_response();
    if status.is_locked() {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
    }
    Ok(response)
}

// Handlers

pub async fn login_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render(&LoginTemplate {
        error: None,
        username: String::new(),
        retry_after_secs: 0,
        allow_reset: state.allow_reset,
    })
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let _serial = state.guard_serial.lock().await;
    let guard = state.login_guard(&form.username);

    // Refuse before looking at the credentials at all
    let status = guard.check_status();
    if status.is_locked() {
        tracing::info!(username = %form.username, "login attempt refused while locked");
        return login_response(&state, &form.username, status);
    }

    let credentials = Credentials {
        username: form.username,
        password: form.password,
    };
    match state.authenticator.authenticate(&credentials) {
        AuthOutcome::Success => {
            guard.record_success();
            tracing::info!(username = %credentials.username, "admin login succeeded");
            let html = render(&DashboardTemplate {
                username: credentials.username,
            })?;
            Ok(html.into_response())
        }
        AuthOutcome::Failure(reason) => {
            tracing::debug!(username = %credentials.username, %reason, "admin login rejected");
            let status = guard.record_failure();
            login_response(&state, &credentials.username, status)
        }
    }
}

/// Polled by the login page to drive the lockout countdown.
pub async fn login_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Status>, AppError> {
    if query.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".into()));
    }
    let _serial = state.guard_serial.lock().await;
    Ok(Json(state.login_guard(&query.username).check_status()))
}

pub async fn login_reset(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AccountQuery>,
) -> Result<Redirect, AppError> {
    if !state.allow_reset {
        return Err(AppError::NotFound);
    }
    let _serial = state.guard_serial.lock().await;
    state.login_guard(&form.username).reset();
    Ok(Redirect::to("/admin/login"))
}
