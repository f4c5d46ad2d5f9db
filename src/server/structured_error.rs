use std::fmt::Display;

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::logging::get_log_file_path;
use crate::server::error_mapping::ToStructuredError;

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    pub code: String,
}

/// JSON error body.
///
/// `code` repeats the first message's code; `details` are flattened in at
/// the top level (e.g. `conflict`, `restored`).
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: String,
    pub logs: String,
    pub messages: Vec<ErrorMessage>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl StructuredError {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            logs: get_log_file_path().to_string(),
            messages: vec![ErrorMessage {
                message,
                tip: None,
                code: code.to_string(),
            }],
            details: Map::new(),
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        if let Some(msg) = self.messages.first_mut() {
            msg.tip = Some(tip.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }
}

/// An error response: status plus structured body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: StructuredError,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: StructuredError::new(code, message.into()),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        self.body = self.body.with_tip(tip);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        self.body = self.body.with_detail(key, value);
        self
    }
}

impl<E: ToStructuredError + Display> From<E> for ApiError {
    fn from(err: E) -> Self {
        let (code, tip) = err.error_code_and_tip();
        let status = err.status();
        if status.is_server_error() {
            error!(code, "{err}");
        }
        let mut api = ApiError::new(status, code, err.to_string());
        if let Some(tip) = tip {
            api = api.with_tip(tip);
        }
        api
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = self.status.as_u16(), code = %self.body.code, "Request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}
