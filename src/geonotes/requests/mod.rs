//! # Request Objects
//!
//! Request objects turn untrusted input into typed commands. Each request type
//! has a `build`/`from_value` factory that only validates and never touches
//! the repository. The result is a [`RequestObject`]: `Ok` with the typed
//! request, or `Err` with an [`InvalidRequest`] listing field errors.
//!
//! Use cases guard on it first and turn an invalid request straight into a
//! parameters failure.

use crate::response::StatusCode;

pub mod notes;
pub mod users;

pub use notes::{AddNoteRequest, DeleteNoteRequest, NoteListRequest, ReadNoteRequest, UpdateNoteRequest};
pub use users::{
    ActivateUserRequest, AuthenticateRequest, LoginRequest, LogoutRequest, RegisterRequest,
    UpdateOwnUserRequest, UserUpdate,
};

/// A validated request, or the reasons it is invalid.
pub type RequestObject<T> = Result<T, InvalidRequest>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub parameter: String,
    pub message: String,
    pub code: StatusCode,
}

/// Ordered field errors of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvalidRequest {
    errors: Vec<RequestError>,
}

impl InvalidRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a request rejected by a single error.
    pub fn single(parameter: &str, message: impl Into<String>, code: StatusCode) -> Self {
        let mut invalid = Self::new();
        invalid.add_error(parameter, message, code);
        invalid
    }

    pub fn add_error(&mut self, parameter: &str, message: impl Into<String>, code: StatusCode) {
        self.errors.push(RequestError {
            parameter: parameter.to_string(),
            message: message.into(),
            code,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RequestError] {
        &self.errors
    }

    /// Overall code: the first error's code, or the generic failure code.
    pub fn error_code(&self) -> StatusCode {
        self.errors
            .first()
            .map(|e| e.code)
            .unwrap_or(StatusCode::Failure)
    }

    /// `Err(self)` if any error was recorded, `Ok(value)` otherwise.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> RequestObject<T> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(value())
        }
    }
}
