//! # Response Taxonomy
//!
//! Every use case returns a [`Response`]: either a success carrying a value,
//! or a [`ResponseFailure`] carrying a [`FailureKind`], a [`StatusCode`] and a
//! human message. Callers branch on this shape only.
//!
//! | Kind         | Used for                                                  |
//! |--------------|-----------------------------------------------------------|
//! | `Resource`   | entity absent, or a uniqueness conflict                   |
//! | `Parameters` | invalid input, policy violations, stale or bad sessions   |
//! | `System`     | unexpected errors, message is `"<error kind>: <detail>"`  |

use crate::error::GeonotesError;
use crate::requests::InvalidRequest;
use serde::{Deserialize, Serialize};

/// Machine-readable reason codes. `Failure` is the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    Success,
    #[default]
    Failure,
    InvalidUsernameOrPassword,
    InvalidActivationToken,
    InvalidSession,
    ExpiredSession,
    InactiveUser,
    InvalidEmail,
    InvalidPassword,
    UserExists,
    InvalidUsername,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    #[serde(rename = "ResourceError")]
    Resource,
    #[serde(rename = "ParametersError")]
    Parameters,
    #[serde(rename = "SystemError")]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFailure {
    #[serde(rename = "type")]
    pub kind: FailureKind,
    pub code: StatusCode,
    pub message: String,
}

impl ResponseFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: StatusCode::Failure,
            message: message.into(),
        }
    }

    pub fn resource_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Resource, message)
    }

    pub fn parameters_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parameters, message)
    }

    pub fn system_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::System, message)
    }

    pub fn with_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    /// One `parameter: message` line per error, coded with the first error's code.
    pub fn from_invalid_request(invalid: &InvalidRequest) -> Self {
        let message = invalid
            .errors()
            .iter()
            .map(|e| format!("{}: {}", e.parameter, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self::parameters_error(message).with_code(invalid.error_code())
    }

    pub fn from_error(err: &GeonotesError) -> Self {
        Self::system_error(format!("{}: {}", err.kind(), err.detail()))
    }
}

/// Outcome of a use case.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<T> {
    Success { value: T, code: StatusCode },
    Failure(ResponseFailure),
}

impl<T> Response<T> {
    pub fn success(value: T) -> Self {
        Response::Success {
            value,
            code: StatusCode::Success,
        }
    }

    pub fn from_invalid_request(invalid: &InvalidRequest) -> Self {
        Response::Failure(ResponseFailure::from_invalid_request(invalid))
    }

    pub fn from_error(err: &GeonotesError) -> Self {
        Response::Failure(ResponseFailure::from_error(err))
    }

    /// `true` for the success variant; the "truthiness" of a response.
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn code(&self) -> StatusCode {
        match self {
            Response::Success { code, .. } => *code,
            Response::Failure(failure) => failure.code,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Response::Success { value, .. } => Some(value),
            Response::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ResponseFailure> {
        match self {
            Response::Success { .. } => None,
            Response::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<T, ResponseFailure> {
        match self {
            Response::Success { value, .. } => Ok(value),
            Response::Failure(failure) => Err(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        match self {
            Response::Success { value, code } => Response::Success {
                value: f(value),
                code,
            },
            Response::Failure(failure) => Response::Failure(failure),
        }
    }

    /// Rewrites the failure message, e.g. to localize it.
    pub fn map_message(self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            Response::Failure(mut failure) => {
                failure.message = f(&failure.message);
                Response::Failure(failure)
            }
            success => success,
        }
    }
}

impl<T> From<ResponseFailure> for Response<T> {
    fn from(failure: ResponseFailure) -> Self {
        Response::Failure(failure)
    }
}
