use super::{InvalidRequest, RequestObject};
use crate::model::User;
use crate::response::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&’*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("email pattern is valid")
});

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w[\w.]{0,29}$").expect("username pattern is valid"));

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 1 to 30 word characters or dots, starting with a word character, with no
/// `..` run and no trailing dot.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username) && !username.contains("..") && !username.ends_with('.')
}

fn check_username(username: &str) -> Result<(), InvalidRequest> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(InvalidRequest::single(
            "username",
            "Invalid username",
            StatusCode::InvalidUsername,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Email, then username, then password; stops at the first failure.
    pub fn build(email: &str, username: &str, password: &str) -> RequestObject<Self> {
        if !is_valid_email(email) {
            return Err(InvalidRequest::single(
                "email",
                "Invalid email",
                StatusCode::InvalidEmail,
            ));
        }
        check_username(username)?;
        if password.is_empty() {
            return Err(InvalidRequest::single(
                "password",
                "Password can not be empty",
                StatusCode::InvalidPassword,
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InvalidRequest::single(
                "password",
                format!("minimum password length must be {} characters", MIN_PASSWORD_LEN),
                StatusCode::InvalidPassword,
            ));
        }
        Ok(Self {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn build(username: &str, password: &str) -> RequestObject<Self> {
        if username.is_empty() || password.is_empty() {
            return Err(InvalidRequest::single(
                "credentials",
                "Wrong username or password",
                StatusCode::InvalidUsernameOrPassword,
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Logging out an unknown or empty session is a no-op, so this never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutRequest {
    pub session: String,
}

impl LogoutRequest {
    pub fn build(session: &str) -> RequestObject<Self> {
        Ok(Self {
            session: session.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateUserRequest {
    pub username: String,
    pub token: String,
}

impl ActivateUserRequest {
    pub fn build(username: &str, token: &str) -> RequestObject<Self> {
        if username.is_empty() {
            return Err(InvalidRequest::single(
                "username",
                "Username can not be empty",
                StatusCode::Failure,
            ));
        }
        if token.is_empty() {
            return Err(InvalidRequest::single(
                "token",
                "Token can not be empty",
                StatusCode::InvalidActivationToken,
            ));
        }
        Ok(Self {
            username: username.to_string(),
            token: token.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateRequest {
    pub session: String,
}

impl AuthenticateRequest {
    pub fn build(session: &str) -> RequestObject<Self> {
        if session.is_empty() {
            return Err(InvalidRequest::single(
                "session",
                "Invalid session",
                StatusCode::InvalidSession,
            ));
        }
        Ok(Self {
            session: session.to_string(),
        })
    }
}

/// Fields a user may change on their own account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOwnUserRequest {
    pub update: UserUpdate,
    pub user: User,
}

impl UpdateOwnUserRequest {
    pub fn build(update: UserUpdate, user: Option<User>) -> RequestObject<Self> {
        if let Some(username) = &update.username {
            check_username(username)?;
        }
        let Some(user) = user else {
            return Err(InvalidRequest::single("user", "Invalid user", StatusCode::Failure));
        };
        Ok(Self { update, user })
    }
}
