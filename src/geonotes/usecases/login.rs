use super::guard;
use crate::requests::{LoginRequest, RequestObject};
use crate::response::{Response, ResponseFailure, StatusCode};
use crate::security::{new_session_id, Hasher};
use crate::store::Repository;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_VALIDITY_DAYS: i64 = 1;

/// Cookie-style expiry format, always rendered in UTC.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    pub session: String,
    pub expire_time: DateTime<Utc>,
    /// `expire_time` as an HTTP date, ready for a `Set-Cookie` header.
    pub expires: String,
}

fn wrong_credentials() -> ResponseFailure {
    ResponseFailure::parameters_error("Wrong username or password")
        .with_code(StatusCode::InvalidUsernameOrPassword)
}

/// Verifies credentials and upserts the user's single login session.
///
/// An unknown user and a wrong password answer identically.
pub fn execute<R: Repository>(
    repo: &mut R,
    hasher: &Hasher,
    request: RequestObject<LoginRequest>,
) -> Response<LoginSession> {
    guard(request, |request| {
        let Some(user) = repo.get_user_by_username(&request.username)? else {
            return Ok(wrong_credentials().into());
        };
        if !user.is_active {
            return Ok(ResponseFailure::parameters_error("User is not active")
                .with_code(StatusCode::InactiveUser)
                .into());
        }
        if !hasher.verify_password(&request.password, &user.password) {
            return Ok(wrong_credentials().into());
        }

        let expire_time = Utc::now() + Duration::days(SESSION_VALIDITY_DAYS);
        let session = repo.create_or_update_session(&user.email, &new_session_id(), expire_time)?;
        log::info!("User {} logged in", user.username);

        Ok(Response::success(LoginSession {
            expires: session.expire_time.format(HTTP_DATE_FORMAT).to_string(),
            session: session.session_id,
            expire_time: session.expire_time,
        }))
    })
}
