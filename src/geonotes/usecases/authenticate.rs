use super::guard;
use crate::model::User;
use crate::requests::{AuthenticateRequest, RequestObject};
use crate::response::{Response, ResponseFailure, StatusCode};
use crate::store::Repository;
use chrono::Utc;

/// Resolves a session token to its user.
///
/// Transitions are checked in a fixed order:
///
/// 1. session lookup, else `Session not found`
/// 2. owner lookup, else `User not found`
/// 3. active flag, else `User is not active`
/// 4. expiry, else the session is deleted and `Session expired`
///
/// An inactive owner is reported even when the session is also expired; the
/// session is then left in place.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<AuthenticateRequest>) -> Response<User> {
    guard(request, |request| {
        let Some(session) = repo.get_session_by_session_id(&request.session)? else {
            return Ok(ResponseFailure::resource_error("Session not found")
                .with_code(StatusCode::InvalidSession)
                .into());
        };
        let Some(user) = repo.get_user_by_email(&session.email)? else {
            return Ok(ResponseFailure::resource_error("User not found").into());
        };
        if !user.is_active {
            return Ok(ResponseFailure::parameters_error("User is not active")
                .with_code(StatusCode::InactiveUser)
                .into());
        }
        if session.is_expired_at(Utc::now()) {
            repo.delete_session_by_session_id(&session.session_id)?;
            return Ok(ResponseFailure::parameters_error("Session expired")
                .with_code(StatusCode::ExpiredSession)
                .into());
        }
        Ok(Response::success(user))
    })
}
