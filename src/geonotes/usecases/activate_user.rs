use super::guard;
use crate::model::{UserPatch, UserRead};
use crate::requests::{ActivateUserRequest, RequestObject};
use crate::response::{Response, ResponseFailure, StatusCode};
use crate::store::Repository;
use chrono::Utc;

fn invalid_token() -> ResponseFailure {
    ResponseFailure::parameters_error("Invalid activation token")
        .with_code(StatusCode::InvalidActivationToken)
}

/// Consumes a one-time activation token and marks its owner active.
///
/// The token must belong to the named user. An expired token is deleted
/// when seen and rejected like an unknown one.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<ActivateUserRequest>) -> Response<UserRead> {
    guard(request, |request| {
        let Some(user) = repo.get_user_by_username(&request.username)? else {
            return Ok(invalid_token().into());
        };
        let Some(session) = repo.get_session_by_session_id_and_email(&request.token, &user.email)? else {
            return Ok(invalid_token().into());
        };
        if session.is_expired_at(Utc::now()) {
            repo.delete_session_by_session_id(&session.session_id)?;
            return Ok(invalid_token().into());
        }
        if user.is_active {
            return Ok(ResponseFailure::parameters_error("User is already activated").into());
        }

        let activated = repo.update_user(&user, &UserPatch::activate())?;
        repo.delete_session_by_session_id(&session.session_id)?;
        log::info!("User {} activated", activated.username);

        Ok(Response::success(UserRead::from(&activated)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Session;
    use crate::response::FailureKind;
    use crate::test_utils::{mem_repo, stored_user};
    use chrono::Duration;

    fn with_token<R: Repository>(repo: &mut R, email: &str, token: &str, valid_for: Duration) {
        repo.create_session(&Session::new(token, email, Utc::now() + valid_for))
            .unwrap();
    }

    #[test]
    fn activates_and_consumes_token() {
        let mut repo = mem_repo();
        stored_user(&mut repo, "a@a.com", "bob", false);
        with_token(&mut repo, "a@a.com", "tok", Duration::days(2));

        let response = execute(&mut repo, ActivateUserRequest::build("bob", "tok"));

        assert_eq!(
            response.value(),
            Some(&UserRead {
                username: "bob".to_string(),
                is_active: true
            })
        );
        assert!(repo.get_user_by_username("bob").unwrap().unwrap().is_active);
        assert!(repo.get_session_by_session_id("tok").unwrap().is_none());
    }

    #[test]
    fn token_of_another_user_is_invalid() {
        let mut repo = mem_repo();
        stored_user(&mut repo, "a@a.com", "bob", false);
        stored_user(&mut repo, "b@b.com", "eve", false);
        with_token(&mut repo, "b@b.com", "eve-token", Duration::days(2));

        let response = execute(&mut repo, ActivateUserRequest::build("bob", "eve-token"));

        let failure = response.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Parameters);
        assert_eq!(failure.code, StatusCode::InvalidActivationToken);
        assert!(repo.get_session_by_session_id("eve-token").unwrap().is_some());
    }

    #[test]
    fn unknown_user_is_invalid_token() {
        let mut repo = mem_repo();
        let response = execute(&mut repo, ActivateUserRequest::build("ghost", "tok"));
        assert_eq!(response.code(), StatusCode::InvalidActivationToken);
    }

    #[test]
    fn expired_token_is_deleted_and_rejected() {
        let mut repo = mem_repo();
        stored_user(&mut repo, "a@a.com", "bob", false);
        with_token(&mut repo, "a@a.com", "old", -Duration::minutes(1));

        let response = execute(&mut repo, ActivateUserRequest::build("bob", "old"));

        assert_eq!(response.code(), StatusCode::InvalidActivationToken);
        assert!(repo.get_session_by_session_id("old").unwrap().is_none());
        assert!(!repo.get_user_by_username("bob").unwrap().unwrap().is_active);
    }

    #[test]
    fn already_active_is_a_distinct_failure() {
        let mut repo = mem_repo();
        stored_user(&mut repo, "a@a.com", "bob", true);
        with_token(&mut repo, "a@a.com", "tok", Duration::days(2));

        let response = execute(&mut repo, ActivateUserRequest::build("bob", "tok"));

        let failure = response.failure().unwrap();
        assert_eq!(failure.message, "User is already activated");
        assert_eq!(failure.code, StatusCode::Failure);
    }
}
