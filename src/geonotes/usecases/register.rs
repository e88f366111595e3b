use super::guard;
use crate::error::Result;
use crate::events::{Event, EventBus, Registration};
use crate::model::{Session, User, UserRead};
use crate::requests::{RegisterRequest, RequestObject};
use crate::response::{Response, ResponseFailure, StatusCode};
use crate::security::{generate_activation_token, Hasher};
use crate::store::Repository;
use chrono::{Duration, Utc};

pub const ACTIVATION_VALIDITY_DAYS: i64 = 2;

/// Creates an inactive user plus a one-time activation session, then
/// publishes `user_registered` with the activation token.
///
/// If anything fails after the user row exists, the user is deleted again
/// before the system failure is returned.
pub fn execute<R: Repository>(
    repo: &mut R,
    bus: &EventBus,
    hasher: &Hasher,
    request: RequestObject<RegisterRequest>,
) -> Response<UserRead> {
    guard(request, |request| {
        if repo.get_user_by_username(&request.username)?.is_some() {
            return Ok(ResponseFailure::resource_error("User with this username already exists")
                .with_code(StatusCode::UserExists)
                .into());
        }
        if repo.get_user_by_email(&request.email)?.is_some() {
            return Ok(ResponseFailure::resource_error("User with this email already exists")
                .with_code(StatusCode::UserExists)
                .into());
        }

        let password = hasher.hash_password(&request.password)?;
        let created = repo.create_user(&User::new(&request.email, &request.username, password))?;

        match start_activation(repo, &created) {
            Ok(activation_token) => {
                log::info!("Registered user {}", created.username);
                bus.publish(&Event::UserRegistered(Registration {
                    email: created.email.clone(),
                    username: created.username.clone(),
                    activation_token,
                }));
                Ok(Response::success(UserRead::from(&created)))
            }
            Err(err) => {
                if let Err(rollback) = repo.delete_user(&created.email) {
                    log::error!(
                        "Could not roll back half-registered user {}: {}",
                        created.username,
                        rollback
                    );
                }
                Err(err)
            }
        }
    })
}

fn start_activation<R: Repository>(repo: &mut R, user: &User) -> Result<String> {
    let token = generate_activation_token();
    let expire_time = Utc::now() + Duration::days(ACTIVATION_VALIDITY_DAYS);
    repo.create_session(&Session::new(&token, &user.email, expire_time))?;
    Ok(token)
}
