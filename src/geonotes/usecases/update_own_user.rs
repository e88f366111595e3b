use super::guard;
use crate::model::{UserPatch, UserRead};
use crate::requests::{RequestObject, UpdateOwnUserRequest};
use crate::response::{Response, ResponseFailure, StatusCode};
use crate::store::Repository;

/// Renames the requesting user. A name held by someone else is refused;
/// keeping one's own name is a no-op success.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<UpdateOwnUserRequest>) -> Response<UserRead> {
    guard(request, |request| {
        let UpdateOwnUserRequest { update, user } = request;

        if let Some(username) = &update.username {
            if let Some(holder) = repo.get_user_by_username(username)? {
                if holder.email != user.email {
                    return Ok(ResponseFailure::resource_error(format!(
                        "user with username '{}' already exists",
                        username
                    ))
                    .with_code(StatusCode::UserExists)
                    .into());
                }
            }
        }

        let patch = UserPatch {
            username: update.username,
            ..UserPatch::default()
        };
        let updated = if patch == UserPatch::default() {
            user
        } else {
            repo.update_user(&user, &patch)?
        };
        Ok(Response::success(UserRead::from(&updated)))
    })
}
