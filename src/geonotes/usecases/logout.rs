use super::guard;
use crate::requests::{LogoutRequest, RequestObject};
use crate::response::Response;
use crate::store::Repository;

/// Deletes the session if it exists. Unknown sessions succeed too.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<LogoutRequest>) -> Response<()> {
    guard(request, |request| {
        if !request.session.is_empty() && repo.delete_session_by_session_id(&request.session)?.is_some() {
            log::info!("Session closed");
        }
        Ok(Response::success(()))
    })
}
