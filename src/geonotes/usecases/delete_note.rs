use super::guard;
use super::read_note::not_found;
use super::update_note::permission_denied;
use crate::model::Note;
use crate::requests::{DeleteNoteRequest, RequestObject};
use crate::response::Response;
use crate::store::Repository;

/// Deletes a note the user owns and returns it.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<DeleteNoteRequest>) -> Response<Note> {
    guard(request, |request| {
        let Some(note) = repo.get_by_code(&request.code)? else {
            return Ok(not_found(&request.code).into());
        };
        if !note.is_owned_by(&request.user) {
            return Ok(permission_denied().into());
        }

        let deleted = repo.delete_by_code(&note.code)?.unwrap_or(note);
        log::info!("Note {} deleted by {}", deleted.code, request.user.username);
        Ok(Response::success(deleted))
    })
}
