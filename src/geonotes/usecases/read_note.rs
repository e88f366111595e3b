use super::guard;
use crate::model::Note;
use crate::requests::{ReadNoteRequest, RequestObject};
use crate::response::{Response, ResponseFailure};
use crate::store::Repository;

pub(crate) fn not_found(code: &str) -> ResponseFailure {
    ResponseFailure::resource_error(format!("note with code '{}' not found", code))
}

pub fn execute<R: Repository>(repo: &R, request: RequestObject<ReadNoteRequest>) -> Response<Note> {
    guard(request, |request| {
        Ok(match repo.get_by_code(&request.code)? {
            Some(note) => Response::success(note),
            None => not_found(&request.code).into(),
        })
    })
}
