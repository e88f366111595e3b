use super::guard;
use crate::events::{Event, EventBus};
use crate::geo::CountryResolver;
use crate::model::Note;
use crate::requests::{AddNoteRequest, RequestObject};
use crate::response::{Response, ResponseFailure};
use crate::store::Repository;

/// Stores a new note owned by the requesting user and announces it.
///
/// Country and tags are derived here, once; later reads and updates never
/// recompute them.
pub fn execute<R: Repository>(
    repo: &mut R,
    bus: &EventBus,
    resolver: &dyn CountryResolver,
    request: RequestObject<AddNoteRequest>,
) -> Response<Note> {
    guard(request, |request| {
        let AddNoteRequest { note: draft, user } = request;

        let mut note = Note::from_draft(draft, resolver);
        note.creator = Some(user.username.clone());
        note.creator_id = Some(user.email.clone());

        if repo.get_by_code(&note.code)?.is_some() {
            return Ok(ResponseFailure::resource_error(format!(
                "note with code '{}' already exists",
                note.code
            ))
            .into());
        }

        repo.add(&note)?;
        log::info!("Note {} added by {}", note.code, user.username);

        bus.publish(&Event::NoteAdded(note.clone()));
        Ok(Response::success(note))
    })
}
