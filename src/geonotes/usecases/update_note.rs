use super::guard;
use super::read_note::not_found;
use crate::model::Note;
use crate::requests::{RequestObject, UpdateNoteRequest};
use crate::response::{Response, ResponseFailure};
use crate::store::Repository;

pub(crate) fn permission_denied() -> ResponseFailure {
    ResponseFailure::parameters_error("permission denied")
}

/// Applies the present fields of the patch to a note the user owns.
///
/// Existence is checked before ownership, and ownership before any write.
pub fn execute<R: Repository>(repo: &mut R, request: RequestObject<UpdateNoteRequest>) -> Response<Note> {
    guard(request, |request| {
        let Some(note) = repo.get_by_code(&request.code)? else {
            return Ok(not_found(&request.code).into());
        };
        if !note.is_owned_by(&request.user) {
            return Ok(permission_denied().into());
        }
        if request.note.is_empty() {
            return Ok(Response::success(note));
        }

        let updated = repo.update(&note, &request.note)?;
        Ok(Response::success(updated))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotePatch;
    use crate::response::FailureKind;
    use crate::test_utils::{mem_repo, owned_note, stored_user};

    fn url_patch(url: &str) -> NotePatch {
        NotePatch {
            url: Some(url.to_string()),
            ..NotePatch::default()
        }
    }

    #[test]
    fn owner_updates_only_present_fields() {
        let mut repo = mem_repo();
        let owner = stored_user(&mut repo, "a@a.com", "bob", true);
        let note = owned_note(&mut repo, &owner, "https://a.com");

        let response = execute(
            &mut repo,
            UpdateNoteRequest::build(&note.code, url_patch("https://c.com"), Some(owner)),
        );

        let updated = response.into_result().unwrap();
        assert_eq!(updated.url, "https://c.com");
        assert_eq!(updated.text, note.text);
        assert_eq!(updated.tags, note.tags);
        assert_eq!(updated.created, note.created);
    }

    #[test]
    fn other_user_is_denied_and_nothing_changes() {
        let mut repo = mem_repo();
        let owner = stored_user(&mut repo, "a@a.com", "bob", true);
        let intruder = stored_user(&mut repo, "b@b.com", "eve", true);
        let note = owned_note(&mut repo, &owner, "https://a.com");
        let writes = repo.backend().write_count();

        let response = execute(
            &mut repo,
            UpdateNoteRequest::build(&note.code, url_patch("https://evil.com"), Some(intruder)),
        );

        let failure = response.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Parameters);
        assert_eq!(failure.message, "permission denied");
        assert_eq!(repo.get_by_code(&note.code).unwrap(), Some(note));
        assert_eq!(repo.backend().write_count(), writes);
    }

    #[test]
    fn missing_note_is_checked_before_ownership() {
        let mut repo = mem_repo();
        let user = stored_user(&mut repo, "a@a.com", "bob", true);

        let response = execute(
            &mut repo,
            UpdateNoteRequest::build("ghost", url_patch("https://c.com"), Some(user)),
        );
        assert_eq!(response.failure().unwrap().kind, FailureKind::Resource);
    }

    #[test]
    fn invalid_patch_is_rejected_before_lookup() {
        let mut repo = mem_repo();
        let user = stored_user(&mut repo, "a@a.com", "bob", true);

        let response = execute(
            &mut repo,
            UpdateNoteRequest::build("ghost", url_patch("not a url"), Some(user)),
        );
        assert_eq!(response.failure().unwrap().kind, FailureKind::Parameters);
    }
}
