use super::guard;
use crate::geojson::{notes_to_features, NoteGeoJsonFeature};
use crate::model::Note;
use crate::requests::{NoteListRequest, RequestObject};
use crate::response::Response;
use crate::store::Repository;

pub fn execute<R: Repository>(repo: &R, request: RequestObject<NoteListRequest>) -> Response<Vec<Note>> {
    guard(request, |request| {
        let notes = repo.list(&request.filters, request.limit, request.skip)?;
        Ok(Response::success(notes))
    })
}

/// Same listing, projected to GeoJSON features.
pub fn execute_geojson<R: Repository>(
    repo: &R,
    request: RequestObject<NoteListRequest>,
) -> Response<Vec<NoteGeoJsonFeature>> {
    execute(repo, request).map(|notes| notes_to_features(&notes))
}
