//! # Use Cases
//!
//! One module per operation, each exposing an `execute` function generic over
//! [`Repository`](crate::store::Repository). A use case takes a
//! [`RequestObject`], does its repository work, publishes events where
//! relevant, and always answers with a [`Response`]:
//!
//! - an invalid request becomes a parameters failure without touching storage
//! - any [`GeonotesError`] raised by the body becomes a system failure
//!
//! Bodies are written with `?` against [`crate::error::Result`]; the
//! [`guard`] wrapper does the conversion so no error crosses the boundary.

use crate::error::{GeonotesError, Result};
use crate::requests::RequestObject;
use crate::response::Response;

pub mod activate_user;
pub mod add_note;
pub mod authenticate;
pub mod delete_note;
pub mod login;
pub mod logout;
pub mod note_list;
pub mod read_note;
pub mod register;
pub mod update_note;
pub mod update_own_user;

/// Runs `body` on a valid request and folds every outcome into a [`Response`].
pub(crate) fn guard<Q, T>(
    request: RequestObject<Q>,
    body: impl FnOnce(Q) -> Result<Response<T>>,
) -> Response<T> {
    let request = match request {
        Ok(request) => request,
        Err(invalid) => return Response::from_invalid_request(&invalid),
    };
    match body(request) {
        Ok(response) => response,
        Err(err) => system_failure(&err),
    }
}

fn system_failure<T>(err: &GeonotesError) -> Response<T> {
    log::error!("Use case failed: {}", err);
    Response::from_error(err)
}
