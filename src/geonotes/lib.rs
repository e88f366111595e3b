//! # Geonotes Architecture
//!
//! Geonotes is a **transport-agnostic backend library** for geolocated notes:
//! short notes pinned to a latitude/longitude, owned by registered users who
//! authenticate with expiring sessions. It ships no HTTP server and no CLI;
//! those are thin clients of [`api::GeonotesApi`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Builds request objects from plain arguments              │
//! │  - Resolves session tokens, localizes failure messages      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Request Objects (requests/)                                │
//! │  - Validation only, never I/O                               │
//! │  - Valid typed request, or an ordered list of field errors  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Use Cases (usecases/*.rs)                                  │
//! │  - Business rules, ownership, the session state machine     │
//! │  - Always answer with a Response, never an error            │
//! │  - Publish side effects on the EventBus                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract Repository trait                                │
//! │  - SnapshotRepository over FsBackend (db.json) / MemBackend │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcomes
//!
//! Every operation returns a [`response::Response`]. Callers branch on
//! success versus failure, and on a failure's kind (resource, parameters,
//! system) and [`response::StatusCode`]. Nothing panics or returns `Err`
//! across the use case boundary.
//!
//! ## Side Effects
//!
//! Mail and channel announcements are not performed by use cases. They
//! publish [`events::Event`]s; handlers from [`notifications`] subscribe to
//! the bus and call out through the [`notifications::Mailer`] and
//! [`notifications::ChannelNotifier`] traits.
//!
//! ## Testing Strategy
//!
//! 1. **Use cases**: thorough unit tests against `MemBackend`, including
//!    injected write failures. This is where most tests live.
//! 2. **Request objects**: validation rules and error ordering.
//! 3. **API**: dispatch, session resolution and translation.
//! 4. **Integration** (`tests/`): file persistence and the full
//!    register, activate, login, authenticate flow.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`usecases`]: Business logic for each operation
//! - [`requests`]: Request objects and validation
//! - [`response`]: Success/failure outcome types and status codes
//! - [`store`]: Repository abstraction and implementations
//! - [`model`]: Core data types (`Note`, `User`, `Session`) and patches
//! - [`events`]: In-process event bus
//! - [`notifications`]: Activation mail and new-note announcements
//! - [`geo`], [`tags`], [`geojson`]: Derived note fields and map output
//! - [`security`]: Password hashing and token generation
//! - [`i18n`]: Translation hook
//! - [`config`], [`logging`], [`error`]: Configuration, log files, error types

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod geo;
pub mod geojson;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod notifications;
pub mod requests;
pub mod response;
pub mod security;
pub mod store;
pub mod tags;
pub mod usecases;

#[cfg(test)]
mod test_utils;

pub use api::GeonotesApi;
pub use error::{GeonotesError, Result};
pub use response::{FailureKind, Response, ResponseFailure, StatusCode};

/// Opens the file-backed API described by `config`.
pub fn open(config: &config::AppConfig) -> Result<GeonotesApi<store::SnapshotRepository<store::fs_backend::FsBackend>>> {
    GeonotesApi::open(config)
}
