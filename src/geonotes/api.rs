//! # API Facade
//!
//! [`GeonotesApi`] is the single entry point for embedders (an HTTP layer, a
//! CLI, a test). It is a **thin facade** over `usecases/`:
//!
//! - builds request objects from plain arguments
//! - resolves a session token to a user for operations that need one
//! - dispatches to the use case
//! - passes failure messages through the configured [`Translator`]
//!
//! It holds no business rules; those live in the use case modules and are
//! tested there.
//!
//! ## Generic Over Repository
//!
//! - Production: `GeonotesApi<SnapshotRepository<FsBackend>>`, see [`GeonotesApi::open`]
//! - Testing: `GeonotesApi<SnapshotRepository<MemBackend>>`

use crate::config::AppConfig;
use crate::error::Result;
use crate::events::EventBus;
use crate::geo::{CountryResolver, NearestCapital};
use crate::geojson::NoteGeoJsonFeature;
use crate::i18n::{translate_message, IdentityTranslator, Translator};
use crate::model::{Note, NoteDraft, NotePatch, User, UserRead};
use crate::requests::{
    ActivateUserRequest, AddNoteRequest, AuthenticateRequest, DeleteNoteRequest, LoginRequest,
    LogoutRequest, NoteListRequest, ReadNoteRequest, RegisterRequest, UpdateNoteRequest,
    UpdateOwnUserRequest, UserUpdate,
};
use crate::response::Response;
use crate::security::Hasher;
use crate::store::fs_backend::FsBackend;
use crate::store::{Repository, SnapshotRepository};
use crate::usecases;
use crate::usecases::login::LoginSession;
use serde_json::Value;
use std::sync::Arc;

pub struct GeonotesApi<R: Repository> {
    repo: R,
    bus: EventBus,
    hasher: Hasher,
    geocoder: Box<dyn CountryResolver>,
    translator: Arc<dyn Translator>,
}

fn localize<T>(translator: &dyn Translator, response: Response<T>) -> Response<T> {
    response.map_message(|message| translate_message(translator, message))
}

impl GeonotesApi<SnapshotRepository<FsBackend>> {
    /// File-backed API over the configured data directory.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let data_dir = config.resolve_data_dir()?;
        log::info!("Opening geonotes data at {}", data_dir.display());
        let repo = SnapshotRepository::open(FsBackend::new(data_dir))?;
        Ok(Self::new(repo).with_hasher(Hasher::new(&config.hasher)?))
    }
}

impl<R: Repository> GeonotesApi<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            bus: EventBus::new(),
            hasher: Hasher::default(),
            geocoder: Box::new(NearestCapital),
            translator: Arc::new(IdentityTranslator),
        }
    }

    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_geocoder(mut self, geocoder: impl CountryResolver + 'static) -> Self {
        self.geocoder = Box::new(geocoder);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Subscribe handlers here; see [`crate::notifications`].
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn localize<T>(&self, response: Response<T>) -> Response<T> {
        localize(self.translator.as_ref(), response)
    }

    // Notes

    /// `query` is `{"filters": {...}, "limit": n, "skip": n}`; every key optional.
    pub fn list_notes(&self, query: &Value) -> Response<Vec<Note>> {
        self.localize(usecases::note_list::execute(
            &self.repo,
            NoteListRequest::from_value(query),
        ))
    }

    pub fn list_notes_geojson(&self, query: &Value) -> Response<Vec<NoteGeoJsonFeature>> {
        self.localize(usecases::note_list::execute_geojson(
            &self.repo,
            NoteListRequest::from_value(query),
        ))
    }

    pub fn read_note(&self, code: &str) -> Response<Note> {
        self.localize(usecases::read_note::execute(&self.repo, ReadNoteRequest::build(code)))
    }

    pub fn add_note(&mut self, session: &str, draft: NoteDraft) -> Response<Note> {
        let user = match self.session_user(session) {
            Ok(user) => user,
            Err(failure) => return self.localize(failure),
        };
        let response = usecases::add_note::execute(
            &mut self.repo,
            &self.bus,
            self.geocoder.as_ref(),
            AddNoteRequest::build(draft, Some(user)),
        );
        self.localize(response)
    }

    pub fn update_note(&mut self, session: &str, code: &str, patch: NotePatch) -> Response<Note> {
        let user = match self.session_user(session) {
            Ok(user) => user,
            Err(failure) => return self.localize(failure),
        };
        let response = usecases::update_note::execute(
            &mut self.repo,
            UpdateNoteRequest::build(code, patch, Some(user)),
        );
        self.localize(response)
    }

    pub fn delete_note(&mut self, session: &str, code: &str) -> Response<Note> {
        let user = match self.session_user(session) {
            Ok(user) => user,
            Err(failure) => return self.localize(failure),
        };
        let response =
            usecases::delete_note::execute(&mut self.repo, DeleteNoteRequest::build(code, Some(user)));
        self.localize(response)
    }

    // Users and sessions

    pub fn register(&mut self, email: &str, username: &str, password: &str) -> Response<UserRead> {
        let response = usecases::register::execute(
            &mut self.repo,
            &self.bus,
            &self.hasher,
            RegisterRequest::build(email, username, password),
        );
        self.localize(response)
    }

    pub fn activate_user(&mut self, username: &str, token: &str) -> Response<UserRead> {
        let response = usecases::activate_user::execute(
            &mut self.repo,
            ActivateUserRequest::build(username, token),
        );
        self.localize(response)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Response<LoginSession> {
        let response = usecases::login::execute(
            &mut self.repo,
            &self.hasher,
            LoginRequest::build(username, password),
        );
        self.localize(response)
    }

    pub fn logout(&mut self, session: &str) -> Response<()> {
        let response = usecases::logout::execute(&mut self.repo, LogoutRequest::build(session));
        self.localize(response)
    }

    pub fn authenticate(&mut self, session: &str) -> Response<User> {
        let response =
            usecases::authenticate::execute(&mut self.repo, AuthenticateRequest::build(session));
        self.localize(response)
    }

    /// Public view of the session's user.
    pub fn current_user(&mut self, session: &str) -> Response<UserRead> {
        self.authenticate(session).map(|user| UserRead::from(&user))
    }

    pub fn update_own_user(&mut self, session: &str, update: UserUpdate) -> Response<UserRead> {
        let user = match self.session_user(session) {
            Ok(user) => user,
            Err(failure) => return self.localize(failure),
        };
        let response = usecases::update_own_user::execute(
            &mut self.repo,
            UpdateOwnUserRequest::build(update, Some(user)),
        );
        self.localize(response)
    }

    /// Authenticated user, or the authentication failure re-typed for the caller.
    fn session_user<T>(&mut self, session: &str) -> std::result::Result<User, Response<T>> {
        usecases::authenticate::execute(&mut self.repo, AuthenticateRequest::build(session))
            .into_result()
            .map_err(Response::from)
    }
}
