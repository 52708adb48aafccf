//! One-call-per-operation facade over `PlaylistClient` and a `Transport`.
//!
//! Each method builds its request, performs exactly one round trip, and
//! parses the response. Nothing is retried and nothing is cached.

use tracing::{debug, warn};

use crate::client::PlaylistClient;
use crate::config::ApiConfig;
use crate::credential::CredentialProvider;
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{DeleteAck, NewPlaylist, Playlist, Song};

/// Playlist API bound to a base URL and a transport.
///
/// Holds no mutable state; share it across threads freely.
#[derive(Debug, Clone)]
pub struct PlaylistApi<T = UreqTransport> {
    client: PlaylistClient,
    transport: T,
}

impl PlaylistApi<UreqTransport> {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config.timeout))
    }

    /// Configure from `PLAYLIST_API_BASE_URL` / `PLAYLIST_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::new(&ApiConfig::from_env())
    }
}

impl<T: Transport> PlaylistApi<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PlaylistClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PlaylistClient {
        &self.client
    }

    pub fn create(&self, input: &NewPlaylist) -> Result<Playlist, ApiError> {
        let request = self.client.build_create(input)?;
        self.client.parse_create(self.round_trip(Operation::Create, request)?)
    }

    pub fn list(&self, credential: &impl CredentialProvider) -> Result<Vec<Playlist>, ApiError> {
        let token = resolve_token(Operation::List, credential);
        let request = self.client.build_list(&token);
        self.client.parse_list(self.round_trip(Operation::List, request)?)
    }

    pub fn list_by_creator(
        &self,
        credential: &impl CredentialProvider,
        creator: Option<&str>,
    ) -> Result<Vec<Playlist>, ApiError> {
        let token = resolve_token(Operation::ListByCreator, credential);
        let request = self.client.build_list_by_creator(&token, creator);
        self.client
            .parse_list_by_creator(self.round_trip(Operation::ListByCreator, request)?)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Playlist, ApiError> {
        let request = self.client.build_get_by_id(id)?;
        self.client.parse_get_by_id(self.round_trip(Operation::GetById, request)?)
    }

    pub fn add_song(&self, playlist_id: &str, song_id: &str) -> Result<Playlist, ApiError> {
        let request = self.client.build_add_song(playlist_id, song_id)?;
        self.client.parse_add_song(self.round_trip(Operation::AddSong, request)?)
    }

    pub fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<Playlist, ApiError> {
        let request = self.client.build_remove_song(playlist_id, song_id)?;
        self.client.parse_remove_song(self.round_trip(Operation::RemoveSong, request)?)
    }

    pub fn delete(&self, playlist_id: &str) -> Result<DeleteAck, ApiError> {
        let request = self.client.build_delete(playlist_id)?;
        self.client.parse_delete(self.round_trip(Operation::Delete, request)?)
    }

    pub fn list_public(&self) -> Result<Vec<Playlist>, ApiError> {
        let request = self.client.build_list_public();
        self.client.parse_list_public(self.round_trip(Operation::ListPublic, request)?)
    }

    pub fn list_songs(&self) -> Result<Vec<Song>, ApiError> {
        let request = self.client.build_list_songs();
        self.client.parse_list_songs(self.round_trip(Operation::ListSongs, request)?)
    }

    fn round_trip(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(%operation, method = %request.method, url = %request.path, "sending request");
        let response = self.transport.execute(&request).map_err(|source| {
            warn!(%operation, url = %request.path, error = %source, "request did not complete");
            ApiError::Transport { operation, source }
        })?;
        if !response.is_success() {
            warn!(%operation, url = %request.path, status = response.status, "request failed");
        }
        Ok(response)
    }
}

/// Ask the provider once; the server decides what an anonymous query gets.
fn resolve_token(operation: Operation, credential: &impl CredentialProvider) -> Option<String> {
    let token = credential.token();
    if token.is_none() {
        warn!(%operation, "no credential available, sending playlist query unauthenticated");
    }
    token
}
