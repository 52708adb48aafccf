//! Stateless HTTP request builder and response parser for the playlist API.
//!
//! # Design
//! `PlaylistClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Executing the round trip is left to a `Transport`, which
//! keeps this module deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::credential::CredentialProvider;
use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteAck, NewPlaylist, Playlist, Song, SongRef};

const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");
const NO_CACHE: (&str, &str) = ("cache-control", "no-cache");

/// Synchronous, stateless client for the playlist API.
#[derive(Debug, Clone)]
pub struct PlaylistClient {
    base_url: String,
}

impl PlaylistClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// POST `/playlists`. `coverArt` and `songIds` are defaulted before sending.
    pub fn build_create(&self, input: &NewPlaylist) -> Result<HttpRequest, ApiError> {
        if input.creator.is_empty() {
            return Err(ApiError::invalid_input(Operation::Create, "creator is required"));
        }
        let body = encode(Operation::Create, &input.normalized())?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection(),
            headers: vec![header(CONTENT_TYPE_JSON)],
            body: Some(body),
        })
    }

    /// GET `/playlists` with the caller's bearer token.
    pub fn build_list(&self, credential: &impl CredentialProvider) -> HttpRequest {
        self.build_list_by_creator(credential, None)
    }

    /// GET `/playlists`, filtered by `creator` when one is given.
    pub fn build_list_by_creator(&self, credential: &impl CredentialProvider, creator: Option<&str>) -> HttpRequest {
        let path = match creator.filter(|c| !c.is_empty()) {
            Some(creator) => format!("{}?creator={}", self.collection(), urlencoding::encode(creator)),
            None => self.collection(),
        };
        let mut headers = vec![header(NO_CACHE)];
        if let Some(token) = credential.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers,
            body: None,
        }
    }

    /// GET `/playlists/{id}`, unauthenticated.
    pub fn build_get_by_id(&self, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: self.resource(Operation::GetById, id)?,
            headers: vec![header(NO_CACHE)],
            body: None,
        })
    }

    /// PATCH `/playlists/{id}/add-song` with `{"songId": ...}`.
    pub fn build_add_song(&self, playlist_id: &str, song_id: &str) -> Result<HttpRequest, ApiError> {
        self.song_request(Operation::AddSong, HttpMethod::Patch, "add-song", playlist_id, song_id)
    }

    /// DELETE `/playlists/{id}/remove-song` with `{"songId": ...}`.
    pub fn build_remove_song(&self, playlist_id: &str, song_id: &str) -> Result<HttpRequest, ApiError> {
        self.song_request(Operation::RemoveSong, HttpMethod::Delete, "remove-song", playlist_id, song_id)
    }

    /// DELETE `/playlists/{id}`.
    pub fn build_delete(&self, playlist_id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: self.resource(Operation::Delete, playlist_id)?,
            headers: Vec::new(),
            body: None,
        })
    }

    /// GET `/playlists?isPublic=true`, unauthenticated.
    pub fn build_list_public(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?isPublic=true", self.collection()),
            headers: vec![header(NO_CACHE)],
            body: None,
        }
    }

    /// GET `/songs`, unauthenticated.
    pub fn build_list_songs(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/songs", self.base_url),
            headers: vec![header(NO_CACHE)],
            body: None,
        }
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_create(&self, response: HttpResponse) -> Result<Playlist, ApiError> {
        decode(Operation::Create, response)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Playlist>, ApiError> {
        decode(Operation::List, response)
    }

    pub fn parse_list_by_creator(&self, response: HttpResponse) -> Result<Vec<Playlist>, ApiError> {
        decode(Operation::ListByCreator, response)
    }

    pub fn parse_get_by_id(&self, response: HttpResponse) -> Result<Playlist, ApiError> {
        decode(Operation::GetById, response)
    }

    pub fn parse_add_song(&self, response: HttpResponse) -> Result<Playlist, ApiError> {
        decode(Operation::AddSong, response)
    }

    pub fn parse_remove_song(&self, response: HttpResponse) -> Result<Playlist, ApiError> {
        decode(Operation::RemoveSong, response)
    }

    /// The acknowledgment is returned as-is; an empty body yields `null`.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<DeleteAck, ApiError> {
        check_status(Operation::Delete, &response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        decode_body(Operation::Delete, &response.body)
    }

    pub fn parse_list_public(&self, response: HttpResponse) -> Result<Vec<Playlist>, ApiError> {
        decode(Operation::ListPublic, response)
    }

    /// Accepts either a bare array or an object with a `songs` array. Any
    /// other successful body is treated as an empty library.
    pub fn parse_list_songs(&self, response: HttpResponse) -> Result<Vec<Song>, ApiError> {
        let value: Value = decode(Operation::ListSongs, response)?;
        let songs = match value {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut map) => match map.remove("songs") {
                Some(songs @ Value::Array(_)) => songs,
                _ => return Ok(Vec::new()),
            },
            _ => return Ok(Vec::new()),
        };
        serde_json::from_value(songs).map_err(|e| ApiError::Decode {
            operation: Operation::ListSongs,
            message: e.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn collection(&self) -> String {
        format!("{}/playlists", self.base_url)
    }

    fn resource(&self, operation: Operation, id: &str) -> Result<String, ApiError> {
        if id.is_empty() {
            return Err(ApiError::invalid_input(operation, "playlist id must not be empty"));
        }
        Ok(format!("{}/{}", self.collection(), urlencoding::encode(id)))
    }

    fn song_request(
        &self,
        operation: Operation,
        method: HttpMethod,
        action: &str,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/{action}", self.resource(operation, playlist_id)?);
        let body = encode(
            operation,
            &SongRef {
                song_id: song_id.to_string(),
            },
        )?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![header(CONTENT_TYPE_JSON)],
            body: Some(body),
        })
    }
}

fn header((name, value): (&str, &str)) -> (String, String) {
    (name.to_string(), value.to_string())
}

fn encode<T: Serialize>(operation: Operation, value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Encode {
        operation,
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(operation: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(operation, &response)?;
    decode_body(operation, &response.body)
}

fn decode_body<T: DeserializeOwned>(operation: Operation, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        operation,
        message: e.to_string(),
    })
}

/// Map a non-2xx response to `ApiError::Http`, preferring the body's `detail`.
fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = detail_message(&response.body).unwrap_or_else(|| operation.fallback_message().to_string());
    debug!(%operation, status = response.status, %message, "request rejected");
    Err(ApiError::Http {
        operation,
        status: response.status,
        message,
    })
}

fn detail_message(body: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    match map.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
