//! API client core for the playlist service of a music-streaming backend.
//!
//! # Overview
//! `PlaylistClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PlaylistApi`
//! pairs it with a `Transport` so each operation is one blocking round trip.
//!
//! # Design
//! - `PlaylistClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Bearer tokens come from a caller-supplied `CredentialProvider`; the
//!   client never stores them.
//! - Every failure is an `ApiError` tagged with the operation that produced it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::PlaylistApi;
pub use client::PlaylistClient;
pub use config::ApiConfig;
pub use credential::{CredentialProvider, FnCredential};
pub use error::{ApiError, ErrorKind, Operation, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport, MAX_BODY_BYTES};
pub use types::{CreatePlaylistBody, DeleteAck, NewPlaylist, Playlist, Song, SongRef, PLACEHOLDER_COVER_ART};
