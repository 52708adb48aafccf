use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub cover_art: Option<String>,
    pub song_ids: Vec<String>,
    pub creator: String,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub cover_art: Option<String>,
    #[serde(default)]
    pub song_ids: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRef {
    pub song_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub creator: Option<String>,
    pub is_public: Option<bool>,
}

pub struct Backend {
    playlists: RwLock<Vec<Playlist>>,
    songs: Vec<Value>,
}

pub type Db = Arc<Backend>;

type Rejection = (StatusCode, Json<Value>);

fn reject(status: StatusCode, detail: &str) -> Rejection {
    (status, Json(json!({ "detail": detail })))
}

fn not_found() -> Rejection {
    reject(StatusCode::NOT_FOUND, "Playlist not found")
}

/// Routes without the `/api` prefix and with no songs in the catalogue.
pub fn app() -> Router {
    app_with_songs(Vec::new())
}

/// Routes serving `songs` from `GET /songs`.
pub fn app_with_songs(songs: Vec<Value>) -> Router {
    let db: Db = Arc::new(Backend {
        playlists: RwLock::new(Vec::new()),
        songs,
    });
    Router::new()
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route("/playlists/{id}", get(get_playlist).delete(delete_playlist))
        .route("/playlists/{id}/add-song", patch(add_song))
        .route("/playlists/{id}/remove-song", delete(remove_song))
        .route("/songs", get(list_songs))
        .with_state(db)
}

/// Serve `app` under `/api`, the prefix the real backend mounts playlists on.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, Router::new().nest("/api", app)).await
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty())
}

async fn list_playlists(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<Playlist>>, Rejection> {
    let public_only = params.is_public == Some(true);
    if !public_only && !has_bearer(&headers) {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    }
    let playlists = db.playlists.read().await;
    let found = playlists
        .iter()
        .filter(|p| !public_only || p.is_public)
        .filter(|p| params.creator.as_deref().map_or(true, |c| p.creator == c))
        .cloned()
        .collect();
    Ok(Json(found))
}

async fn create_playlist(
    State(db): State<Db>,
    Json(input): Json<CreatePlaylist>,
) -> Result<(StatusCode, Json<Playlist>), Rejection> {
    let creator = input
        .creator
        .filter(|c| !c.is_empty())
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "creator is required"))?;
    let playlist = Playlist {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name,
        cover_art: input.cover_art,
        song_ids: input.song_ids,
        creator,
        is_public: input.is_public,
        description: input.description,
    };
    tracing::info!(id = %playlist.id, creator = %playlist.creator, "playlist created");
    db.playlists.write().await.push(playlist.clone());
    Ok((StatusCode::CREATED, Json(playlist)))
}

async fn get_playlist(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Playlist>, Rejection> {
    let playlists = db.playlists.read().await;
    playlists.iter().find(|p| p.id == id).cloned().map(Json).ok_or_else(not_found)
}

async fn add_song(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<SongRef>,
) -> Result<Json<Playlist>, Rejection> {
    let mut playlists = db.playlists.write().await;
    let playlist = playlists.iter_mut().find(|p| p.id == id).ok_or_else(not_found)?;
    playlist.song_ids.push(input.song_id);
    Ok(Json(playlist.clone()))
}

async fn remove_song(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<SongRef>,
) -> Result<Json<Playlist>, Rejection> {
    let mut playlists = db.playlists.write().await;
    let playlist = playlists.iter_mut().find(|p| p.id == id).ok_or_else(not_found)?;
    playlist.song_ids.retain(|s| *s != input.song_id);
    Ok(Json(playlist.clone()))
}

async fn delete_playlist(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, Rejection> {
    let mut playlists = db.playlists.write().await;
    let index = playlists.iter().position(|p| p.id == id).ok_or_else(not_found)?;
    playlists.remove(index);
    tracing::info!(%id, "playlist deleted");
    Ok(Json(json!({ "message": "Playlist deleted successfully" })))
}

async fn list_songs(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "songs": db.songs }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_serializes_camel_case() {
        let playlist = Playlist {
            id: "p1".to_string(),
            name: "Test".to_string(),
            cover_art: None,
            song_ids: vec!["s1".to_string()],
            creator: "u1".to_string(),
            is_public: false,
            description: None,
        };
        let json = serde_json::to_value(&playlist).unwrap();
        assert_eq!(json["songIds"], json!(["s1"]));
        assert_eq!(json["isPublic"], false);
        assert!(json["coverArt"].is_null());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn create_playlist_defaults_optional_fields() {
        let input: CreatePlaylist = serde_json::from_str(r#"{"name":"No extras","creator":"u1"}"#).unwrap();
        assert_eq!(input.name, "No extras");
        assert!(input.song_ids.is_empty());
        assert!(!input.is_public);
        assert!(input.cover_art.is_none());
    }

    #[test]
    fn song_ref_requires_song_id() {
        assert!(serde_json::from_str::<SongRef>(r#"{}"#).is_err());
        let input: SongRef = serde_json::from_str(r#"{"songId":"s9"}"#).unwrap();
        assert_eq!(input.song_id, "s9");
    }

    #[test]
    fn bearer_detection() {
        let mut headers = HeaderMap::new();
        assert!(!has_bearer(&headers));
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(!has_bearer(&headers));
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert!(has_bearer(&headers));
    }
}
