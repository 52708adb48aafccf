//! Domain DTOs for the playlist API.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Fields the client does
//! not model are kept in `extra`/`metadata` maps rather than dropped, since
//! the backend is the source of truth and callers may render them.
//!
//! The mock-server crate defines its own copies; integration tests catch
//! schema drift between the two.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Cover art sent when a playlist is created without explicit artwork.
pub const PLACEHOLDER_COVER_ART: &str = "https://via.placeholder.com/640x640.png?text=Playlist+Cover";

/// Server-defined acknowledgment returned by a playlist deletion.
pub type DeleteAck = Value;

/// A playlist as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cover_art: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub song_ids: Vec<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-facing payload for creating a playlist.
///
/// Cosmetic fields may be left out; see [`NewPlaylist::normalized`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub name: String,
    pub creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewPlaylist {
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
            ..Self::default()
        }
    }

    /// The body actually sent to the server: an empty or missing cover falls
    /// back to [`PLACEHOLDER_COVER_ART`] and missing song ids become `[]`.
    pub fn normalized(&self) -> CreatePlaylistBody {
        let cover_art = match self.cover_art.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => PLACEHOLDER_COVER_ART.to_string(),
        };
        CreatePlaylistBody {
            name: self.name.clone(),
            creator: self.creator.clone(),
            cover_art,
            song_ids: self.song_ids.clone().unwrap_or_default(),
            is_public: self.is_public,
            description: self.description.clone(),
        }
    }
}

/// Wire body of a create request. `coverArt` and `songIds` are always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistBody {
    pub name: String,
    pub creator: String,
    pub cover_art: String,
    pub song_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of the add-song and remove-song requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SongRef {
    pub song_id: String,
}

/// A song. Only the id is interpreted; everything else is opaque metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Missing and `null` both decode to `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_fills_cover_art_and_song_ids() {
        let body = NewPlaylist::new("Chill", "u1").normalized();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Chill",
                "creator": "u1",
                "coverArt": PLACEHOLDER_COVER_ART,
                "songIds": [],
            })
        );
    }

    #[test]
    fn normalized_treats_empty_cover_art_as_missing() {
        let input = NewPlaylist {
            cover_art: Some(String::new()),
            ..NewPlaylist::new("Chill", "u1")
        };
        assert_eq!(input.normalized().cover_art, PLACEHOLDER_COVER_ART);
    }

    #[test]
    fn normalized_keeps_explicit_fields() {
        let input = NewPlaylist {
            cover_art: Some("https://img/x.png".to_string()),
            song_ids: Some(vec!["s1".to_string(), "s2".to_string()]),
            is_public: Some(true),
            ..NewPlaylist::new("Mix", "u2")
        };
        let body = input.normalized();
        assert_eq!(body.cover_art, "https://img/x.png");
        assert_eq!(body.song_ids, vec!["s1", "s2"]);
        assert_eq!(body.is_public, Some(true));
    }

    #[test]
    fn playlist_missing_or_null_song_ids_decodes_empty() {
        let p: Playlist = serde_json::from_str(r#"{"id":"p1","name":"A"}"#).unwrap();
        assert!(p.song_ids.is_empty());
        let p: Playlist = serde_json::from_str(r#"{"id":"p1","name":"A","songIds":null}"#).unwrap();
        assert!(p.song_ids.is_empty());
    }

    #[test]
    fn null_name_and_visibility_decode_to_defaults() {
        let playlists: Vec<Playlist> =
            serde_json::from_str(r#"[{"id":"p1","name":"A","isPublic":null},{"id":"p2","name":null}]"#).unwrap();
        assert_eq!(playlists.len(), 2);
        assert!(!playlists[0].is_public);
        assert_eq!(playlists[1].name, "");
        assert!(playlists[1].song_ids.is_empty());
    }

    #[test]
    fn playlist_accepts_mongo_style_id_and_keeps_unknown_fields() {
        let p: Playlist =
            serde_json::from_str(r#"{"_id":"p9","name":"A","isPublic":true,"createdAt":"2024-01-01"}"#).unwrap();
        assert_eq!(p.id, "p9");
        assert!(p.is_public);
        assert_eq!(p.extra["createdAt"], "2024-01-01");
    }

    #[test]
    fn song_ref_uses_camel_case() {
        let json = serde_json::to_string(&SongRef {
            song_id: "s9".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"songId":"s9"}"#);
    }

    #[test]
    fn song_metadata_is_opaque() {
        let song: Song = serde_json::from_str(r#"{"id":"s1","title":"T","duration":180}"#).unwrap();
        assert_eq!(song.id, "s1");
        assert_eq!(song.metadata["duration"], 180);
    }
}
