use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) const SUBSONIC_API_VERSION: &str = "1.16.1";
pub(crate) const STATUS_OK: &str = "ok";

/// The `subsonic-response` envelope wrapping every JSON reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SubsonicResponse<T> {
    #[serde(rename = "subsonic-response")]
    pub(crate) body: ResponseBody<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ResponseBody<T> {
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(flatten)]
    pub(crate) payload: T,
}

impl<T> SubsonicResponse<T> {
    pub(crate) fn ok(payload: T) -> Self {
        Self {
            body: ResponseBody {
                status: STATUS_OK.to_string(),
                version: SUBSONIC_API_VERSION.to_string(),
                payload,
            },
        }
    }
}

/// Payload of a bare acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Acknowledgement {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SongPayload {
    pub(crate) song: SubsonicSong,
}

/// Decoded `getAlbum` payload. Everything besides the album is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AlbumPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) album: Option<SubsonicAlbum>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SearchResult {
    pub(crate) song: Vec<SubsonicSong>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) enum SearchPayload {
    #[serde(rename = "searchResult2")]
    SearchResult2(SearchResult),
    #[serde(rename = "searchResult3")]
    SearchResult3(SearchResult),
}

/// Search endpoint flavour, which decides the name of the result field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchVersion {
    Search2,
    Search3,
}

impl SearchVersion {
    pub(crate) fn result_key(&self) -> &'static str {
        match self {
            SearchVersion::Search2 => "searchResult2",
            SearchVersion::Search3 => "searchResult3",
        }
    }

    pub(crate) fn payload(&self, song: Vec<SubsonicSong>) -> SearchPayload {
        let result = SearchResult { song };

        match self {
            SearchVersion::Search2 => SearchPayload::SearchResult2(result),
            SearchVersion::Search3 => SearchPayload::SearchResult3(result),
        }
    }
}

/// A song ("child") document. Fields this service does not know about are kept
/// in `extra` so native documents survive a decode/encode cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubsonicSong {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<String>,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) album_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) artist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) track: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) disc_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) cover_art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) bit_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) is_dir: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) is_video: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) transcoded_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) transcoded_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub(crate) media_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created: Option<String>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubsonicAlbum {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) is_dir: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) cover_art: Option<String>,
    #[serde(default)]
    pub(crate) song_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) artist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created: Option<String>,
    #[serde(default)]
    pub(crate) song: Vec<SubsonicSong>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}
