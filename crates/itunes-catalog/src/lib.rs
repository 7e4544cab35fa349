mod itunes;

use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub use itunes::*;

/// Discriminates playable tracks from containers in provider results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapperType {
    Track,
    Collection,
    Artist,
    #[serde(other)]
    Other,
}

impl Default for WrapperType {
    fn default() -> Self {
        WrapperType::Other
    }
}

/// One raw result returned by the search or lookup endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesRecord {
    #[serde(default)]
    pub wrapper_type: WrapperType,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub track_id: Option<TrackId>,
    #[serde(default)]
    pub artist_id: Option<ArtistId>,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artwork_url100: Option<String>,
    #[serde(default)]
    pub track_time_millis: Option<u64>,
    #[serde(default)]
    pub primary_genre_name: Option<String>,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub disc_number: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl ItunesRecord {
    pub fn is_track(&self) -> bool {
        self.wrapper_type == WrapperType::Track
    }

    pub fn duration_seconds(&self) -> u64 {
        self.track_time_millis.unwrap_or_default() / 1000
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl From<u64> for TrackId {
    fn from(value: u64) -> Self {
        TrackId(value)
    }
}

impl Deref for TrackId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub struct CollectionId(pub u64);

impl From<u64> for CollectionId {
    fn from(value: u64) -> Self {
        CollectionId(value)
    }
}

impl Deref for CollectionId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub struct ArtistId(pub u64);

impl Deref for ArtistId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
