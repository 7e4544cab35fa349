use crate::services::track_acquisition::types::{AudioStream, SaveRequest, SearchDirective};
use async_trait::async_trait;
use itunes_catalog::{ItunesRecord, TrackId};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub(crate) enum TrackLookupError {
    #[error("Track catalog is unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed track catalog response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub(crate) trait TrackLookup: Send + Sync {
    async fn lookup_track(
        &self,
        track_id: &TrackId,
        timeout: Duration,
    ) -> Result<Option<ItunesRecord>, TrackLookupError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ArtworkSourceError {
    #[error("Unable to fetch artwork: {0}")]
    Unavailable(String),
    #[error("Unexpected artwork response status: {0}")]
    UnexpectedStatus(u16),
}

#[async_trait]
pub(crate) trait ArtworkSource: Send + Sync {
    async fn fetch_artwork(&self, url: &str, timeout: Duration)
        -> Result<Vec<u8>, ArtworkSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum DownloaderError {
    #[error("Unable to run downloader: {0}")]
    SpawnError(#[from] std::io::Error),
    #[error("Downloader exited with status {code:?}: {stderr}")]
    ExitFailure { code: Option<i32>, stderr: String },
    #[error("Downloader produced no output")]
    MissingOutput,
}

#[async_trait]
pub(crate) trait Downloader: Send + Sync {
    /// Starts a download writing audio to the returned stream. Dropping the
    /// stream terminates the download.
    fn stream_audio(&self, directive: &SearchDirective) -> Result<AudioStream, DownloaderError>;

    /// Downloads audio with embedded metadata directly to `request.target`.
    async fn save_audio(&self, request: &SaveRequest) -> Result<(), DownloaderError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum LibraryScannerError {
    #[error("Unable to trigger library scan: {0}")]
    Unavailable(String),
}

#[async_trait]
pub(crate) trait LibraryScanner: Send + Sync {
    async fn trigger_scan(&self, auth_query: &str) -> Result<(), LibraryScannerError>;
}
