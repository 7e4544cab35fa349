use crate::services::track_acquisition::traits::{
    ArtworkSource, ArtworkSourceError, Downloader, DownloaderError, LibraryScanner,
    LibraryScannerError, TrackLookup, TrackLookupError,
};
use crate::services::track_acquisition::types::{AudioStream, SaveRequest, SearchDirective};
use crate::services::{NavidromeClient, YtDlpDownloader};
use async_trait::async_trait;
use itunes_catalog::{ItunesClient, ItunesClientError, ItunesRecord, TrackId};
use std::time::Duration;

impl From<ItunesClientError> for TrackLookupError {
    fn from(error: ItunesClientError) -> Self {
        if error.is_unavailable() {
            TrackLookupError::Unavailable(error.to_string())
        } else {
            TrackLookupError::MalformedResponse(error.to_string())
        }
    }
}

#[async_trait]
impl TrackLookup for ItunesClient {
    async fn lookup_track(
        &self,
        track_id: &TrackId,
        timeout: Duration,
    ) -> Result<Option<ItunesRecord>, TrackLookupError> {
        Ok(ItunesClient::lookup_track(self, track_id, timeout).await?)
    }
}

#[async_trait]
impl ArtworkSource for ItunesClient {
    async fn fetch_artwork(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, ArtworkSourceError> {
        let artwork = ItunesClient::fetch_artwork(self, url, timeout)
            .await
            .map_err(|error| ArtworkSourceError::Unavailable(error.to_string()))?;

        if artwork.status != 200 {
            return Err(ArtworkSourceError::UnexpectedStatus(artwork.status));
        }

        Ok(artwork.bytes)
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    fn stream_audio(&self, directive: &SearchDirective) -> Result<AudioStream, DownloaderError> {
        YtDlpDownloader::stream_audio(self, directive)
    }

    async fn save_audio(&self, request: &SaveRequest) -> Result<(), DownloaderError> {
        YtDlpDownloader::save_audio(self, request).await
    }
}

#[async_trait]
impl LibraryScanner for NavidromeClient {
    async fn trigger_scan(&self, auth_query: &str) -> Result<(), LibraryScannerError> {
        NavidromeClient::trigger_scan(self, auth_query)
            .await
            .map_err(|error| LibraryScannerError::Unavailable(error.to_string()))
    }
}
