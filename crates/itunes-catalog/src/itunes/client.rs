use crate::itunes::parser::{parse_results, retain_tracks, ParseError};
use crate::itunes::types::{Artwork, Entity, Media};
use crate::{CollectionId, ItunesRecord, TrackId};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

pub const ITUNES_ENDPOINT: &str = "https://itunes.apple.com";

#[derive(Debug, thiserror::Error)]
pub enum ItunesClientError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error("No results found")]
    NoResults,
}

impl ItunesClientError {
    /// Transport failures and non-2xx replies, as opposed to bodies that could not be decoded.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ItunesClientError::ReqwestError(_)
                | ItunesClientError::InvalidEndpoint(_)
                | ItunesClientError::UnexpectedStatus(_)
        )
    }
}

/// Stateless client for the iTunes Search API.
pub struct ItunesClient {
    client: Client,
    endpoint: String,
}

impl ItunesClient {
    pub fn create(endpoint: &str) -> Result<Self, ItunesClientError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub async fn search(
        &self,
        term: &str,
        media: Media,
        entity: Entity,
        timeout: Duration,
    ) -> Result<Vec<ItunesRecord>, ItunesClientError> {
        let url = self.url(
            "search",
            &[
                ("term", term),
                ("media", media.as_str()),
                ("entity", entity.as_str()),
            ],
        )?;

        debug!(%url, "Searching iTunes catalog");

        self.get_results(url, timeout).await
    }

    pub async fn lookup(
        &self,
        id: u64,
        entity: Option<Entity>,
        timeout: Duration,
    ) -> Result<Vec<ItunesRecord>, ItunesClientError> {
        let id = id.to_string();
        let mut params = vec![("id", id.as_str())];
        if let Some(entity) = entity {
            params.push(("entity", entity.as_str()));
            params.push(("media", Media::Music.as_str()));
        }
        let url = self.url("lookup", &params)?;

        debug!(%url, "Looking up iTunes catalog");

        self.get_results(url, timeout).await
    }

    /// Looks up a single track. Returns `None` when the provider knows no such
    /// track, including when the id names a collection or an artist instead.
    pub async fn lookup_track(
        &self,
        track_id: &TrackId,
        timeout: Duration,
    ) -> Result<Option<ItunesRecord>, ItunesClientError> {
        let results = self.lookup(**track_id, None, timeout).await?;

        Ok(retain_tracks(results)
            .into_iter()
            .find(|record| record.track_id == Some(*track_id)))
    }

    /// Looks up the tracks of a collection, discarding the collection record itself.
    pub async fn lookup_album_tracks(
        &self,
        collection_id: &CollectionId,
        timeout: Duration,
    ) -> Result<Vec<ItunesRecord>, ItunesClientError> {
        let results = self
            .lookup(**collection_id, Some(Entity::Song), timeout)
            .await?;
        let tracks = retain_tracks(results);

        if tracks.is_empty() {
            return Err(ItunesClientError::NoResults);
        }

        Ok(tracks)
    }

    pub async fn fetch_artwork(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Artwork, ItunesClientError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(Artwork {
            status,
            content_type,
            bytes,
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ItunesClientError> {
        let base = format!("{}/{}", self.endpoint, path);

        Url::parse_with_params(&base, params)
            .map_err(|_| ItunesClientError::InvalidEndpoint(self.endpoint.clone()))
    }

    async fn get_results(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<Vec<ItunesRecord>, ItunesClientError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ItunesClientError::UnexpectedStatus(status.as_u16()));
        }

        let raw_json = response.bytes().await?;

        Ok(parse_results(&raw_json)?)
    }
}
