use crate::ItunesRecord;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    result_count: usize,
    #[serde(default)]
    results: Vec<ItunesRecord>,
}

pub(crate) fn parse_results(raw_json: &[u8]) -> Result<Vec<ItunesRecord>, ParseError> {
    let response: SearchResponse = serde_json::from_slice(raw_json)?;

    if response.result_count != response.results.len() {
        tracing::debug!(
            result_count = response.result_count,
            results = response.results.len(),
            "Result count does not match the number of decoded results"
        );
    }

    Ok(response.results)
}

/// Keeps only playable track records, dropping collection and artist containers.
pub(crate) fn retain_tracks(results: Vec<ItunesRecord>) -> Vec<ItunesRecord> {
    results.into_iter().filter(ItunesRecord::is_track).collect()
}
