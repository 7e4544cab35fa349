use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::forward;
use crate::services::NavidromeClient;
use crate::types::{ItemId, INTERACTIVE_TIMEOUT};
use actix_web::http::StatusCode;
use actix_web::web::{Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::{ItunesClient, TrackId};
use reqwest::Url;
use std::sync::Arc;
use tracing::error;

pub(crate) async fn get_cover_art(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
    itunes: Data<Arc<ItunesClient>>,
) -> Result<HttpResponse, ProxyError> {
    let params = QueryParams::from_request(&req);

    let track_id = match ItemId::classify_cover(params.first("id").unwrap_or_default())? {
        ItemId::Native(_) => return forward(&req, body, &navidrome).await,
        ItemId::VirtualCoverDirect(url) => return relay_artwork(&itunes, &url).await,
        ItemId::VirtualCoverLookup(track_id) => track_id,
        ItemId::Virtual(track_id) => TrackId(track_id),
    };

    let record = itunes
        .lookup_track(&track_id, INTERACTIVE_TIMEOUT)
        .await
        .map_err(|error| {
            error!(?error, %track_id, "Error fetching cover art");
            ProxyError::UpstreamUnavailable
        })?
        .ok_or(ProxyError::NotFound("Cover not found"))?;

    match record.artwork_url100 {
        Some(url) if !url.is_empty() => relay_artwork(&itunes, &url).await,
        _ => Err(ProxyError::NotFound("Cover not found")),
    }
}

async fn relay_artwork(itunes: &ItunesClient, url: &str) -> Result<HttpResponse, ProxyError> {
    let artwork = itunes
        .fetch_artwork(url, INTERACTIVE_TIMEOUT)
        .await
        .map_err(|error| {
            error!(?error, url, "Error fetching cover art");
            ProxyError::UpstreamUnavailable
        })?;

    let status = StatusCode::from_u16(artwork.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = artwork
        .content_type
        .unwrap_or_else(|| guess_content_type(url));

    Ok(HttpResponse::build(status)
        .content_type(content_type)
        .body(artwork.bytes))
}

fn guess_content_type(url: &str) -> String {
    let path = Url::parse(url)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| url.to_string());

    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_guess_content_type_from_url_path() {
        assert_eq!(
            guess_content_type("https://is1.mzstatic.com/image/600x600bb.jpg?v=2"),
            "image/jpeg"
        );
        assert_eq!(guess_content_type("https://host/art.png"), "image/png");
        assert_eq!(
            guess_content_type("https://host/art"),
            "application/octet-stream"
        );
    }
}
