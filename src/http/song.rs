use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::forward;
use crate::services::NavidromeClient;
use crate::subsonic::{to_song, SongPayload, SubsonicResponse};
use crate::types::{ItemId, INTERACTIVE_TIMEOUT};
use actix_web::web::{Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::{ItunesClient, TrackId};
use std::sync::Arc;
use tracing::warn;

pub(crate) async fn get_song(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
    itunes: Data<Arc<ItunesClient>>,
) -> Result<HttpResponse, ProxyError> {
    let params = QueryParams::from_request(&req);

    let track_id = match ItemId::classify(params.first("id").unwrap_or_default())? {
        ItemId::Native(_) => return forward(&req, body, &navidrome).await,
        ItemId::Virtual(track_id) => TrackId(track_id),
        ItemId::VirtualCoverDirect(_) | ItemId::VirtualCoverLookup(_) => {
            return Err(ProxyError::NotFound("Song not found"));
        }
    };

    let record = itunes
        .lookup_track(&track_id, INTERACTIVE_TIMEOUT)
        .await
        .map_err(|error| {
            warn!(?error, %track_id, "Song lookup failed");
            ProxyError::NotFound("Song not found")
        })?
        .ok_or(ProxyError::NotFound("Song not found"))?;
    let song = to_song(&record).ok_or(ProxyError::NotFound("Song not found"))?;

    Ok(HttpResponse::Ok().json(SubsonicResponse::ok(SongPayload { song })))
}
