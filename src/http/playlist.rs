use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::forward;
use crate::services::{NavidromeClient, TrackAcquisition};
use crate::subsonic::{Acknowledgement, SubsonicResponse};
use crate::types::{ItemId, MalformedIdentifier, StorageClass};
use actix_web::web::{Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::TrackId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

const TRACK_ID_PARAMS: [&str; 3] = ["songId", "songIdToAdd", "id"];

/// Handles `createPlaylist`, `updatePlaylist` and `savePlayQueue`.
///
/// External tracks do not exist upstream, so a mutation naming any of them is
/// acknowledged locally and each external track is saved in the background.
pub(crate) async fn mutate_playlist(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
    acquisition: Data<Arc<TrackAcquisition>>,
) -> Result<HttpResponse, ProxyError> {
    let params = QueryParams::from_request(&req);
    let track_ids = external_track_ids(&params)?;

    if track_ids.is_empty() {
        return forward(&req, body, &navidrome).await;
    }

    info!(count = track_ids.len(), path = req.path(), "Saving external tracks from playlist change");

    for track_id in track_ids {
        acquisition.schedule_save_by_id(
            TrackId(track_id),
            StorageClass::Downloads,
            req.query_string().to_string(),
        );
    }

    Ok(HttpResponse::Ok().json(SubsonicResponse::ok(Acknowledgement {})))
}

fn external_track_ids(params: &QueryParams) -> Result<BTreeSet<u64>, MalformedIdentifier> {
    let mut track_ids = BTreeSet::new();

    for id in params.all(&TRACK_ID_PARAMS) {
        match ItemId::classify(id)? {
            ItemId::Native(_) => (),
            ItemId::Virtual(track_id) => {
                track_ids.insert(track_id);
            }
            ItemId::VirtualCoverDirect(_) | ItemId::VirtualCoverLookup(_) => {
                return Err(MalformedIdentifier(id.to_string()));
            }
        }
    }

    Ok(track_ids)
}
