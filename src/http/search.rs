use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::{path_and_query, relay};
use crate::services::{NavidromeClient, UpstreamReply};
use crate::subsonic::{has_native_songs, to_song, SearchVersion, SubsonicResponse, SubsonicSong};
use crate::types::{INTERACTIVE_TIMEOUT, UPSTREAM_DECODE_TIMEOUT};
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::{Entity, ItunesClient, Media};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

const QUERY_PARAMS: [&str; 2] = ["query", "any"];

pub(crate) async fn search2(
    req: HttpRequest,
    navidrome: Data<Arc<NavidromeClient>>,
    itunes: Data<Arc<ItunesClient>>,
) -> Result<HttpResponse, ProxyError> {
    smart_search(req, SearchVersion::Search2, &navidrome, &itunes).await
}

pub(crate) async fn search3(
    req: HttpRequest,
    navidrome: Data<Arc<NavidromeClient>>,
    itunes: Data<Arc<ItunesClient>>,
) -> Result<HttpResponse, ProxyError> {
    smart_search(req, SearchVersion::Search3, &navidrome, &itunes).await
}

/// Native results win. Only when the upstream has no songs at all is the
/// external catalog searched instead.
async fn smart_search(
    req: HttpRequest,
    version: SearchVersion,
    navidrome: &NavidromeClient,
    itunes: &ItunesClient,
) -> Result<HttpResponse, ProxyError> {
    let reply = navidrome
        .get(path_and_query(&req), UPSTREAM_DECODE_TIMEOUT)
        .await
        .map_err(|error| {
            error!(?error, "Upstream search error");
            ProxyError::UpstreamUnavailable
        })?;

    if reply_has_songs(&reply, version) {
        return Ok(relay(reply));
    }

    let params = QueryParams::from_request(&req);
    let songs = match params.first_non_empty(&QUERY_PARAMS) {
        Some(term) => external_songs(itunes, term).await,
        None => vec![],
    };

    Ok(HttpResponse::Ok().json(SubsonicResponse::ok(version.payload(songs))))
}

fn reply_has_songs(reply: &UpstreamReply, version: SearchVersion) -> bool {
    if !reply.is_json() {
        return false;
    }

    serde_json::from_slice::<Value>(&reply.body)
        .map(|body| has_native_songs(&body, version))
        .unwrap_or(false)
}

async fn external_songs(itunes: &ItunesClient, term: &str) -> Vec<SubsonicSong> {
    match itunes
        .search(term, Media::Music, Entity::Song, INTERACTIVE_TIMEOUT)
        .await
    {
        Ok(records) => {
            debug!(term, count = records.len(), "External search finished");
            records
                .iter()
                .filter(|record| record.is_track())
                .filter_map(to_song)
                .collect()
        }
        Err(error) => {
            warn!(?error, term, "External search failed");
            vec![]
        }
    }
}
