use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::{path_and_query, relay};
use crate::services::NavidromeClient;
use crate::subsonic::{merge_external_tracks, to_album, AlbumPayload, SubsonicResponse};
use crate::types::{ItemId, INTERACTIVE_TIMEOUT, UPSTREAM_DECODE_TIMEOUT};
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::{CollectionId, Entity, ItunesClient, ItunesClientError, ItunesRecord, Media};
use serde_json::Map;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub(crate) async fn get_album(
    req: HttpRequest,
    navidrome: Data<Arc<NavidromeClient>>,
    itunes: Data<Arc<ItunesClient>>,
) -> Result<HttpResponse, ProxyError> {
    let params = QueryParams::from_request(&req);

    match ItemId::classify(params.first("id").unwrap_or_default())? {
        ItemId::Native(_) => merged_native_album(&req, &navidrome, &itunes).await,
        ItemId::Virtual(collection_id) => external_album(CollectionId(collection_id), &itunes).await,
        ItemId::VirtualCoverDirect(_) | ItemId::VirtualCoverLookup(_) => {
            Err(ProxyError::NotFound("Album not found"))
        }
    }
}

async fn external_album(
    collection_id: CollectionId,
    itunes: &ItunesClient,
) -> Result<HttpResponse, ProxyError> {
    let tracks = itunes
        .lookup_album_tracks(&collection_id, UPSTREAM_DECODE_TIMEOUT)
        .await
        .map_err(|error| match error {
            ItunesClientError::NoResults => ProxyError::NotFound("Album not found"),
            error if error.is_unavailable() => {
                error!(?error, %collection_id, "Album lookup failed");
                ProxyError::UpstreamUnavailable
            }
            error => {
                error!(?error, %collection_id, "Album lookup failed");
                ProxyError::MalformedUpstreamResponse
            }
        })?;

    let mut album = tracks
        .iter()
        .find_map(to_album)
        .ok_or(ProxyError::NotFound("Album not found"))?;
    merge_external_tracks(&mut album, &tracks);

    Ok(HttpResponse::Ok().json(SubsonicResponse::ok(AlbumPayload {
        album: Some(album),
        extra: Map::new(),
    })))
}

async fn merged_native_album(
    req: &HttpRequest,
    navidrome: &NavidromeClient,
    itunes: &ItunesClient,
) -> Result<HttpResponse, ProxyError> {
    let reply = navidrome
        .get(path_and_query(req), UPSTREAM_DECODE_TIMEOUT)
        .await
        .map_err(|error| {
            error!(?error, "Upstream album fetch failed");
            ProxyError::UpstreamUnavailable
        })?;

    if !(200..300).contains(&reply.status) || !reply.is_json() {
        return Ok(relay(reply));
    }

    let mut decoded: SubsonicResponse<AlbumPayload> = serde_json::from_slice(&reply.body)
        .map_err(|error| {
            error!(?error, "Unable to decode upstream album");
            ProxyError::MalformedUpstreamResponse
        })?;

    let album = match decoded.body.payload.album.as_mut() {
        Some(album) => album,
        None => return Ok(relay(reply)),
    };

    match find_external_album_tracks(itunes, &album.name).await {
        Ok(Some(tracks)) => {
            let appended = merge_external_tracks(album, &tracks);
            debug!(appended, album = %album.name, "Merged external tracks into album");
        }
        Ok(None) => debug!(album = %album.name, "No external album found"),
        Err(error) => warn!(?error, album = %album.name, "External album search failed"),
    }

    Ok(HttpResponse::Ok().json(decoded))
}

async fn find_external_album_tracks(
    itunes: &ItunesClient,
    album_name: &str,
) -> Result<Option<Vec<ItunesRecord>>, ItunesClientError> {
    if album_name.is_empty() {
        return Ok(None);
    }

    let albums = itunes
        .search(album_name, Media::Music, Entity::Album, INTERACTIVE_TIMEOUT)
        .await?;

    let collection_id = match albums.iter().find_map(|album| album.collection_id) {
        Some(collection_id) => collection_id,
        None => return Ok(None),
    };

    match itunes
        .lookup_album_tracks(&collection_id, INTERACTIVE_TIMEOUT)
        .await
    {
        Ok(tracks) => Ok(Some(tracks)),
        Err(ItunesClientError::NoResults) => Ok(None),
        Err(error) => Err(error),
    }
}
