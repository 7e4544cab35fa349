use crate::http::error::ProxyError;
use crate::http::params::QueryParams;
use crate::http::passthrough::forward;
use crate::services::track_acquisition::StreamSource;
use crate::services::{NavidromeClient, TrackAcquisition};
use crate::subsonic::SYNTHESIZED_CONTENT_TYPE;
use crate::types::{ItemId, StorageClass, INTERACTIVE_TIMEOUT};
use actix_files::NamedFile;
use actix_web::web::{Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use itunes_catalog::TrackId;
use std::sync::Arc;
use tracing::{error, warn};

pub(crate) async fn stream(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
    acquisition: Data<Arc<TrackAcquisition>>,
) -> Result<HttpResponse, ProxyError> {
    serve_audio(req, body, StorageClass::Cached, &navidrome, &acquisition).await
}

pub(crate) async fn download(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
    acquisition: Data<Arc<TrackAcquisition>>,
) -> Result<HttpResponse, ProxyError> {
    serve_audio(req, body, StorageClass::Downloads, &navidrome, &acquisition).await
}

async fn serve_audio(
    req: HttpRequest,
    body: Bytes,
    class: StorageClass,
    navidrome: &NavidromeClient,
    acquisition: &Arc<TrackAcquisition>,
) -> Result<HttpResponse, ProxyError> {
    let params = QueryParams::from_request(&req);

    let track_id = match ItemId::classify(params.first("id").unwrap_or_default())? {
        ItemId::Native(_) => return forward(&req, body, navidrome).await,
        ItemId::Virtual(track_id) => TrackId(track_id),
        ItemId::VirtualCoverDirect(_) | ItemId::VirtualCoverLookup(_) => {
            return Err(ProxyError::NotFound("Track not found"));
        }
    };

    let record = acquisition
        .resolve_track(&track_id, INTERACTIVE_TIMEOUT)
        .await
        .map_err(|error| {
            warn!(?error, %track_id, "Track lookup failed");
            ProxyError::NotFound("Track not found")
        })?;

    let source = acquisition
        .open_stream(record, class, req.query_string().to_string())
        .await
        .map_err(|error| {
            error!(?error, %track_id, "Unable to start download");
            ProxyError::from(error)
        })?;

    match source {
        StreamSource::Existing(path) => {
            let file = NamedFile::open_async(&path).await.map_err(|error| {
                error!(?error, path = %path.display(), "Unable to open existing file");
                ProxyError::AcquisitionFailed("Unable to open file")
            })?;

            Ok(file.into_response(&req))
        }
        StreamSource::Streaming(audio) => Ok(HttpResponse::Ok()
            .content_type(SYNTHESIZED_CONTENT_TYPE)
            .streaming(audio)),
    }
}
