use crate::http::error::ProxyError;
use crate::services::{NavidromeClient, UpstreamReply};
use actix_web::http::StatusCode;
use actix_web::web::{Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::error;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Forwards any route not handled elsewhere to the upstream catalog.
pub(crate) async fn passthrough(
    req: HttpRequest,
    body: Bytes,
    navidrome: Data<Arc<NavidromeClient>>,
) -> Result<HttpResponse, ProxyError> {
    forward(&req, body, &navidrome).await
}

pub(crate) async fn forward(
    req: &HttpRequest,
    body: Bytes,
    navidrome: &NavidromeClient,
) -> Result<HttpResponse, ProxyError> {
    navidrome.forward(req, body).await.map_err(|error| {
        error!(?error, uri = %req.uri(), "Proxy error");
        ProxyError::UpstreamUnavailable
    })
}

/// Returns an already fetched upstream reply to the caller unchanged.
pub(crate) fn relay(reply: UpstreamReply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = reply
        .content_type
        .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string());

    HttpResponse::build(status)
        .content_type(content_type)
        .body(reply.body)
}

pub(crate) fn path_and_query(req: &HttpRequest) -> &str {
    req.uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or_else(|| req.path())
}
