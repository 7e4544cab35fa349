use actix_web::body::SizedStream;
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, info};

pub(crate) const SCAN_TIMEOUT: Duration = Duration::from_secs(5);

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

const HOP_BY_HOP_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// Set by this proxy on every response, so the upstream copies are dropped.
const UPSTREAM_CORS_HEADERS: [&str; 4] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
    "access-control-expose-headers",
];

#[derive(Debug, thiserror::Error)]
pub(crate) enum NavidromeClientError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error("Invalid upstream request: {0}")]
    InvalidRequest(String),
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),
}

/// A fully buffered upstream reply.
#[derive(Debug, Clone)]
pub(crate) struct UpstreamReply {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    pub(crate) body: Bytes,
}

impl UpstreamReply {
    pub(crate) fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|content_type| content_type.to_lowercase().contains("json"))
            .unwrap_or(false)
    }
}

/// Client for the upstream Subsonic-compatible catalog server.
pub(crate) struct NavidromeClient {
    client: Client,
    base: String,
}

impl NavidromeClient {
    pub(crate) fn create(base: &str) -> Result<Self, NavidromeClientError> {
        let client = Client::builder().redirect(Policy::none()).build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// Forwards an inbound request as-is and streams the upstream reply back.
    pub(crate) async fn forward(
        &self,
        req: &HttpRequest,
        body: Bytes,
    ) -> Result<HttpResponse, NavidromeClientError> {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or("/");
        let method = Method::from_bytes(req.method().as_str().as_bytes())
            .map_err(|_| NavidromeClientError::InvalidRequest(req.method().to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in req.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                headers.append(name, value);
            }
        }

        let connection_info = req.connection_info().clone();
        if let Ok(host) = HeaderValue::from_str(connection_info.host()) {
            headers.insert(X_FORWARDED_HOST, host);
        }
        if let Ok(scheme) = HeaderValue::from_str(connection_info.scheme()) {
            headers.insert(X_FORWARDED_PROTO, scheme);
        }

        debug!(%method, path_and_query, "Forwarding request upstream");

        let response = self
            .client
            .request(method.clone(), self.url(path_and_query))
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|_| NavidromeClientError::UnexpectedStatus(response.status().as_u16()))?;
        let mut builder = HttpResponse::build(status);

        for (name, value) in response.headers() {
            let name = name.as_str();
            if is_hop_by_hop(name) || is_upstream_cors(name) || name == "content-length" {
                continue;
            }
            builder.append_header((name, value.as_bytes()));
        }

        if method == Method::HEAD
            || status == StatusCode::NO_CONTENT
            || status == StatusCode::NOT_MODIFIED
        {
            return Ok(builder.finish());
        }

        let content_length = response.content_length();
        let stream = response.bytes_stream();

        Ok(match content_length {
            Some(length) => builder.body(SizedStream::new(length, stream)),
            None => builder.streaming(stream),
        })
    }

    /// Issues a GET against the upstream and buffers the whole reply.
    pub(crate) async fn get(
        &self,
        path_and_query: &str,
        timeout: Duration,
    ) -> Result<UpstreamReply, NavidromeClientError> {
        let response = self
            .client
            .get(self.url(path_and_query))
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await?;

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    /// Asks the upstream to re-index its library, authorized with the query of
    /// the request that caused the new file to appear.
    pub(crate) async fn trigger_scan(&self, auth_query: &str) -> Result<(), NavidromeClientError> {
        let path_and_query = format!("/rest/startScan.view?{}", auth_query);

        info!("Triggering upstream library scan");

        let reply = self.get(&path_and_query, SCAN_TIMEOUT).await?;

        if reply.status != 200 {
            return Err(NavidromeClientError::UnexpectedStatus(reply.status));
        }

        Ok(())
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

fn is_upstream_cors(name: &str) -> bool {
    UPSTREAM_CORS_HEADERS
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_recognise_filtered_headers() {
        assert!(is_hop_by_hop("Transfer-Encoding"));
        assert!(is_hop_by_hop("host"));
        assert!(!is_hop_by_hop("authorization"));
        assert!(is_upstream_cors("Access-Control-Allow-Origin"));
        assert!(!is_upstream_cors("access-control-max-age"));
    }

    #[test]
    fn should_detect_json_replies() {
        let reply = |content_type: Option<&str>| UpstreamReply {
            status: 200,
            content_type: content_type.map(Into::into),
            body: Bytes::new(),
        };

        assert!(reply(Some("application/json; charset=utf-8")).is_json());
        assert!(reply(Some("Application/JSON")).is_json());
        assert!(!reply(Some("text/xml")).is_json());
        assert!(!reply(None).is_json());
    }
}
