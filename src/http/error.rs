use crate::services::track_acquisition::{AcquisitionError, TrackLookupError};
use crate::types::MalformedIdentifier;
use actix_web::http::StatusCode;
use actix_web::ResponseError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ProxyError {
    #[error(transparent)]
    MalformedIdentifier(#[from] MalformedIdentifier),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Upstream error")]
    UpstreamUnavailable,
    #[error("Malformed upstream response")]
    MalformedUpstreamResponse,
    #[error("{0}")]
    AcquisitionFailed(&'static str),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::UpstreamUnavailable | ProxyError::MalformedUpstreamResponse => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::AcquisitionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AcquisitionError> for ProxyError {
    fn from(error: AcquisitionError) -> Self {
        match error {
            AcquisitionError::TrackNotFound => ProxyError::NotFound("Track not found"),
            AcquisitionError::TrackLookupError(TrackLookupError::Unavailable(_)) => {
                ProxyError::UpstreamUnavailable
            }
            AcquisitionError::TrackLookupError(TrackLookupError::MalformedResponse(_)) => {
                ProxyError::MalformedUpstreamResponse
            }
            AcquisitionError::DownloaderError(_) | AcquisitionError::IoError(_) => {
                ProxyError::AcquisitionFailed("Failed to start download")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::track_acquisition::DownloaderError;

    #[test]
    fn should_map_errors_to_status_codes() {
        let cases = [
            (
                ProxyError::MalformedIdentifier(MalformedIdentifier("itunes-x".into())),
                400,
            ),
            (ProxyError::NotFound("Song not found"), 404),
            (ProxyError::UpstreamUnavailable, 502),
            (ProxyError::MalformedUpstreamResponse, 502),
            (ProxyError::AcquisitionFailed("Failed to start download"), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code().as_u16(), status, "{}", error);
        }
    }

    #[test]
    fn should_convert_acquisition_errors() {
        assert!(matches!(
            ProxyError::from(AcquisitionError::TrackNotFound),
            ProxyError::NotFound(_)
        ));
        assert!(matches!(
            ProxyError::from(AcquisitionError::DownloaderError(DownloaderError::MissingOutput)),
            ProxyError::AcquisitionFailed(_)
        ));
    }
}
