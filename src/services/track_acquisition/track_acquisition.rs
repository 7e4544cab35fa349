use crate::services::track_acquisition::traits::{
    ArtworkSource, Downloader, DownloaderError, LibraryScanner, TrackLookup, TrackLookupError,
};
use crate::services::track_acquisition::types::{
    AudioMetadata, LibraryLayout, OnDropStream, SaveOutcome, SaveRequest, SearchDirective,
    StreamSource,
};
use crate::services::BackgroundTasks;
use crate::types::{StorageClass, DETACHED_LOOKUP_TIMEOUT, INTERACTIVE_TIMEOUT};
use itunes_catalog::{upgrade_artwork_url, ItunesRecord, TrackId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AcquisitionError {
    #[error("Track has not been found")]
    TrackNotFound,
    #[error(transparent)]
    TrackLookupError(#[from] TrackLookupError),
    #[error(transparent)]
    DownloaderError(#[from] DownloaderError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Materializes external tracks as files in the music library.
pub(crate) struct TrackAcquisition {
    track_lookup: Arc<dyn TrackLookup>,
    artwork_source: Arc<dyn ArtworkSource>,
    downloader: Arc<dyn Downloader>,
    library_scanner: Arc<dyn LibraryScanner>,
    background_tasks: Arc<BackgroundTasks>,
    layout: LibraryLayout,
}

impl TrackAcquisition {
    pub(crate) fn new(
        track_lookup: Arc<dyn TrackLookup>,
        artwork_source: Arc<dyn ArtworkSource>,
        downloader: Arc<dyn Downloader>,
        library_scanner: Arc<dyn LibraryScanner>,
        background_tasks: Arc<BackgroundTasks>,
        layout: LibraryLayout,
    ) -> Self {
        Self {
            track_lookup,
            artwork_source,
            downloader,
            library_scanner,
            background_tasks,
            layout,
        }
    }

    pub(crate) async fn resolve_track(
        &self,
        track_id: &TrackId,
        timeout: Duration,
    ) -> Result<ItunesRecord, AcquisitionError> {
        self.track_lookup
            .lookup_track(track_id, timeout)
            .await?
            .ok_or(AcquisitionError::TrackNotFound)
    }

    pub(crate) fn track_path(&self, record: &ItunesRecord, class: StorageClass) -> PathBuf {
        self.layout
            .track_path(class, &AudioMetadata::from_record(record))
    }

    /// Serves an existing file when there is one. Otherwise starts a download
    /// streamed to the caller, and schedules a save of the same track once the
    /// stream is dropped.
    pub(crate) async fn open_stream(
        self: &Arc<Self>,
        record: ItunesRecord,
        class: StorageClass,
        auth_query: String,
    ) -> Result<StreamSource, AcquisitionError> {
        let target = self.track_path(&record, class);

        if file_exists(&target).await {
            info!(path = %target.display(), "Serving existing file");
            return Ok(StreamSource::Existing(target));
        }

        let metadata = AudioMetadata::from_record(&record);
        let directive = SearchDirective::for_track(&metadata);

        info!(%directive, "Downloading and streaming track");

        let stream = self.downloader.stream_audio(&directive)?;

        let engine = Arc::clone(self);
        let stream = OnDropStream::new(stream, move || {
            engine.schedule_save(record, class, auth_query);
        });

        Ok(StreamSource::Streaming(Box::pin(stream)))
    }

    /// Saves a track in the background. Returns `false` when the task was
    /// dropped because the pool is saturated.
    pub(crate) fn schedule_save(
        self: &Arc<Self>,
        record: ItunesRecord,
        class: StorageClass,
        auth_query: String,
    ) -> bool {
        let label = format!("save-{}", track_label(&record));
        let engine = Arc::clone(self);

        self.background_tasks.spawn(&label, async move {
            if let Err(error) = engine.save_track(&record, class, &auth_query).await {
                error!(?error, track = %track_label(&record), "Unable to save track");
            }
        })
    }

    /// Resolves and saves a track in the background.
    pub(crate) fn schedule_save_by_id(
        self: &Arc<Self>,
        track_id: TrackId,
        class: StorageClass,
        auth_query: String,
    ) -> bool {
        let label = format!("save-{}", track_id);
        let engine = Arc::clone(self);

        self.background_tasks.spawn(&label, async move {
            let record = match engine
                .resolve_track(&track_id, DETACHED_LOOKUP_TIMEOUT)
                .await
            {
                Ok(record) => record,
                Err(error) => {
                    warn!(?error, %track_id, "Background lookup failed");
                    return;
                }
            };

            if let Err(error) = engine.save_track(&record, class, &auth_query).await {
                error!(?error, %track_id, "Unable to save track");
            }
        })
    }

    /// One-shot save of a track to its library path, followed by a library
    /// rescan. Concurrent saves of the same track overwrite each other.
    pub(crate) async fn save_track(
        &self,
        record: &ItunesRecord,
        class: StorageClass,
        auth_query: &str,
    ) -> Result<SaveOutcome, AcquisitionError> {
        let target = self.track_path(record, class);

        if file_exists(&target).await {
            debug!(path = %target.display(), "Track is already present");
            return Ok(SaveOutcome::AlreadyPresent);
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!(path = %target.display(), "Saving track to library");

        let metadata = AudioMetadata::from_record(record);
        let artwork = self.fetch_artwork(record).await;
        let request = SaveRequest {
            directive: SearchDirective::for_track(&metadata),
            metadata: metadata.without_single_quotes(),
            target: target.clone(),
            artwork: artwork.clone(),
        };

        let result = self.downloader.save_audio(&request).await;

        if let Some(artwork) = artwork {
            if let Err(error) = tokio::fs::remove_file(&artwork).await {
                warn!(?error, path = %artwork.display(), "Unable to remove temporary artwork");
            }
        }

        result?;

        info!(path = %target.display(), "Track saved");

        if let Err(error) = self.library_scanner.trigger_scan(auth_query).await {
            warn!(?error, "Library scan trigger failed");
        }

        Ok(SaveOutcome::Saved)
    }

    /// Writes the upgraded artwork to a temporary file. Any failure yields `None`.
    async fn fetch_artwork(&self, record: &ItunesRecord) -> Option<PathBuf> {
        let url = upgrade_artwork_url(record.artwork_url100.as_deref());

        if url.is_empty() {
            return None;
        }

        let bytes = match self
            .artwork_source
            .fetch_artwork(&url, INTERACTIVE_TIMEOUT)
            .await
        {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(?error, %url, "Unable to fetch artwork");
                return None;
            }
        };

        let path = std::env::temp_dir().join(format!("cover-{}.jpg", Uuid::new_v4()));

        match tokio::fs::write(&path, bytes).await {
            Ok(()) => Some(path),
            Err(error) => {
                warn!(?error, path = %path.display(), "Unable to write temporary artwork");
                None
            }
        }
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn track_label(record: &ItunesRecord) -> String {
    record
        .track_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| record.track_name.clone())
}
