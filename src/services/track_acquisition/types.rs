use crate::types::StorageClass;
use crate::utils::{sanitize_path_segment, strip_single_quotes};
use actix_web::web::Bytes;
use futures_lite::Stream;
use itunes_catalog::ItunesRecord;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

pub(crate) const AUDIO_EXTENSION: &str = "mp3";

pub(crate) type AudioStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>>>>;

/// Natural-language query handed to the downloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchDirective(String);

impl SearchDirective {
    pub(crate) fn for_track(metadata: &AudioMetadata) -> Self {
        Self(format!(
            "ytsearch1:{} - {} Audio",
            metadata.artist, metadata.title
        ))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AudioMetadata {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album: String,
}

impl AudioMetadata {
    pub(crate) fn from_record(record: &ItunesRecord) -> Self {
        Self {
            title: record.track_name.clone(),
            artist: record.artist_name.clone(),
            album: record.collection_name.clone(),
        }
    }

    /// Copy safe to embed inside single-quoted downloader arguments.
    pub(crate) fn without_single_quotes(&self) -> Self {
        Self {
            title: strip_single_quotes(&self.title),
            artist: strip_single_quotes(&self.artist),
            album: strip_single_quotes(&self.album),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SaveRequest {
    pub(crate) directive: SearchDirective,
    pub(crate) metadata: AudioMetadata,
    pub(crate) target: PathBuf,
    pub(crate) artwork: Option<PathBuf>,
}

/// How a stream request gets its audio.
pub(crate) enum StreamSource {
    Existing(PathBuf),
    Streaming(AudioStream),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    AlreadyPresent,
    Saved,
}

/// Places acquired files inside the music library.
#[derive(Debug, Clone)]
pub(crate) struct LibraryLayout {
    root: PathBuf,
}

impl LibraryLayout {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn class_root(&self, class: StorageClass) -> PathBuf {
        self.root.join(class.dir_name())
    }

    /// `<root>/<class>/<artist>/<album>/<title>.mp3`, every segment sanitized.
    pub(crate) fn track_path(&self, class: StorageClass, metadata: &AudioMetadata) -> PathBuf {
        self.class_root(class)
            .join(sanitize_path_segment(&metadata.artist))
            .join(sanitize_path_segment(&metadata.album))
            .join(format!(
                "{}.{}",
                sanitize_path_segment(&metadata.title),
                AUDIO_EXTENSION
            ))
    }
}

/// Runs a callback once the wrapped stream is dropped, whether it was read to
/// the end or abandoned halfway.
pub(crate) struct OnDropStream {
    inner: AudioStream,
    on_drop: Option<Box<dyn FnOnce()>>,
}

impl OnDropStream {
    pub(crate) fn new(inner: AudioStream, on_drop: impl FnOnce() + 'static) -> Self {
        Self {
            inner,
            on_drop: Some(Box::new(on_drop)),
        }
    }
}

impl Stream for OnDropStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for OnDropStream {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}
