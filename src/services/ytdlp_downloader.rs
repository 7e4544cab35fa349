use crate::services::track_acquisition::{
    AudioStream, DownloaderError, SaveRequest, SearchDirective,
};
use actix_rt::task::JoinHandle;
use actix_web::web::Bytes;
use futures_lite::Stream;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Tag, TagExt};
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, warn};

const STDERR_TAIL_LENGTH: usize = 2000;

#[derive(Debug, thiserror::Error)]
enum EmbedArtworkError {
    #[error(transparent)]
    LoftyError(#[from] lofty::error::LoftyError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("No writable tag")]
    NoWritableTag,
}

/// Runs `yt-dlp` to find and extract audio.
pub(crate) struct YtDlpDownloader {
    binary: String,
}

impl YtDlpDownloader {
    pub(crate) fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// The child is killed once the returned stream is dropped. Its exit
    /// status is logged after the output ends.
    pub(crate) fn stream_audio(
        &self,
        directive: &SearchDirective,
    ) -> Result<AudioStream, DownloaderError> {
        let mut child = Command::new(&self.binary)
            .args(stream_args(directive))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child.stdout.take().ok_or(DownloaderError::MissingOutput)?;
        let stderr = child.stderr.take().ok_or(DownloaderError::MissingOutput)?;

        debug!(%directive, pid = ?child.id(), "Downloader started");

        Ok(Box::pin(ChildOutputStream {
            child: Some(child),
            stderr: Some(actix_rt::spawn(collect_stderr(stderr))),
            output: ReaderStream::new(stdout),
            directive: directive.to_string(),
        }))
    }

    pub(crate) async fn save_audio(&self, request: &SaveRequest) -> Result<(), DownloaderError> {
        let output = Command::new(&self.binary)
            .args(save_args(request))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(DownloaderError::ExitFailure {
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        if !tokio::fs::try_exists(&request.target).await.unwrap_or(false) {
            return Err(DownloaderError::MissingOutput);
        }

        if let Some(artwork) = &request.artwork {
            let target = request.target.clone();
            let artwork = artwork.clone();

            match actix_web::web::block(move || embed_front_cover(&target, &artwork)).await {
                Ok(Ok(())) => debug!("Artwork embedded"),
                Ok(Err(error)) => warn!(?error, "Unable to embed artwork"),
                Err(error) => warn!(?error, "Artwork embedding task failed"),
            }
        }

        info!(path = %request.target.display(), "Downloader finished");

        Ok(())
    }
}

struct ChildOutputStream {
    child: Option<Child>,
    stderr: Option<JoinHandle<Vec<u8>>>,
    output: ReaderStream<ChildStdout>,
    directive: String,
}

impl Stream for ChildOutputStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.output).poll_next(cx);

        if let Poll::Ready(None) = polled {
            if let (Some(child), Some(stderr)) = (this.child.take(), this.stderr.take()) {
                let directive = std::mem::take(&mut this.directive);

                actix_rt::spawn(async move {
                    match wait_for_exit(child, stderr).await {
                        Ok(()) => debug!(%directive, "Downloader finished streaming"),
                        Err(error) => error!(?error, %directive, "Streaming downloader failed"),
                    }
                });
            }
        }

        polled
    }
}

/// Drained while the child runs so a full pipe never stalls it.
async fn collect_stderr(mut stderr: ChildStderr) -> Vec<u8> {
    let mut buffer = vec![];
    if let Err(error) = stderr.read_to_end(&mut buffer).await {
        debug!(?error, "Unable to read downloader stderr");
    }

    buffer
}

async fn wait_for_exit(
    mut child: Child,
    stderr: JoinHandle<Vec<u8>>,
) -> Result<(), DownloaderError> {
    let status = child.wait().await?;
    let stderr = stderr.await.unwrap_or_default();

    if status.success() {
        return Ok(());
    }

    Err(DownloaderError::ExitFailure {
        code: status.code(),
        stderr: stderr_tail(&stderr),
    })
}

fn stream_args(directive: &SearchDirective) -> Vec<String> {
    vec![
        "-x".into(),
        "--audio-format".into(),
        "mp3".into(),
        "-o".into(),
        "-".into(),
        "--no-playlist".into(),
        directive.to_string(),
    ]
}

fn save_args(request: &SaveRequest) -> Vec<String> {
    let metadata = &request.metadata;
    let postprocessor_args = format!(
        "ffmpeg:-metadata title='{}' -metadata artist='{}' -metadata album='{}'",
        metadata.title, metadata.artist, metadata.album
    );

    vec![
        "-x".into(),
        "--audio-format".into(),
        "mp3".into(),
        "--add-metadata".into(),
        "--postprocessor-args".into(),
        postprocessor_args,
        "-o".into(),
        output_template(&request.target),
        "--no-playlist".into(),
        "--embed-thumbnail".into(),
        request.directive.to_string(),
    ]
}

/// `%` starts a field in the output template.
fn output_template(target: &Path) -> String {
    target.to_string_lossy().replace('%', "%%")
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .nth(STDERR_TAIL_LENGTH)
        .map(|(index, _)| index)
        .unwrap_or(0);

    trimmed[start..].to_string()
}

/// Replaces the front cover of the file's primary tag.
fn embed_front_cover(target: &Path, artwork: &Path) -> Result<(), EmbedArtworkError> {
    let mut tagged_file = lofty::read_from_path(target)?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or(EmbedArtworkError::NoWritableTag)?;

    let mut reader = std::fs::File::open(artwork)?;
    let mut picture = Picture::from_reader(&mut reader)?;
    picture.set_pic_type(PictureType::CoverFront);

    tag.remove_picture_type(PictureType::CoverFront);
    tag.push_picture(picture);
    tag.save_to_path(target, WriteOptions::default())?;

    Ok(())
}
