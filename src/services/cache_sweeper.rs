use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info, warn};

pub(crate) const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub(crate) const CACHE_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SweepReport {
    pub(crate) files_removed: usize,
    pub(crate) dirs_removed: usize,
    pub(crate) skipped: usize,
}

/// Evicts stale files and empty directories below the ephemeral cache root.
pub(crate) struct CacheSweeper {
    root: PathBuf,
    retention: Duration,
}

impl CacheSweeper {
    pub(crate) fn new(root: PathBuf, retention: Duration) -> Self {
        Self { root, retention }
    }

    /// Runs a pass once per `period` until the process exits. The first pass
    /// happens one full period after start.
    pub(crate) fn start(self: Arc<Self>, period: Duration) {
        actix_rt::spawn(async move {
            let first_tick = actix_rt::time::Instant::now() + period;
            let mut interval = actix_rt::time::interval_at(first_tick, period);

            loop {
                interval.tick().await;
                self.run_cleanup_pass().await;
            }
        });
    }

    /// Walks the cache tree once. Unreadable entries are logged and skipped.
    /// Directories are checked for emptiness only after their children have
    /// been processed. The root itself is never removed.
    pub(crate) async fn run_cleanup_pass(&self) -> SweepReport {
        info!(root = %self.root.display(), "Running cache cleanup pass");

        let mut report = SweepReport::default();
        let mut pending = vec![self.root.clone()];
        let mut visited_dirs = vec![];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(error) if dir == self.root && error.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Cache root does not exist yet");
                    return report;
                }
                Err(error) => {
                    warn!(?error, dir = %dir.display(), "Unable to read cache directory");
                    report.skipped += 1;
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(error) => {
                        warn!(?error, dir = %dir.display(), "Unable to read cache entry");
                        report.skipped += 1;
                        break;
                    }
                };
                let path = entry.path();

                let metadata = match entry.metadata().await {
                    Ok(metadata) => metadata,
                    Err(error) => {
                        warn!(?error, path = %path.display(), "Unable to read cache entry metadata");
                        report.skipped += 1;
                        continue;
                    }
                };

                if metadata.is_dir() {
                    pending.push(path.clone());
                    visited_dirs.push(path);
                    continue;
                }

                let is_stale = metadata
                    .modified()
                    .map(|modified| self.is_stale(modified))
                    .unwrap_or(false);

                if is_stale {
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => {
                            debug!(path = %path.display(), "Removed stale cache file");
                            report.files_removed += 1;
                        }
                        Err(error) => {
                            warn!(?error, path = %path.display(), "Unable to remove cache file");
                            report.skipped += 1;
                        }
                    }
                }
            }
        }

        // Subdirectories are discovered after their parents, so walking the
        // list backwards visits children first.
        for dir in visited_dirs.iter().rev() {
            match is_empty_dir(dir).await {
                Ok(true) => match tokio::fs::remove_dir(dir).await {
                    Ok(()) => {
                        debug!(dir = %dir.display(), "Removed empty cache directory");
                        report.dirs_removed += 1;
                    }
                    Err(error) => {
                        warn!(?error, dir = %dir.display(), "Unable to remove cache directory");
                        report.skipped += 1;
                    }
                },
                Ok(false) => (),
                Err(error) => {
                    error!(?error, dir = %dir.display(), "Unable to check cache directory");
                    report.skipped += 1;
                }
            }
        }

        info!(?report, "Cache cleanup pass finished");

        report
    }

    fn is_stale(&self, modified: SystemTime) -> bool {
        SystemTime::now()
            .duration_since(modified)
            .map(|age| age > self.retention)
            .unwrap_or(false)
    }
}

async fn is_empty_dir(dir: &Path) -> std::io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;

    Ok(entries.next_entry().await?.is_none())
}
