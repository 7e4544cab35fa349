mod background_tasks;
pub(crate) use background_tasks::*;

mod cache_sweeper;
pub(crate) use cache_sweeper::*;

mod navidrome_client;
pub(crate) use navidrome_client::*;

pub(crate) mod track_acquisition;
pub(crate) use track_acquisition::TrackAcquisition;

mod ytdlp_downloader;
pub(crate) use ytdlp_downloader::*;
