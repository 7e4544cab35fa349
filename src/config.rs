use serde::Deserialize;
use std::time::Duration;

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_music_library_path() -> String {
    "/music".to_string()
}

fn default_ytdlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_itunes_endpoint() -> String {
    itunes_catalog::ITUNES_ENDPOINT.to_string()
}

fn default_background_tasks_limit() -> usize {
    16usize
}

fn default_background_task_timeout() -> u64 {
    600u64
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    pub(crate) navidrome_base: String,
    #[serde(default = "default_bind_address")]
    pub(crate) bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    pub(crate) shutdown_timeout: u64,
    #[serde(default = "default_music_library_path")]
    pub(crate) music_library_path: String,
    #[serde(default = "default_ytdlp_path")]
    pub(crate) ytdlp_path: String,
    #[serde(default = "default_itunes_endpoint")]
    pub(crate) itunes_endpoint: String,
    #[serde(default = "default_background_tasks_limit")]
    pub(crate) background_tasks_limit: usize,
    #[serde(default = "default_background_task_timeout")]
    pub(crate) background_task_timeout: u64,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        match envy::from_env::<Self>() {
            Ok(config) => config,
            Err(error) => panic!("Missing environment variable: {:#?}", error),
        }
    }

    pub(crate) fn background_task_timeout(&self) -> Duration {
        Duration::from_secs(self.background_task_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_defaults() {
        let config: Config = envy::from_iter([(
            "NAVIDROME_BASE".to_string(),
            "http://navidrome:4533".to_string(),
        )])
        .unwrap();

        assert_eq!(config.navidrome_base, "http://navidrome:4533");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.music_library_path, "/music");
        assert_eq!(config.ytdlp_path, "yt-dlp");
        assert_eq!(config.itunes_endpoint, "https://itunes.apple.com");
        assert_eq!(config.shutdown_timeout, 30);
        assert_eq!(config.background_tasks_limit, 16);
        assert_eq!(config.background_task_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn should_require_upstream_base() {
        let result = envy::from_iter::<_, Config>(Vec::<(String, String)>::new());

        assert!(result.is_err());
    }
}
