use crate::config::Config;
use crate::services::track_acquisition::LibraryLayout;
use crate::services::{
    BackgroundTasks, CacheSweeper, NavidromeClient, TrackAcquisition, YtDlpDownloader,
    CACHE_RETENTION, SWEEP_INTERVAL,
};
use crate::types::StorageClass;
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{middleware, web, App, HttpServer};
use futures_lite::FutureExt;
use itunes_catalog::ItunesClient;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod http;
mod services;
mod subsonic;
mod types;
mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::from(Config::from_env());

    info!(version = VERSION, "Starting application...");

    let itunes_client = Arc::new(
        ItunesClient::create(&config.itunes_endpoint).expect("Unable to initialize iTunes client"),
    );
    let navidrome_client = Arc::new(
        NavidromeClient::create(&config.navidrome_base)
            .expect("Unable to initialize Navidrome client"),
    );
    let downloader = Arc::new(YtDlpDownloader::new(&config.ytdlp_path));
    let background_tasks = Arc::new(BackgroundTasks::new(
        config.background_tasks_limit,
        config.background_task_timeout(),
    ));
    let layout = LibraryLayout::new(&config.music_library_path);

    let cache_sweeper = Arc::new(CacheSweeper::new(
        layout.class_root(StorageClass::Cached),
        CACHE_RETENTION,
    ));

    let track_acquisition = Arc::new(TrackAcquisition::new(
        itunes_client.clone(),
        itunes_client.clone(),
        downloader,
        navidrome_client.clone(),
        background_tasks,
        layout,
    ));

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&itunes_client)))
                .app_data(Data::new(Arc::clone(&navidrome_client)))
                .app_data(Data::new(Arc::clone(&track_acquisition)))
                .wrap(http::cors_headers())
                .wrap(middleware::Logger::default())
                .configure(http::configure)
                .default_service(web::to(http::passthrough))
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    cache_sweeper.start(SWEEP_INTERVAL);

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    server_handle.stop(true).await;

    Ok(())
}
