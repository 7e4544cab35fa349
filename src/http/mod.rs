use actix_web::{guard, middleware, web, Resource};

mod album;
mod cover_art;
mod error;
mod health;
mod params;
mod passthrough;
mod playlist;
mod search;
mod song;
mod stream;


pub(crate) use album::get_album;
pub(crate) use cover_art::get_cover_art;
pub(crate) use health::{healthz, preflight};
pub(crate) use passthrough::passthrough;
pub(crate) use playlist::mutate_playlist;
pub(crate) use search::{search2, search3};
pub(crate) use song::get_song;
pub(crate) use stream::{download, stream};

pub(crate) fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add((
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        ))
        .add(("Access-Control-Allow-Headers", "*"))
        .add((
            "Access-Control-Expose-Headers",
            "X-Content-Duration, X-Total-Count, X-Nd-Authorization",
        ))
}

/// Every claimed route is served both with and without the `.view` suffix.
fn rest_route(name: &str) -> Resource {
    web::resource([format!("/rest/{}", name), format!("/rest/{}.view", name)])
}

/// Registers the claimed routes. Anything else belongs to the default service.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(preflight),
    )
    .service(web::resource("/healthz").route(web::get().to(healthz)))
    .service(rest_route("getSong").to(get_song))
    .service(rest_route("stream").to(stream))
    .service(rest_route("download").to(download))
    .service(rest_route("createPlaylist").to(mutate_playlist))
    .service(rest_route("updatePlaylist").to(mutate_playlist))
    .service(rest_route("savePlayQueue").to(mutate_playlist))
    .service(rest_route("getAlbum").to(get_album))
    .service(rest_route("getCoverArt").to(get_cover_art))
    .service(rest_route("search2").to(search2))
    .service(rest_route("search3").to(search3));
}
