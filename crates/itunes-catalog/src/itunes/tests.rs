use crate::itunes::parser::{parse_results, retain_tracks};
use crate::{
    upgrade_artwork_url, CollectionId, Entity, ItunesClient, ItunesClientError, Media, TrackId,
    WrapperType,
};
use actix_web::{web, App, HttpResponse, HttpServer};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_parsing_of_search_results() {
    let results = parse_results(include_str!("fixtures/search_songs.json").as_bytes())
        .expect("Expected successful parse results");

    assert_eq!(2, results.len());

    let first = &results[0];
    assert_eq!(WrapperType::Track, first.wrapper_type);
    assert_eq!(Some(TrackId(1440857786)), first.track_id);
    assert_eq!(Some(CollectionId(1440857781)), first.collection_id);
    assert_eq!("Alice", first.artist_name);
    assert_eq!("Wonderland", first.collection_name);
    assert_eq!("Song", first.track_name);
    assert_eq!(Some(180000), first.track_time_millis);
    assert_eq!(180, first.duration_seconds());
    assert_eq!(Some(3), first.track_number);
    assert_eq!(Some("Rock".to_string()), first.primary_genre_name);
}

#[test]
fn test_retaining_only_tracks_from_album_lookup() {
    let results = parse_results(include_str!("fixtures/lookup_album.json").as_bytes())
        .expect("Expected successful parse results");

    assert_eq!(3, results.len());
    assert_eq!(WrapperType::Collection, results[0].wrapper_type);

    let tracks = retain_tracks(results);

    assert_eq!(2, tracks.len());
    assert!(tracks.iter().all(|track| track.is_track()));
}

#[test]
fn test_unknown_wrapper_type_is_not_a_track() {
    let results = parse_results(
        br#"{"resultCount":1,"results":[{"wrapperType":"audiobook","trackName":"Book"}]}"#,
    )
    .expect("Expected successful parse results");

    assert_eq!(WrapperType::Other, results[0].wrapper_type);
    assert!(retain_tracks(results).is_empty());
}

#[test]
fn test_parsing_of_malformed_body_fails() {
    assert!(parse_results(b"<html>Service Unavailable</html>").is_err());
}

#[test]
fn test_artwork_upgrade() {
    assert_eq!(
        "https://is1-ssl.mzstatic.com/image/thumb/x/600x600bb.jpg",
        upgrade_artwork_url(Some("https://is1-ssl.mzstatic.com/image/thumb/x/100x100bb.jpg"))
    );
    assert_eq!(
        "https://example.com/cover.jpg",
        upgrade_artwork_url(Some("https://example.com/cover.jpg"))
    );
    assert_eq!("", upgrade_artwork_url(Some("")));
    assert_eq!("", upgrade_artwork_url(None));
}

async fn start_fake_provider(status: u16, lookup_body: &'static str) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .route(
                "/lookup",
                web::get().to(move || async move {
                    HttpResponse::build(
                        actix_web::http::StatusCode::from_u16(status).unwrap(),
                    )
                    .content_type("text/javascript; charset=utf-8")
                    .body(lookup_body)
                }),
            )
            .route(
                "/search",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/javascript; charset=utf-8")
                        .body(include_str!("fixtures/search_songs.json"))
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let address = server.addrs()[0];
    actix_rt::spawn(server.run());

    format!("http://{}", address)
}

#[actix_rt::test]
async fn test_lookup_album_tracks_filters_containers() {
    let endpoint = start_fake_provider(200, include_str!("fixtures/lookup_album.json")).await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let tracks = client
        .lookup_album_tracks(&CollectionId(1440857781), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(2, tracks.len());
    assert_eq!("Song", tracks[0].track_name);
}

#[actix_rt::test]
async fn test_lookup_album_tracks_without_tracks_yields_no_results() {
    let endpoint =
        start_fake_provider(200, include_str!("fixtures/lookup_collection_only.json")).await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let result = client
        .lookup_album_tracks(&CollectionId(1440857781), TIMEOUT)
        .await;

    assert!(matches!(result, Err(ItunesClientError::NoResults)));
}

#[actix_rt::test]
async fn test_non_success_status_is_unavailable() {
    let endpoint = start_fake_provider(503, "{}").await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let error = client
        .lookup_track(&TrackId(555), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(error, ItunesClientError::UnexpectedStatus(503)));
    assert!(error.is_unavailable());
}

#[actix_rt::test]
async fn test_undecodable_body_is_parse_error() {
    let endpoint = start_fake_provider(200, "not json").await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let error = client
        .lookup_track(&TrackId(555), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(error, ItunesClientError::ParseError(_)));
    assert!(!error.is_unavailable());
}

#[actix_rt::test]
async fn test_search_returns_records() {
    let endpoint = start_fake_provider(200, "{}").await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let results = client
        .search("Alice - Song", Media::Music, Entity::Song, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(2, results.len());
    assert_eq!(Some(TrackId(1440857790)), results[1].track_id);
}

#[actix_rt::test]
async fn test_lookup_track_ignores_container_records() {
    let endpoint =
        start_fake_provider(200, include_str!("fixtures/lookup_collection_only.json")).await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let track = client
        .lookup_track(&TrackId(1440857781), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(None, track);
}

#[actix_rt::test]
async fn test_lookup_track_returns_matching_track() {
    let endpoint = start_fake_provider(200, include_str!("fixtures/lookup_album.json")).await;
    let client = ItunesClient::create(&endpoint).unwrap();

    let track = client
        .lookup_track(&TrackId(1440857790), TIMEOUT)
        .await
        .unwrap()
        .expect("Expected a track");

    assert!(track.is_track());
    assert_eq!(Some(TrackId(1440857790)), track.track_id);
}
