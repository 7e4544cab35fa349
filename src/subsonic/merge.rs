use crate::subsonic::models::{SearchVersion, SubsonicAlbum};
use crate::subsonic::synthesizer::to_song;
use crate::utils::eq_ignore_case;
use itunes_catalog::ItunesRecord;
use serde_json::Value;

/// Appends every external track whose title is not already listed. Returns the
/// number of songs appended; merging the same records again appends nothing.
pub(crate) fn merge_external_tracks(album: &mut SubsonicAlbum, records: &[ItunesRecord]) -> usize {
    let mut appended = 0;

    for record in records.iter().filter(|record| record.is_track()) {
        let already_listed = album
            .song
            .iter()
            .any(|song| eq_ignore_case(&song.title, &record.track_name));

        if already_listed {
            continue;
        }

        if let Some(song) = to_song(record) {
            album.song.push(song);
            appended += 1;
        }
    }

    album.song_count = album.song.len() as u64;

    appended
}

/// Whether a native search reply already carries songs. Only a non-empty list
/// or a single object counts; a missing field, null or an empty list does not.
pub(crate) fn has_native_songs(body: &Value, version: SearchVersion) -> bool {
    let song = body
        .get("subsonic-response")
        .and_then(|response| response.get(version.result_key()))
        .and_then(|result| result.get("song"));

    match song {
        Some(Value::Array(songs)) => !songs.is_empty(),
        Some(Value::Object(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsonic::models::{AlbumPayload, SubsonicResponse, SubsonicSong};
    use itunes_catalog::{TrackId, WrapperType};
    use serde_json::json;

    fn track(id: u64, title: &str) -> ItunesRecord {
        ItunesRecord {
            wrapper_type: WrapperType::Track,
            track_id: Some(TrackId(id)),
            track_name: title.into(),
            track_time_millis: Some(200000),
            ..ItunesRecord::default()
        }
    }

    fn native_album(titles: &[&str]) -> SubsonicAlbum {
        SubsonicAlbum {
            id: "al-1".into(),
            name: "Wonderland".into(),
            song_count: titles.len() as u64,
            song: titles
                .iter()
                .enumerate()
                .map(|(i, title)| SubsonicSong {
                    id: format!("tr-{}", i),
                    title: title.to_string(),
                    ..SubsonicSong::default()
                })
                .collect(),
            ..SubsonicAlbum::default()
        }
    }

    #[test]
    fn should_append_only_missing_titles() {
        let mut album = native_album(&["Song", "Intro"]);
        let records = vec![track(1, "song"), track(2, "Outro"), track(3, "INTRO")];

        let appended = merge_external_tracks(&mut album, &records);

        assert_eq!(appended, 1);
        assert_eq!(album.song_count, 3);
        assert_eq!(album.song[2].id, "itunes-2");
        assert_eq!(album.song[2].title, "Outro");
    }

    #[test]
    fn should_be_idempotent() {
        let records = vec![track(1, "Song"), track(2, "Outro"), track(3, "Bonus")];
        let mut once = native_album(&["Song"]);
        merge_external_tracks(&mut once, &records);

        let mut twice = once.clone();
        let appended = merge_external_tracks(&mut twice, &records);

        assert_eq!(appended, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn should_not_append_duplicate_titles_within_one_set() {
        let mut album = native_album(&[]);
        let records = vec![track(1, "Outro"), track(2, "outro")];

        merge_external_tracks(&mut album, &records);

        assert_eq!(album.song.len(), 1);
    }

    #[test]
    fn should_skip_container_records() {
        let mut album = native_album(&[]);
        let records = vec![ItunesRecord {
            wrapper_type: WrapperType::Collection,
            track_name: "Wonderland".into(),
            ..ItunesRecord::default()
        }];

        assert_eq!(merge_external_tracks(&mut album, &records), 0);
        assert_eq!(album.song_count, 0);
    }

    #[test]
    fn should_skip_tracks_without_track_id() {
        let mut album = native_album(&[]);
        let records = vec![
            ItunesRecord {
                track_id: None,
                ..track(0, "Orphan")
            },
            track(2, "Outro"),
        ];

        assert_eq!(merge_external_tracks(&mut album, &records), 1);
        assert_eq!(album.song[0].id, "itunes-2");
        assert_eq!(album.song_count, 1);
    }

    #[test]
    fn should_keep_unknown_native_fields_through_merge() {
        let raw = json!({
            "subsonic-response": {
                "status": "ok",
                "version": "1.16.1",
                "openSubsonic": true,
                "album": {
                    "id": "al-1",
                    "name": "Wonderland",
                    "songCount": 1,
                    "playCount": 4,
                    "song": [{"id": "tr-1", "title": "Song", "bitDepth": 16, "replayGain": {"trackGain": -1.5}}]
                }
            }
        });
        let mut decoded: SubsonicResponse<AlbumPayload> = serde_json::from_value(raw).unwrap();
        let album = decoded.body.payload.album.as_mut().unwrap();

        merge_external_tracks(album, &[track(7, "Outro")]);

        let encoded = serde_json::to_value(&decoded).unwrap();
        let album = &encoded["subsonic-response"]["album"];
        assert_eq!(encoded["subsonic-response"]["openSubsonic"], json!(true));
        assert_eq!(album["playCount"], json!(4));
        assert_eq!(album["songCount"], json!(2));
        assert_eq!(album["song"][0]["replayGain"]["trackGain"], json!(-1.5));
        assert_eq!(album["song"][1]["id"], json!("itunes-7"));
    }

    #[test]
    fn should_detect_native_songs_by_shape() {
        let with = |song: Value| json!({"subsonic-response": {"searchResult3": {"song": song}}});

        assert!(has_native_songs(&with(json!([{"id": "1"}])), SearchVersion::Search3));
        assert!(has_native_songs(&with(json!({"id": "1"})), SearchVersion::Search3));
        assert!(!has_native_songs(&with(json!([])), SearchVersion::Search3));
        assert!(!has_native_songs(&with(Value::Null), SearchVersion::Search3));
        assert!(!has_native_songs(&with(json!("x")), SearchVersion::Search3));
        assert!(!has_native_songs(
            &json!({"subsonic-response": {"searchResult3": {}}}),
            SearchVersion::Search3
        ));
        assert!(!has_native_songs(&json!({}), SearchVersion::Search3));
        assert!(!has_native_songs(&with(json!([{"id": "1"}])), SearchVersion::Search2));
    }
}
