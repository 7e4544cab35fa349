use crate::subsonic::models::{SubsonicAlbum, SubsonicSong};
use crate::types::{cover_direct_id, virtual_id, PROVIDER_TAG};
use itunes_catalog::{upgrade_artwork_url, ItunesRecord};
use serde_json::{Map, Value};

/// Bitrate assumed for every synthesized song, in kbit/s.
pub(crate) const ASSUMED_BITRATE_KBPS: u64 = 160;
pub(crate) const SYNTHESIZED_SUFFIX: &str = "mp3";
pub(crate) const SYNTHESIZED_CONTENT_TYPE: &str = "audio/mpeg";

pub(crate) fn estimated_size(duration_seconds: u64) -> u64 {
    duration_seconds * ASSUMED_BITRATE_KBPS * 1000 / 8
}

fn cover_art_id(record: &ItunesRecord) -> Option<String> {
    let artwork_url = upgrade_artwork_url(record.artwork_url100.as_deref());

    if artwork_url.is_empty() {
        None
    } else {
        Some(cover_direct_id(&artwork_url))
    }
}

fn release_year(record: &ItunesRecord) -> Option<u32> {
    record
        .release_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Returns `None` for records without a track id, which no virtual id could
/// resolve back to.
pub(crate) fn to_song(record: &ItunesRecord) -> Option<SubsonicSong> {
    let track_id = record.track_id?;
    let duration = record.duration_seconds();
    let album_id = record.collection_id.map(|id| virtual_id(*id));

    Some(SubsonicSong {
        id: virtual_id(*track_id),
        parent: album_id.clone(),
        title: record.track_name.clone(),
        album: non_empty(&record.collection_name),
        artist: non_empty(&record.artist_name),
        album_id,
        artist_id: record.artist_id.map(|id| virtual_id(*id)),
        track: record.track_number,
        disc_number: record.disc_number,
        year: release_year(record),
        genre: record.primary_genre_name.clone(),
        cover_art: cover_art_id(record),
        duration: Some(duration),
        size: Some(estimated_size(duration)),
        bit_rate: Some(ASSUMED_BITRATE_KBPS as u32),
        is_dir: Some(false),
        is_video: Some(false),
        suffix: Some(SYNTHESIZED_SUFFIX.to_string()),
        content_type: Some(SYNTHESIZED_CONTENT_TYPE.to_string()),
        transcoded_suffix: Some(SYNTHESIZED_SUFFIX.to_string()),
        transcoded_content_type: Some(SYNTHESIZED_CONTENT_TYPE.to_string()),
        media_kind: Some("music".to_string()),
        media_type: Some("song".to_string()),
        created: record.release_date.clone(),
        extra: Map::from_iter([("comment".to_string(), Value::from(PROVIDER_TAG))]),
    })
}

/// Builds an album document from any record carrying collection fields.
/// The song list starts out empty. Returns `None` without a collection id.
pub(crate) fn to_album(record: &ItunesRecord) -> Option<SubsonicAlbum> {
    let collection_id = record.collection_id?;
    let artist_id = record.artist_id.map(|id| virtual_id(*id));

    Some(SubsonicAlbum {
        id: virtual_id(*collection_id),
        parent: artist_id.clone(),
        album: Some(record.collection_name.clone()),
        title: Some(record.collection_name.clone()),
        name: record.collection_name.clone(),
        is_dir: Some(true),
        cover_art: cover_art_id(record),
        song_count: record.track_count.unwrap_or_default() as u64,
        artist: non_empty(&record.artist_name),
        artist_id,
        year: release_year(record),
        genre: record.primary_genre_name.clone(),
        created: record.release_date.clone(),
        song: vec![],
        extra: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itunes_catalog::{ArtistId, CollectionId, TrackId, WrapperType};

    fn record() -> ItunesRecord {
        ItunesRecord {
            wrapper_type: WrapperType::Track,
            kind: Some("song".into()),
            track_id: Some(TrackId(555)),
            artist_id: Some(ArtistId(11)),
            collection_id: Some(CollectionId(22)),
            artist_name: "Alice".into(),
            collection_name: "Wonderland".into(),
            track_name: "Song".into(),
            artwork_url100: Some("https://is1.mzstatic.com/img/100x100bb.jpg".into()),
            track_time_millis: Some(180000),
            primary_genre_name: Some("Rock".into()),
            track_count: Some(11),
            track_number: Some(3),
            disc_number: Some(1),
            release_date: Some("2004-03-15T08:00:00Z".into()),
        }
    }

    #[test]
    fn should_derive_duration_and_size() {
        let song = to_song(&record()).unwrap();

        assert_eq!(song.duration, Some(180));
        assert_eq!(song.size, Some(3_600_000));
    }

    #[test]
    fn should_prefix_identifiers_with_provider_tag() {
        let song = to_song(&record()).unwrap();

        assert_eq!(song.id, "itunes-555");
        assert_eq!(song.album_id.as_deref(), Some("itunes-22"));
        assert_eq!(song.parent.as_deref(), Some("itunes-22"));
        assert_eq!(song.artist_id.as_deref(), Some("itunes-11"));
    }

    #[test]
    fn should_build_cover_art_from_upgraded_artwork() {
        let song = to_song(&record()).unwrap();

        assert_eq!(
            song.cover_art.as_deref(),
            Some("itunes-cover-https%3A%2F%2Fis1.mzstatic.com%2Fimg%2F600x600bb.jpg")
        );
    }

    #[test]
    fn should_omit_cover_art_without_artwork() {
        let song = to_song(&ItunesRecord {
            artwork_url100: None,
            ..record()
        })
        .unwrap();

        assert_eq!(song.cover_art, None);
    }

    #[test]
    fn should_use_fixed_encoding_metadata() {
        let song = to_song(&record()).unwrap();

        assert_eq!(song.suffix.as_deref(), Some("mp3"));
        assert_eq!(song.content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(song.is_dir, Some(false));
        assert_eq!(song.year, Some(2004));
    }

    #[test]
    fn should_synthesize_deterministically() {
        let input = record();
        let first = serde_json::to_vec(&to_song(&input).unwrap()).unwrap();
        let second = serde_json::to_vec(&to_song(&input).unwrap()).unwrap();

        assert_eq!(first, second);
        assert_eq!(input, record());
    }

    #[test]
    fn should_synthesize_album_from_collection_fields() {
        let album = to_album(&record()).unwrap();

        assert_eq!(album.id, "itunes-22");
        assert_eq!(album.name, "Wonderland");
        assert_eq!(album.parent.as_deref(), Some("itunes-11"));
        assert_eq!(album.song_count, 11);
        assert_eq!(album.is_dir, Some(true));
        assert!(album.song.is_empty());
    }

    #[test]
    fn should_skip_records_without_provider_ids() {
        let song = to_song(&ItunesRecord {
            track_id: None,
            ..record()
        });
        let album = to_album(&ItunesRecord {
            collection_id: None,
            ..record()
        });

        assert_eq!(song, None);
        assert_eq!(album, None);
    }

    #[test]
    fn should_leave_album_links_out_without_collection_id() {
        let song = to_song(&ItunesRecord {
            collection_id: None,
            ..record()
        })
        .unwrap();

        assert_eq!(song.album_id, None);
        assert_eq!(song.parent, None);
    }
}
