use itunes_catalog::TrackId;
use std::borrow::Cow;
use std::time::Duration;

/// Marks identifiers that live in the external catalog rather than upstream.
pub(crate) const PROVIDER_TAG: &str = "itunes";

/// Bound for provider lookups and artwork fetches made while a caller waits.
pub(crate) const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound for upstream fetches that are decoded before replying.
pub(crate) const UPSTREAM_DECODE_TIMEOUT: Duration = Duration::from_secs(12);
pub(crate) const DETACHED_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

const VIRTUAL_PREFIX: &str = "itunes-";
const COVER_DIRECT_PREFIX: &str = "itunes-cover-";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Malformed identifier: {0}")]
pub(crate) struct MalformedIdentifier(pub(crate) String);

/// An identifier as seen on the protocol surface, classified by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ItemId {
    Native(String),
    Virtual(u64),
    VirtualCoverDirect(String),
    VirtualCoverLookup(TrackId),
}

impl ItemId {
    /// Classifies an `id` parameter. Cover-direct ids are recognised before the
    /// generic virtual prefix, which they extend.
    pub(crate) fn classify(id: &str) -> Result<Self, MalformedIdentifier> {
        if let Some(escaped_url) = id.strip_prefix(COVER_DIRECT_PREFIX) {
            return unescape_cover_url(escaped_url).map(ItemId::VirtualCoverDirect);
        }

        match id.strip_prefix(VIRTUAL_PREFIX) {
            Some(external_id) => external_id
                .parse::<u64>()
                .map(ItemId::Virtual)
                .map_err(|_| MalformedIdentifier(id.to_string())),
            None => Ok(ItemId::Native(id.to_string())),
        }
    }

    /// Same as [`ItemId::classify`], but reads a generic virtual id as a track
    /// whose artwork has to be looked up.
    pub(crate) fn classify_cover(id: &str) -> Result<Self, MalformedIdentifier> {
        match Self::classify(id)? {
            ItemId::Virtual(track_id) => Ok(ItemId::VirtualCoverLookup(TrackId(track_id))),
            other => Ok(other),
        }
    }
}

pub(crate) fn virtual_id(external_id: u64) -> String {
    format!("{}{}", VIRTUAL_PREFIX, external_id)
}

pub(crate) fn cover_direct_id(url: &str) -> String {
    format!("{}{}", COVER_DIRECT_PREFIX, escape_cover_url(url))
}

pub(crate) fn escape_cover_url(url: &str) -> Cow<'_, str> {
    urlencoding::encode(url)
}

pub(crate) fn unescape_cover_url(escaped: &str) -> Result<String, MalformedIdentifier> {
    urlencoding::decode(escaped)
        .map(Cow::into_owned)
        .map_err(|_| MalformedIdentifier(escaped.to_string()))
}

/// Which subtree of the music library an acquired file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorageClass {
    /// Swept once older than the retention window.
    Cached,
    Downloads,
}

impl StorageClass {
    pub(crate) fn dir_name(&self) -> &'static str {
        match self {
            StorageClass::Cached => "cached",
            StorageClass::Downloads => "downloads",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_native_ids_as_is() {
        assert_eq!(
            ItemId::classify("a1b2c3").unwrap(),
            ItemId::Native("a1b2c3".into())
        );
        assert_eq!(ItemId::classify("").unwrap(), ItemId::Native("".into()));
        assert_eq!(
            ItemId::classify("itunes").unwrap(),
            ItemId::Native("itunes".into())
        );
    }

    #[test]
    fn should_classify_virtual_track_ids() {
        assert_eq!(ItemId::classify("itunes-555").unwrap(), ItemId::Virtual(555));
    }

    #[test]
    fn should_reject_malformed_virtual_ids() {
        for id in ["itunes-", "itunes-abc", "itunes-12x", "itunes--5", "itunes-1.5"] {
            assert_eq!(
                ItemId::classify(id),
                Err(MalformedIdentifier(id.to_string())),
                "{id}"
            );
        }
    }

    #[test]
    fn should_check_cover_direct_prefix_first() {
        let id = cover_direct_id("https://is1.mzstatic.com/image/600x600bb.jpg?a=1&b=2");

        assert_eq!(
            ItemId::classify(&id).unwrap(),
            ItemId::VirtualCoverDirect("https://is1.mzstatic.com/image/600x600bb.jpg?a=1&b=2".into())
        );
    }

    #[test]
    fn should_read_virtual_ids_as_cover_lookups_on_cover_route() {
        assert_eq!(
            ItemId::classify_cover("itunes-42").unwrap(),
            ItemId::VirtualCoverLookup(TrackId(42))
        );
        assert_eq!(
            ItemId::classify_cover("al-17").unwrap(),
            ItemId::Native("al-17".into())
        );
        assert!(ItemId::classify_cover("itunes-x").is_err());
    }

    #[test]
    fn should_round_trip_cover_urls() {
        for url in [
            "",
            "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/ab/cd/600x600bb.jpg",
            "http://host/a path/with spaces+plus%percent?x=1&y=ü#frag",
            "日本語/ñ/🎵",
            "%41%zz%",
        ] {
            assert_eq!(unescape_cover_url(&escape_cover_url(url)).unwrap(), url);
        }
    }

    #[test]
    fn should_encode_virtual_ids() {
        assert_eq!(virtual_id(555), "itunes-555");
        assert!(cover_direct_id("http://x/y").starts_with("itunes-cover-http%3A%2F%2Fx%2Fy"));
    }
}
