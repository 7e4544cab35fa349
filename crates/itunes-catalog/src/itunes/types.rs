/// Value of the `media` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    Music,
}

impl Media {
    pub fn as_str(&self) -> &'static str {
        match self {
            Media::Music => "music",
        }
    }
}

/// Value of the `entity` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Song,
    Album,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Song => "song",
            Entity::Album => "album",
        }
    }
}

/// Raw artwork response, relayed as-is by callers.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

const LOW_RES_ARTWORK_TOKEN: &str = "100x100bb";
const HIGH_RES_ARTWORK_TOKEN: &str = "600x600bb";

/// Rewrites a 100px artwork URL into its 600px variant.
pub fn upgrade_artwork_url(url: Option<&str>) -> String {
    match url {
        Some(url) if !url.is_empty() => url.replacen(LOW_RES_ARTWORK_TOKEN, HIGH_RES_ARTWORK_TOKEN, 1),
        _ => String::new(),
    }
}
