const RESERVED_PATH_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

pub(crate) fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Makes a string safe to use as a single path segment.
pub(crate) fn sanitize_path_segment(segment: &str) -> String {
    let replaced: String = segment
        .chars()
        .map(|c| {
            if RESERVED_PATH_CHARS.contains(&c) || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim();

    match trimmed {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}

/// Strips single quotes so the text survives the downloader's argument quoting.
pub(crate) fn strip_single_quotes(text: &str) -> String {
    text.replace('\'', "")
}
