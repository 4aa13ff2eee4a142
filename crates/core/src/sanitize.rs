//! File name tokens derived from display names.

/// Map a display name to a token usable in a file name.
///
/// Spaces become `_`; forward and back slashes become `-`. Every other
/// character, including ones some filesystems reject, is left untouched.
pub fn file_token(display_name: &str) -> String {
    display_name
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            other => other,
        })
        .collect()
}

/// Deck file name for a token: `<prefix><token>.pptx`.
pub fn deck_file_name(prefix: &str, token: &str) -> String {
    format!("{}{}.pptx", prefix, token)
}
