//! Object key generation for uploaded files
//!
//! Keys are partitioned by upload time (UTC) and end with a slugified,
//! lowercase copy of the original filename:
//! `2024/03/07/091502/co_phai_khong_vay_nhi.png`

use chrono::{DateTime, Datelike, Timelike, Utc};
use deunicode::deunicode;
use lazy_static::lazy_static;
use regex::Regex;

/// Separator used between words of a slug
pub const SLUG_SEPARATOR: &str = "_";

/// Prefix of the generated name used when an upload carries no filename
pub const FALLBACK_NAME_PREFIX: &str = "unnamed_";

/// Extension of the generated fallback name
pub const FALLBACK_NAME_EXTENSION: &str = ".png";

lazy_static! {
    /// Anything that is not a word character, a dot, a hyphen or whitespace
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-\s]+").unwrap();

    /// Runs of whitespace and underscores collapse into a single separator
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[\s_]+").unwrap();
}

/// Turn an arbitrary string into an ASCII token usable as a path segment.
///
/// Unicode is transliterated (`"Có phải"` → `"Co phai"`), characters other
/// than ASCII alphanumerics, `.`, `-` and `_` are dropped, whitespace runs
/// become a single `_`. Case is preserved.
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let cleaned = DISALLOWED_CHARS.replace_all(&ascii, "");
    let joined = SEPARATOR_RUNS.replace_all(cleaned.trim(), SLUG_SEPARATOR);

    joined.trim_matches('_').to_string()
}

/// Generate a storage key for `original_filename` at the current UTC time
pub fn generate_filename(original_filename: &str) -> String {
    generate_filename_at(original_filename, Utc::now())
}

/// Generate a storage key for `original_filename` at the given instant
///
/// Layout: `<year>/<MM>/<DD>/<HHMMSS>/<slug>`. The slug may be empty, in
/// which case the key ends with `/`.
pub fn generate_filename_at(original_filename: &str, now: DateTime<Utc>) -> String {
    let slugged = slugify(original_filename).to_lowercase();

    format!(
        "{}/{:02}/{:02}/{:02}{:02}{:02}/{}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        slugged
    )
}

/// Placeholder filename for uploads that arrive without one
pub fn random_name() -> String {
    random_name_at(Utc::now())
}

fn random_name_at(now: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        FALLBACK_NAME_PREFIX,
        now.timestamp_millis(),
        FALLBACK_NAME_EXTENSION
    )
}
