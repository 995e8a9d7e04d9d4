//! Turning derived file paths into URLs.
//!
//! - [`filepath_to_uri`] percent-encodes a relative file path.
//! - [`join`] resolves that path against a base URL (RFC 3986 §5.2).
//!
//! The scheme and authority of the base are kept exactly as written (host
//! case, explicit default ports). Only the path is resolved, against a
//! throwaway origin that is cut off again afterwards, which also covers
//! site-relative bases such as `/media/` that `url::Url` cannot parse on its
//! own.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::{Position, Url};

/// Bytes left literal when encoding a file path: unreserved characters plus
/// `/~!*()'`. Everything else, non-ASCII included, becomes `%XX`.
const FILEPATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')')
    .remove(b'\'');

/// Origin the path of a base URL is resolved against.
const RELATIVE_ORIGIN: &str = "http://relative.invalid/";

/// Percent-encode a file path for inclusion in a URI.
///
/// Backslashes are treated as path separators.
pub fn filepath_to_uri(path: &str) -> String {
    utf8_percent_encode(&path.replace('\\', "/"), FILEPATH_SAFE).to_string()
}

/// Byte offset of the `:` ending the scheme of `url`, if it has one.
fn scheme_end(url: &str) -> Option<usize> {
    let colon = url.find(':')?;
    let mut chars = url[..colon].chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(colon)
}

/// Split `base` into its `scheme://authority` prefix and the rest.
///
/// `start` is where the authority may begin (just past the scheme).
fn split_authority(base: &str, start: usize) -> (&str, &str) {
    match base[start..].strip_prefix("//") {
        Some(authority) => {
            let end = start + 2 + authority.find(['/', '?', '#']).unwrap_or(authority.len());
            base.split_at(end)
        }
        None => base.split_at(start),
    }
}

/// Resolve `reference` against `base`.
///
/// - `("https://cdn.test/media/", "a.jpg")` → `"https://cdn.test/media/a.jpg"`
/// - `("https://cdn.test/media", "a.jpg")` → `"https://cdn.test/a.jpg"`
/// - `("/media/", "a.jpg")` → `"/media/a.jpg"`
/// - `("//cdn.test/media/", "a.jpg")` → `"//cdn.test/media/a.jpg"`
/// - `("localhost:8000/", "a.jpg")` → `"a.jpg"` (opaque base, nothing to join)
///
/// The path of the base is normalised by `url` (spaces become `%20`). An
/// absolute base that `url` rejects falls back to plain concatenation after
/// its last `/`.
pub fn join(base: &str, reference: &str) -> String {
    let scheme = scheme_end(base);
    if scheme.is_some() && Url::parse(base).is_err() {
        return concat_after_last_slash(base, reference);
    }

    let (prefix, rest) = split_authority(base, scheme.map_or(0, |colon| colon + 1));
    let has_authority = prefix.contains("//");
    if scheme.is_some() && !has_authority && !rest.starts_with('/') {
        return reference.to_string();
    }

    let resolved = Url::parse(RELATIVE_ORIGIN)
        .and_then(|origin| origin.join(rest))
        .and_then(|base_url| base_url.join(reference));

    match resolved {
        Ok(url) if prefix.is_empty() && !rest.starts_with('/') => url[Position::BeforePath..]
            .trim_start_matches('/')
            .to_string(),
        Ok(url) => format!("{prefix}{}", &url[Position::BeforePath..]),
        Err(_) => concat_after_last_slash(base, reference),
    }
}

fn concat_after_last_slash(base: &str, reference: &str) -> String {
    let prefix = match base.rfind('/') {
        Some(pos) => &base[..=pos],
        None => "",
    };
    format!("{prefix}{reference}")
}
