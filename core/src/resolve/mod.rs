//! Canonical identifier extraction from scanned QR payloads.
//!
//! Scanners deliver heterogeneous strings: self-describing JSON payloads,
//! storage-bucket download URLs, verification URLs that wrap the identifier
//! in a `url=` query parameter, or the bare identifier itself. [`resolve`]
//! folds all of them into one canonical lookup key. It never fails: anything
//! it cannot recognize passes through trimmed, so every scan yields a
//! best-effort key.

use serde_json::Value;

/// Hostname fragment marking a storage-bucket download URL.
const STORAGE_HOST_MARKER: &str = "firebasestorage";

/// Path delimiter preceding the object name in a storage URL.
const OBJECT_DELIMITER: &str = "/o/";

/// JSON fields accepted as the identifier, in priority order. Older QR labels
/// carried `batchNumber`, the current generator emits `id`/`product_id`.
const IDENTIFIER_FIELDS: &[&str] = &["id", "product_id", "batchNumber"];

/// Extensions stripped from resolved identifiers: storage object names carry
/// the uploaded image's extension, the lookup key does not.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Resolves a raw scan payload into a canonical identifier string.
///
/// Recognized encodings are tried in order, first match wins:
/// 1. JSON object with an identifier field,
/// 2. storage-bucket URL (object name after `/o/`),
/// 3. `url=` query parameter,
/// 4. the whole string as-is.
///
/// Every branch gets the same post-processing: surrounding whitespace is
/// trimmed and one trailing image extension is stripped, case-insensitively.
/// Resolution is idempotent on its own output.
pub fn resolve(raw: &str) -> String {
    let candidate = from_json_payload(raw)
        .or_else(|| from_storage_url(raw))
        .or_else(|| from_query_param(raw))
        .unwrap_or_else(|| raw.to_string());

    strip_image_extension(candidate.trim()).trim().to_string()
}

/// Self-describing JSON payload carrying an identifier field.
///
/// A document that parses but carries none of the known fields (or carries
/// them as null) yields nothing, so the later branches still get a look.
fn from_json_payload(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let object = value.as_object()?;

    for field in IDENTIFIER_FIELDS {
        match object.get(*field) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }

    None
}

/// Storage-bucket download URL: the object name sits between `/o/` and the
/// query string.
fn from_storage_url(raw: &str) -> Option<String> {
    if !raw.contains(STORAGE_HOST_MARKER) {
        return None;
    }

    let start = raw.find(OBJECT_DELIMITER)? + OBJECT_DELIMITER.len();
    let rest = &raw[start..];

    strict_object_name(rest)
        .or_else(|| loose_object_name(rest))
        .map(str::to_string)
}

/// Strict form: a hex-ish object name (UUID-derived upload id) ending at `.`,
/// `?`, or end of string.
fn strict_object_name(rest: &str) -> Option<&str> {
    let end = rest
        .find(|c: char| !(c.is_ascii_hexdigit() || c == '-'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    match rest[end..].chars().next() {
        None | Some('.') | Some('?') => Some(&rest[..end]),
        _ => None,
    }
}

/// Loose fallback: everything up to the next path segment or query string.
fn loose_object_name(rest: &str) -> Option<&str> {
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// Verification-style URL wrapping the identifier in a `url=` parameter.
/// Without a `url` key the raw string passes through unchanged.
fn from_query_param(raw: &str) -> Option<String> {
    if !(raw.contains("?url=") || raw.contains("&url=")) {
        return None;
    }

    let (_, query) = raw.split_once('?')?;
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=')
            && key == "url"
        {
            return Some(percent_decode(value));
        }
    }

    None
}

/// Decodes `%XX` escapes; malformed escapes pass through untouched.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let Some(decoded) = hex_pair(bytes[i + 1], bytes[i + 2])
        {
            out.push(decoded);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

fn hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

fn strip_image_extension(value: &str) -> &str {
    if let Some((stem, extension)) = value.rsplit_once('.')
        && IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
    {
        return stem;
    }
    value
}

#[cfg(test)]
mod tests;
