//! Listing image selection and URL resolution.

use serde_json::Value;

use crate::types::RawPartRecord;

const PLACEHOLDER_IMAGE: &str = "placeholder-part.jpg";

/// URL of the stock image shown when a listing has none.
#[must_use]
pub fn placeholder_url(base_url: &str) -> String {
    format!("{}/{PLACEHOLDER_IMAGE}", base_url.trim_end_matches('/'))
}

/// Resolves an image reference from the API to an absolute URL.
///
/// Upload paths are served by the API host, absolute `http(s)` URLs pass
/// through unchanged, and any other relative reference is joined to the base
/// URL. A blank reference resolves to the placeholder.
#[must_use]
pub fn resolve_image_url(path: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim();
    if path.is_empty() {
        return placeholder_url(base);
    }
    if path.starts_with("/api/images/") || path.starts_with("/uploads/") {
        return format!("{base}{path}");
    }
    if path.starts_with("uploads/") {
        return format!("{base}/{path}");
    }
    if is_absolute_http(path) {
        return path.to_owned();
    }
    format!("{base}/{path}")
}

fn is_absolute_http(path: &str) -> bool {
    let head: String = path.chars().take(8).collect::<String>().to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

fn non_blank_strings(value: Option<&Value>) -> impl Iterator<Item = &str> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// The single image a listing card shows: the first usable entry of `image`
/// (array or string), then the first usable entry of `images`.
#[must_use]
pub fn listing_image(record: &RawPartRecord) -> Option<&str> {
    let from_image = match record.image.as_ref() {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        other => non_blank_strings(other).next(),
    };
    from_image.or_else(|| non_blank_strings(record.images.as_ref()).next())
}

/// Resolved URL of the listing image, or the placeholder.
#[must_use]
pub fn listing_image_url(record: &RawPartRecord, base_url: &str) -> String {
    listing_image(record).map_or_else(
        || placeholder_url(base_url),
        |path| resolve_image_url(path, base_url),
    )
}

/// Every image for the details gallery: all usable `images` entries, else all
/// usable `image` array entries, else the single listing image. Never empty.
#[must_use]
pub fn gallery_image_urls(record: &RawPartRecord, base_url: &str) -> Vec<String> {
    let resolve = |paths: Vec<&str>| -> Vec<String> {
        paths
            .into_iter()
            .map(|p| resolve_image_url(p, base_url))
            .collect()
    };

    let images: Vec<&str> = non_blank_strings(record.images.as_ref()).collect();
    if !images.is_empty() {
        return resolve(images);
    }
    let image_list: Vec<&str> = non_blank_strings(record.image.as_ref()).collect();
    if !image_list.is_empty() {
        return resolve(image_list);
    }
    vec![listing_image_url(record, base_url)]
}
