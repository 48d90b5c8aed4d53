//! Route labels for spans and metrics.

use uuid::Uuid;

/// Collapse id segments so every order or line shares one label.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
