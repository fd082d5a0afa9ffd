//! Turning scraped names into safe path components.

use std::path::{Component, Path};

/// Makes a scraped name usable as a single path component.
///
/// Replaces characters invalid on common filesystems (`/ \ : * ? " < > |`)
/// and control characters with `_`. A result that would still be a `.`/`..`
/// segment has its dots rewritten, and the empty string becomes `_`, so the
/// component can never escape the directory it is joined onto.
#[must_use]
pub fn sanitize_path_component(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_plain_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_plain_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
