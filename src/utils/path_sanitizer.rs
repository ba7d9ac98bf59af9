// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Component, Path};

/// Name used when nothing usable survives sanitization
const FALLBACK_FILENAME: &str = "upload";

/// Sanitize a client-supplied upload filename
///
/// Keeps only the final path component and drops everything except
/// alphanumerics, dash, underscore and dot. Spaces become underscores.
/// Never returns an empty string or a dot-only name.
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on Windows may send the full client path
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            _ => None,
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Check that a stored name refers to a single entry directly inside the
/// storage directory
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
