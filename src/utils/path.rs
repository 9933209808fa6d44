//! Path helpers for server-side file paths.
//!
//! Paths come from the Plex server, which may run on another OS, so they are
//! handled as strings and both `/` and `\` count as separators.

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Get the path relative to the library root folder.
///
/// The first location that prefixes `file` at a separator boundary is
/// stripped together with the separator. A filesystem root such as `/` strips
/// only the leading separators. If no location matches, the file name alone
/// is returned.
pub fn relative_path(file: &str, locations: &[String]) -> String {
    for location in locations {
        if location.is_empty() {
            continue;
        }
        let root = location.trim_end_matches(is_separator);
        if let Some(rest) = file.strip_prefix(root) {
            if rest.starts_with(is_separator) {
                let relative = rest.trim_start_matches(is_separator);
                if !relative.is_empty() {
                    return relative.to_string();
                }
            }
        }
    }

    file_name(file).to_string()
}

/// Last component of a server-side path.
pub fn file_name(file: &str) -> &str {
    file.rsplit(is_separator).next().unwrap_or(file)
}
