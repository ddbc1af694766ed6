const FILENAME_PARAM: &str = "filename=";

/// Extracts the `filename=` parameter from a `Content-Disposition` header value.
///
/// The match is case-insensitive and stops at the next `;`. Surrounding
/// whitespace and one pair of double quotes are removed. Returns `None` when the
/// header is absent, has no such parameter, or the value is empty.
pub fn extract_file_name(header: Option<&str>) -> Option<String> {
    let header: &str = header?;
    let start: usize = header.to_ascii_lowercase().find(FILENAME_PARAM)? + FILENAME_PARAM.len();
    let rest: &str = &header[start..];
    let raw: &str = rest.split(';').next().unwrap_or_default().trim();

    let unquoted: &str = raw.strip_prefix('"').unwrap_or(raw);
    let unquoted: &str = unquoted.strip_suffix('"').unwrap_or(unquoted);

    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
