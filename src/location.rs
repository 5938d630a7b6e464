use anyhow::{anyhow, Result};

/// Resolves a comic identifier from CLI or config input. Accepts either the
/// bare identifier or one of the reader path shapes served by the two server
/// generations: `/{comic}/reader.html` and `/read/{comic}`.
pub fn resolve_comic(input: &str) -> Result<String> {
    if !input.contains('/') {
        if is_identifier(input) {
            return Ok(input.to_string());
        }
        return Err(anyhow!("invalid comic identifier {:?}", input));
    }
    comic_from_path(input)
        .ok_or_else(|| anyhow!("no comic identifier found in path {:?}", input))
}

pub fn comic_from_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments[..] {
        [comic, "reader.html"] if is_identifier(comic) => Some(comic.to_string()),
        ["read", comic] if is_identifier(comic) => Some(comic.to_string()),
        _ => None,
    }
}

/// Reads a starting page the way the browser reader reads the URL fragment:
/// leading `#` stripped, percent-decoded, empty meaning "no page named".
pub fn start_page(raw: &str) -> Option<String> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    match urlencoding::decode(raw) {
        Ok(page) => Some(page.into_owned()),
        Err(_) => Some(raw.to_string()),
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifier_passes_through() {
        assert_eq!(resolve_comic("one_piece").unwrap(), "one_piece");
    }

    #[test]
    fn reader_html_path_shape() {
        assert_eq!(resolve_comic("/naruto/reader.html").unwrap(), "naruto");
    }

    #[test]
    fn read_prefix_path_shape() {
        assert_eq!(resolve_comic("/read/naruto").unwrap(), "naruto");
    }

    #[test]
    fn unrecognized_paths_are_rejected() {
        assert!(resolve_comic("/naruto/index.html").is_err());
        assert!(resolve_comic("/read/naruto/extra").is_err());
        assert!(resolve_comic("/read/").is_err());
        assert!(resolve_comic("bad comic").is_err());
    }

    #[test]
    fn start_page_decodes_the_fragment() {
        assert_eq!(start_page("#3.jpg"), Some("3.jpg".into()));
        assert_eq!(start_page("p%20001.jpg"), Some("p 001.jpg".into()));
        assert_eq!(start_page("#"), None);
        assert_eq!(start_page(""), None);
    }
}
