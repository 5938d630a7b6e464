use log::{debug, warn};

/// After this many failed mirror loads the mirror is abandoned for the rest
/// of the session.
pub const MIRROR_FAILURE_LIMIT: u32 = 10;

/// One image element of the reader. Holds the source it was last pointed at
/// so that a load failure can be attributed to the mirror or the origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlot {
    page: String,
    src: String,
}

impl ImageSlot {
    pub fn point_at(&mut self, page: &str, src: String) {
        self.page = page.to_string();
        self.src = src;
    }

    pub fn clear(&mut self) {
        self.page.clear();
        self.src.clear();
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }
}

/// Computes image URLs for a comic, preferring a configured mirror until it
/// has failed too often, then falling back to the origin `/img` root.
#[derive(Debug)]
pub struct ImageResolver {
    comic: String,
    mirror: Option<String>,
    failed_mirror_hits: u32,
}

impl ImageResolver {
    pub fn new(comic: &str, mirror: Option<String>) -> Self {
        ImageResolver {
            comic: comic.to_string(),
            mirror,
            failed_mirror_hits: 0,
        }
    }

    pub fn failed_mirror_hits(&self) -> u32 {
        self.failed_mirror_hits
    }

    pub fn mirror_active(&self) -> bool {
        self.mirror.is_some() && self.failed_mirror_hits < MIRROR_FAILURE_LIMIT
    }

    fn root(&self) -> String {
        match &self.mirror {
            Some(mirror) if self.failed_mirror_hits < MIRROR_FAILURE_LIMIT => {
                format!("{}/{}", mirror, self.comic)
            }
            _ => format!("/img/{}", self.comic),
        }
    }

    pub fn page_url(&self, page: &str) -> String {
        format!("{}/{}", self.root(), urlencoding::encode(page))
    }

    /// Reactive per-image degrade: when a slot fails to load and its source
    /// came from the mirror, charge the failure to the mirror and rewrite the
    /// slot to the equivalent origin URL. Origin failures are left alone.
    /// Returns whether the slot was rewritten.
    pub fn skip_mirror(&mut self, slot: &mut ImageSlot) -> bool {
        if slot.src.is_empty() || slot.src.starts_with('/') {
            return false;
        }
        let Some(mirror) = &self.mirror else {
            warn!("image {} failed from unknown root {}", slot.page, slot.src);
            return false;
        };
        self.failed_mirror_hits += 1;
        slot.src = slot.src.replacen(mirror.as_str(), "/img", 1);
        debug!(
            "mirror failed for {} ({} hits), degrading to {}",
            slot.page, self.failed_mirror_hits, slot.src
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_root_without_mirror() {
        let resolver = ImageResolver::new("naruto", None);
        assert_eq!(resolver.page_url("1.jpg"), "/img/naruto/1.jpg");
    }

    #[test]
    fn mirror_root_when_configured() {
        let resolver = ImageResolver::new("naruto", Some("https://cdn.example".into()));
        assert_eq!(resolver.page_url("1.jpg"), "https://cdn.example/naruto/1.jpg");
    }

    #[test]
    fn page_identifiers_are_percent_encoded() {
        let resolver = ImageResolver::new("naruto", None);
        assert_eq!(
            resolver.page_url("c166 (v21) - p000.jpg"),
            "/img/naruto/c166%20%28v21%29%20-%20p000.jpg"
        );
    }

    #[test]
    fn mirror_failure_rewrites_the_slot_to_origin() {
        let mut resolver = ImageResolver::new("naruto", Some("https://cdn.example".into()));
        let mut slot = ImageSlot::default();
        slot.point_at("2.jpg", resolver.page_url("2.jpg"));

        assert!(resolver.skip_mirror(&mut slot));
        assert_eq!(resolver.failed_mirror_hits(), 1);
        assert_eq!(slot.src(), "/img/naruto/2.jpg");
    }

    #[test]
    fn origin_failures_are_not_charged_to_the_mirror() {
        let mut resolver = ImageResolver::new("naruto", Some("https://cdn.example".into()));
        let mut slot = ImageSlot::default();
        slot.point_at("2.jpg", "/img/naruto/2.jpg".into());

        assert!(!resolver.skip_mirror(&mut slot));
        assert_eq!(resolver.failed_mirror_hits(), 0);
        assert_eq!(slot.src(), "/img/naruto/2.jpg");
    }

    #[test]
    fn empty_slot_is_ignored() {
        let mut resolver = ImageResolver::new("naruto", Some("https://cdn.example".into()));
        let mut slot = ImageSlot::default();
        assert!(!resolver.skip_mirror(&mut slot));
        assert_eq!(resolver.failed_mirror_hits(), 0);
    }

    #[test]
    fn mirror_is_abandoned_at_the_failure_limit() {
        let mut resolver = ImageResolver::new("naruto", Some("https://cdn.example".into()));
        for _ in 0..MIRROR_FAILURE_LIMIT {
            let mut slot = ImageSlot::default();
            slot.point_at("2.jpg", resolver.page_url("2.jpg"));
            assert!(slot.src().starts_with("https://cdn.example/"));
            assert!(resolver.skip_mirror(&mut slot));
        }
        assert_eq!(resolver.failed_mirror_hits(), MIRROR_FAILURE_LIMIT);
        assert!(!resolver.mirror_active());
        assert_eq!(resolver.page_url("2.jpg"), "/img/naruto/2.jpg");
    }
}
