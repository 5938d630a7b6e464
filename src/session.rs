use crate::catalog::Catalog;
use crate::images::{ImageResolver, ImageSlot};
use crate::models::SyncMessage;
use crate::pages::PageList;
use crate::sync::ConnectStrategy;
use crate::view::ViewSurface;
use log::{debug, warn};

/// Which image element of the reader failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Current,
    Preloaded,
}

/// One viewer instance: the page list, the page being read, the image
/// resolver and the two image slots, wired to a display surface.
///
/// Every way of changing the page funnels through [`Session::apply_navigation`];
/// the returned message, when present, is the outbound half of the sync
/// protocol and must be handed to the channel by the caller. Remote events
/// never produce an outbound echo.
pub struct Session<V: ViewSurface> {
    comic: String,
    pages: PageList,
    current: Option<String>,
    resolver: ImageResolver,
    current_slot: ImageSlot,
    preload_slot: ImageSlot,
    picker_filled: bool,
    view: V,
}

impl<V: ViewSurface> Session<V> {
    pub fn new(comic: String, catalog: Catalog, view: V) -> Self {
        let resolver = ImageResolver::new(&comic, catalog.mirror);
        Session {
            comic,
            pages: catalog.pages,
            current: None,
            resolver,
            current_slot: ImageSlot::default(),
            preload_slot: ImageSlot::default(),
            picker_filled: false,
            view,
        }
    }

    pub fn comic(&self) -> &str {
        &self.comic
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    pub fn slot_src(&self, kind: SlotKind) -> Option<&str> {
        let slot = match kind {
            SlotKind::Current => &self.current_slot,
            SlotKind::Preloaded => &self.preload_slot,
        };
        if slot.is_empty() {
            None
        } else {
            Some(slot.src())
        }
    }

    /// The single page-change operation. Returns the outbound message iff
    /// `broadcast`, so the echo-suppression rule is a parameter rather than
    /// two divergent code paths.
    pub fn apply_navigation(&mut self, page: &str, broadcast: bool) -> Option<SyncMessage> {
        if !self.pages.contains(page) {
            warn!("ignoring navigation to unknown page {:?}", page);
            return None;
        }
        let outbound = broadcast.then(|| SyncMessage::set_page(&self.comic, page));
        self.switch_page(page);
        outbound
    }

    fn switch_page(&mut self, page: &str) {
        self.view
            .set_fragment(&urlencoding::encode(page).into_owned());

        let src = self.resolver.page_url(page);
        self.current_slot.point_at(page, src.clone());
        self.view.display(page, &src);
        self.current = Some(page.to_string());

        match self.pages.next_after(page) {
            Some(next) => {
                let next = next.to_string();
                let src = self.resolver.page_url(&next);
                self.preload_slot.point_at(&next, src.clone());
                self.view.preload(&next, &src);
            }
            None => self.preload_slot.clear(),
        }

        self.view.scroll_to_top();
        if self.picker_filled {
            self.view.select_in_picker(page);
        } else {
            self.view.populate_picker(self.pages.as_slice(), page);
            self.picker_filled = true;
        }
    }

    pub fn next(&mut self) -> Option<SyncMessage> {
        let page = self
            .current
            .as_deref()
            .and_then(|current| self.pages.next_after(current))?
            .to_string();
        self.apply_navigation(&page, true)
    }

    pub fn previous(&mut self) -> Option<SyncMessage> {
        let page = self
            .current
            .as_deref()
            .and_then(|current| self.pages.previous_before(current))?
            .to_string();
        self.apply_navigation(&page, true)
    }

    /// Page-picker selection: any page in the list, adjacency rules bypassed.
    pub fn select(&mut self, page: &str) -> Option<SyncMessage> {
        self.apply_navigation(page, true)
    }

    /// Initial action once the channel handshake completes. A fragment page
    /// wins under either strategy; without one the client either announces
    /// the first page or joins and waits for the relay's answer.
    pub fn on_open(
        &mut self,
        fragment: Option<&str>,
        strategy: ConnectStrategy,
    ) -> Option<SyncMessage> {
        if let Some(page) = fragment {
            if self.pages.contains(page) {
                return self.apply_navigation(page, true);
            }
            warn!("fragment names unknown page {:?}, ignoring", page);
        }
        match strategy {
            ConnectStrategy::Announce => {
                let first = self.pages.first()?.to_string();
                self.apply_navigation(&first, true)
            }
            ConnectStrategy::Join => Some(SyncMessage::join(&self.comic)),
        }
    }

    /// Reconciles an inbound relay event. The channel is shared across
    /// comics, so anything for another comic is dropped. A page for our
    /// comic is applied without re-broadcasting; a pageless event means no
    /// viewer has picked a page yet, so this client elects the first one.
    pub fn on_message(&mut self, msg: &SyncMessage) -> Option<SyncMessage> {
        if msg.comic != self.comic {
            debug!("ignoring event for other comic {:?}", msg.comic);
            return None;
        }
        match &msg.page {
            Some(page) => {
                let page = page.clone();
                self.apply_navigation(&page, false);
                None
            }
            None => {
                let first = self.pages.first()?.to_string();
                self.apply_navigation(&first, true)
            }
        }
    }

    /// Image load failure, routed to the resolver's mirror degrade. When the
    /// slot is rewritten to the origin root the view is pointed at the new
    /// source; returns whether that happened.
    pub fn on_image_error(&mut self, kind: SlotKind) -> bool {
        match kind {
            SlotKind::Current => {
                if self.resolver.skip_mirror(&mut self.current_slot) {
                    self.view
                        .display(self.current_slot.page(), self.current_slot.src());
                    return true;
                }
            }
            SlotKind::Preloaded => {
                if self.resolver.skip_mirror(&mut self.preload_slot) {
                    self.view
                        .preload(self.preload_slot.page(), self.preload_slot.src());
                    return true;
                }
            }
        }
        false
    }
}
