use log::{debug, info};

/// The display surface the session drives. In the browser client these calls
/// land on DOM elements; here the shipped implementation is a console and
/// tests substitute a recording double.
pub trait ViewSurface {
    /// Page picker, filled once from the full page list.
    fn populate_picker(&mut self, pages: &[String], selected: &str);
    fn display(&mut self, page: &str, src: &str);
    fn preload(&mut self, page: &str, src: &str);
    fn set_fragment(&mut self, fragment: &str);
    fn select_in_picker(&mut self, page: &str);
    fn scroll_to_top(&mut self);
}

/// Console rendition of the reader surface.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ViewSurface for ConsoleView {
    fn populate_picker(&mut self, pages: &[String], selected: &str) {
        info!("{} pages available (reading {})", pages.len(), selected);
    }

    fn display(&mut self, page: &str, src: &str) {
        println!("=== {} ({})", page, src);
    }

    fn preload(&mut self, page: &str, src: &str) {
        debug!("preloading {} from {}", page, src);
    }

    fn set_fragment(&mut self, fragment: &str) {
        debug!("fragment -> #{}", fragment);
    }

    fn select_in_picker(&mut self, page: &str) {
        debug!("picker -> {}", page);
    }

    fn scroll_to_top(&mut self) {}
}
