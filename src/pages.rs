/// Ordered page list for one comic, fetched once at startup and immutable
/// afterwards. Order defines navigation order; there is no wraparound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageList {
    pages: Vec<String>,
}

impl PageList {
    pub fn new(pages: Vec<String>) -> Self {
        PageList { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.pages
    }

    pub fn first(&self) -> Option<&str> {
        self.pages.first().map(String::as_str)
    }

    pub fn contains(&self, page: &str) -> bool {
        self.index_of(page).is_some()
    }

    /// Lookup by value. A page that is not in the list means "no navigation
    /// possible", never an error.
    pub fn index_of(&self, page: &str) -> Option<usize> {
        self.pages.iter().position(|p| p == page)
    }

    pub fn next_after(&self, page: &str) -> Option<&str> {
        let current = self.index_of(page)?;
        self.pages.get(current + 1).map(String::as_str)
    }

    pub fn previous_before(&self, page: &str) -> Option<&str> {
        let current = self.index_of(page)?;
        if current == 0 {
            return None;
        }
        self.pages.get(current - 1).map(String::as_str)
    }
}
