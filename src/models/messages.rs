use serde::{Deserialize, Serialize};

/// The one message shape the relay speaks, as UTF-8 JSON text frames.
/// With a page it declares "this comic is now on this page"; without one it
/// is a join, asking the relay for the comic's currently-agreed page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncMessage {
    pub comic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl SyncMessage {
    pub fn set_page(comic: &str, page: &str) -> Self {
        SyncMessage {
            comic: comic.to_string(),
            page: Some(page.to_string()),
        }
    }

    pub fn join(comic: &str) -> Self {
        SyncMessage {
            comic: comic.to_string(),
            page: None,
        }
    }
}
