use crate::pages::PageList;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use serde::Deserialize;
use url::Url;

/// Which server generation the reader is talking to. Deployments still serve
/// all three, so the choice is explicit configuration rather than guesswork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolVariant {
    /// `GET /{comic}/img_list` returning `{"pages": [...], "mirror": ...}`.
    #[default]
    Classic,
    /// `GET /img_list/{comic}`, same body as classic.
    Swapped,
    /// `GET /{comic}/img_list` returning a bare page array, no mirror.
    Legacy,
}

/// Everything the page-list endpoint tells us about one comic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub pages: PageList,
    pub mirror: Option<String>,
}

#[derive(Deserialize)]
struct ImgList {
    pages: Vec<String>,
    #[serde(default)]
    mirror: Option<String>,
}

fn list_url(server: &Url, comic: &str, variant: ProtocolVariant) -> Result<Url> {
    let path = match variant {
        ProtocolVariant::Classic | ProtocolVariant::Legacy => format!("{}/img_list", comic),
        ProtocolVariant::Swapped => format!("img_list/{}", comic),
    };
    server
        .join(&path)
        .with_context(|| format!("bad page-list url for {}", comic))
}

fn parse_body(body: &str, variant: ProtocolVariant) -> Result<Catalog> {
    let catalog = match variant {
        ProtocolVariant::Legacy => {
            let pages: Vec<String> =
                serde_json::from_str(body).context("malformed legacy page list")?;
            Catalog {
                pages: PageList::new(pages),
                mirror: None,
            }
        }
        ProtocolVariant::Classic | ProtocolVariant::Swapped => {
            let list: ImgList = serde_json::from_str(body).context("malformed page list")?;
            Catalog {
                pages: PageList::new(list.pages),
                mirror: list.mirror,
            }
        }
    };
    if catalog.pages.is_empty() {
        bail!("page list is empty");
    }
    Ok(catalog)
}

/// One-shot fetch of the page list. A failure here is an initialization
/// failure; the caller aborts rather than retrying.
pub async fn fetch_page_list(
    http: &reqwest::Client,
    server: &Url,
    comic: &str,
    variant: ProtocolVariant,
) -> Result<Catalog> {
    let url = list_url(server, comic, variant)?;
    debug!("Fetching page list from {}", url);
    let body = http
        .get(url.clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("page-list request to {} failed", url))?
        .text()
        .await
        .context("page-list body could not be read")?;
    let catalog = parse_body(&body, variant)?;
    info!("{} pages listed for {}", catalog.pages.len(), comic);
    if let Some(mirror) = &catalog.mirror {
        debug!("Mirror root: {}", mirror);
    }
    Ok(catalog)
}
