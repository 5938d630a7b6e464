use crate::catalog;
use crate::location;
use crate::models::Settings;
use crate::session::{Session, SlotKind};
use crate::sync::SyncChannel;
use crate::view::{ConsoleView, ViewSurface};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Goto(String),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" => None,
        "n" | "next" => Some(Command::Next),
        "p" | "prev" | "previous" => Some(Command::Previous),
        "q" | "quit" => Some(Command::Quit),
        page => Some(Command::Goto(page.to_string())),
    }
}

pub async fn run(settings: Settings) -> Result<()> {
    let server = Url::parse(&settings.server)?;
    let comic = settings
        .comic
        .as_deref()
        .ok_or_else(|| anyhow!("no comic configured; pass --comic or set it in the config file"))?;
    let comic = location::resolve_comic(comic)?;
    info!("Reading {} from {}", comic, server);

    let http = reqwest::Client::new();
    let catalog = catalog::fetch_page_list(&http, &server, &comic, settings.variant).await?;

    let mut channel = SyncChannel::new(&server)?;
    channel.open().await?;
    let mut sync_live = channel.is_open();

    let mut session = Session::new(comic, catalog, ConsoleView);
    let start = settings.page.as_deref().and_then(location::start_page);
    if let Some(msg) = session.on_open(start.as_deref(), settings.connect) {
        channel.send(&msg).await?;
    }
    load_images(&mut session, &http, &server).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            inbound = channel.recv(), if sync_live => match inbound {
                Some(msg) => {
                    if let Some(reply) = session.on_message(&msg) {
                        channel.send(&reply).await?;
                    }
                    load_images(&mut session, &http, &server).await;
                }
                None => {
                    sync_live = false;
                    warn!("sync channel closed, continuing unsynchronized");
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(command) = parse_command(&line) else { continue };
                let outbound = match command {
                    Command::Quit => break,
                    Command::Next => session.next(),
                    Command::Previous => session.previous(),
                    Command::Goto(page) => session.select(&page),
                };
                if let Some(msg) = outbound {
                    channel.send(&msg).await?;
                }
                load_images(&mut session, &http, &server).await;
            }
        }
    }

    info!("Finished!");
    Ok(())
}

/// Loads the displayed and preloaded images, the way the browser does when an
/// img src changes. A failed load goes through the session's mirror degrade,
/// then one more attempt at the rewritten origin source.
async fn load_images<V: ViewSurface>(
    session: &mut Session<V>,
    http: &reqwest::Client,
    server: &Url,
) {
    for kind in [SlotKind::Current, SlotKind::Preloaded] {
        let Some(src) = session.slot_src(kind) else { continue };
        let src = src.to_string();
        if load_ok(http, server, &src).await {
            continue;
        }
        if session.on_image_error(kind) {
            if let Some(src) = session.slot_src(kind) {
                let src = src.to_string();
                if !load_ok(http, server, &src).await {
                    warn!("origin load failed too for {}", src);
                }
            }
        }
    }
}

async fn load_ok(http: &reqwest::Client, server: &Url, src: &str) -> bool {
    // Slot sources are either site-relative or absolute mirror URLs; joining
    // against the server base handles both.
    let Ok(url) = server.join(src) else { return false };
    match http.get(url.clone()).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!("image load {} -> {}", url, response.status());
            false
        }
        Err(e) => {
            debug!("image load {} failed: {}", url, e);
            false
        }
    }
}
