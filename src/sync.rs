use crate::models::SyncMessage;
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

/// What to tell the relay right after the handshake when no starting page is
/// named. Older clients broadcast the first page outright; newer ones join
/// and let the relay answer with the comic's current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectStrategy {
    #[default]
    Announce,
    Join,
}

/// Channel lifecycle. Closed is terminal; there is no reconnect, a closed
/// channel just stops relaying and the reader degrades to single-viewer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bidirectional message channel to the shared relay at `/msg`. The channel
/// is shared across comics; filtering inbound traffic by comic is the
/// session's job, not the channel's.
pub struct SyncChannel {
    endpoint: Url,
    state: ChannelState,
    write: Option<SplitSink<WsStream, Message>>,
    read: Option<SplitStream<WsStream>>,
}

/// Derives the relay endpoint from the server base URL, upgrading the scheme
/// from `http`/`https` to `ws`/`wss`.
pub fn relay_endpoint(server: &Url) -> Result<Url> {
    let mut endpoint = server.join("msg").context("bad relay endpoint")?;
    let scheme = match server.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => bail!("unsupported server scheme {:?}", other),
    };
    endpoint
        .set_scheme(scheme)
        .map_err(|_| anyhow!("cannot upgrade scheme on {}", endpoint))?;
    Ok(endpoint)
}

impl SyncChannel {
    pub fn new(server: &Url) -> Result<Self> {
        Ok(SyncChannel {
            endpoint: relay_endpoint(server)?,
            state: ChannelState::Connecting,
            write: None,
            read: None,
        })
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    pub async fn open(&mut self) -> Result<()> {
        if self.state != ChannelState::Connecting {
            bail!("sync channel already opened");
        }
        let (stream, _) = connect_async(self.endpoint.as_str())
            .await
            .with_context(|| format!("websocket handshake with {} failed", self.endpoint))?;
        let (write, read) = stream.split();
        self.write = Some(write);
        self.read = Some(read);
        self.state = ChannelState::Open;
        info!("Connected to relay at {}", self.endpoint);
        Ok(())
    }

    /// Sends eagerly; there is no acknowledgment. On a closed channel the
    /// message is silently dropped so local navigation keeps working. A
    /// transport error closes the channel.
    pub async fn send(&mut self, msg: &SyncMessage) -> Result<()> {
        match self.state {
            ChannelState::Connecting => bail!("sync channel not opened yet"),
            ChannelState::Closed => {
                debug!("sync channel closed, dropping {:?}", msg);
                return Ok(());
            }
            ChannelState::Open => {}
        }
        let write = self
            .write
            .as_mut()
            .ok_or_else(|| anyhow!("sync channel has no transport"))?;
        let text = serde_json::to_string(msg)?;
        if let Err(e) = write.send(Message::Text(text)).await {
            warn!("sync channel send failed, closing: {}", e);
            self.close();
        }
        Ok(())
    }

    /// Next inbound message, or `None` when the channel is not open or has
    /// just transitioned to Closed. Non-text frames are skipped; malformed
    /// JSON from the relay is logged and skipped rather than trusted to be
    /// impossible.
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        if self.state != ChannelState::Open {
            return None;
        }
        let read = self.read.as_mut()?;
        loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
                    Ok(msg) => return Some(msg),
                    Err(e) => warn!("ignoring malformed relay message {:?}: {}", text, e),
                },
                Some(Ok(Message::Close(_))) | None => {
                    self.close();
                    return None;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("sync channel error, closing: {}", e);
                    self.close();
                    return None;
                }
            }
        }
    }

    fn close(&mut self) {
        self.state = ChannelState::Closed;
        self.write = None;
        self.read = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[test]
    fn endpoint_upgrades_http_to_ws() {
        let server = Url::parse("http://comics.test:30000/").unwrap();
        let endpoint = relay_endpoint(&server).unwrap();
        assert_eq!(endpoint.as_str(), "ws://comics.test:30000/msg");
    }

    #[test]
    fn endpoint_upgrades_https_to_wss() {
        let server = Url::parse("https://comics.test/").unwrap();
        let endpoint = relay_endpoint(&server).unwrap();
        assert_eq!(endpoint.as_str(), "wss://comics.test/msg");
    }

    #[test]
    fn other_schemes_are_rejected() {
        let server = Url::parse("ftp://comics.test/").unwrap();
        assert!(relay_endpoint(&server).is_err());
    }

    #[tokio::test]
    async fn channel_starts_connecting_and_refuses_early_sends() {
        let server = Url::parse("http://comics.test:30000/").unwrap();
        let mut channel = SyncChannel::new(&server).unwrap();
        assert_eq!(channel.state(), ChannelState::Connecting);
        assert!(channel.send(&SyncMessage::join("naruto")).await.is_err());
        assert_eq!(channel.recv().await, None);
        assert_eq!(channel.state(), ChannelState::Connecting);
    }

    #[tokio::test]
    async fn round_trip_against_a_loopback_relay() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let relay = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let frame = ws.next().await.unwrap().unwrap();
            let received: SyncMessage =
                serde_json::from_str(frame.to_text().unwrap()).unwrap();
            assert_eq!(received, SyncMessage::set_page("naruto", "1.jpg"));

            ws.send(Message::Text(
                r#"{"comic":"naruto","page":"2.jpg"}"#.to_string(),
            ))
            .await
            .unwrap();
            // Dropping the socket closes the channel on the client side.
        });

        let server = Url::parse(&format!("http://{}/", addr)).unwrap();
        let mut channel = SyncChannel::new(&server).unwrap();
        channel.open().await.unwrap();
        assert_eq!(channel.state(), ChannelState::Open);

        channel
            .send(&SyncMessage::set_page("naruto", "1.jpg"))
            .await
            .unwrap();

        let inbound = channel.recv().await.unwrap();
        assert_eq!(inbound, SyncMessage::set_page("naruto", "2.jpg"));

        relay.await.unwrap();
        assert_eq!(channel.recv().await, None);
        assert_eq!(channel.state(), ChannelState::Closed);

        // Closed is terminal; sends are dropped without error.
        assert!(channel.send(&SyncMessage::join("naruto")).await.is_ok());
        assert_eq!(channel.state(), ChannelState::Closed);
    }
}
