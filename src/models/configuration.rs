use crate::catalog::ProtocolVariant;
use crate::models::Cli;
use crate::sync::ConnectStrategy;
use config::{Config, ConfigError};
use serde::Deserialize;

fn default_server() -> String {
    // The comic server's stock port.
    "http://localhost:30000".to_string()
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_server")]
    pub server: String,
    pub comic: Option<String>,
    pub page: Option<String>,
    #[serde(default)]
    pub variant: ProtocolVariant,
    #[serde(default)]
    pub connect: ConnectStrategy,
}

impl Settings {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(config_file).required(false))
            .build()?;
        builder.try_deserialize()
    }

    /// Command-line flags win over the config file.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(comic) = &cli.comic {
            self.comic = Some(comic.clone());
        }
        if let Some(page) = &cli.page {
            self.page = Some(page.clone());
        }
        if let Some(variant) = cli.variant {
            self.variant = variant;
        }
        if let Some(connect) = cli.connect {
            self.connect = connect;
        }
    }
}
