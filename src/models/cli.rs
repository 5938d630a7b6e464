use crate::catalog::ProtocolVariant;
use crate::sync::ConnectStrategy;
use clap::Parser;

#[derive(clap::Parser)]
pub struct Cli {
    #[arg(short, long, default_value = "reader")]
    pub config_file: String,

    /// Base URL of the comic server, e.g. http://localhost:30000
    #[arg(short, long)]
    pub server: Option<String>,

    /// Comic identifier, or a reader path such as /naruto/reader.html
    #[arg(long)]
    pub comic: Option<String>,

    /// Starting page, the way a #fragment names one in the browser reader
    #[arg(short, long)]
    pub page: Option<String>,

    /// Page-list endpoint generation served by this deployment
    #[arg(long, value_enum)]
    pub variant: Option<ProtocolVariant>,

    /// What to send the relay on connect when no starting page is named
    #[arg(long, value_enum)]
    pub connect: Option<ConnectStrategy>,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
