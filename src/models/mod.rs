pub mod cli;
pub mod configuration;
pub mod messages;

pub use cli::Cli;
pub use configuration::Settings;
pub use messages::SyncMessage;
