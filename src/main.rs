use comic_sync::{run, Cli, Settings};
use env_logger::{Builder, Env, Target};
use log::error;
use std::process;

#[tokio::main]
async fn main() {
    // Init logging
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stdout);
    builder.init();

    // Parse Args
    let cli = Cli::new();

    // Parse Settings
    let settings = Settings::new(&cli.config_file);
    if let Err(e) = settings {
        error!("Configuration error: {}", e);
        process::exit(1);
    }
    let mut s = settings.unwrap();
    s.merge_cli(&cli);

    // Run
    if let Err(e) = run(s).await {
        error!("Application error: {}", e);
        process::exit(1);
    }
}
