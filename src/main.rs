use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use atlas::cli::{self, Args};
use atlas::core::config;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("warning: {e}");
        config::AtlasConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref(), args.data_dir.as_ref());

    // File logger so stdout stays clean for command output
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Atlas starting up");

    if let Err(e) = cli::run(args, resolved).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
