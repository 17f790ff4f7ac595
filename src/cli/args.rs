use clap::Parser;
use std::path::PathBuf;

/// Track shared expenses in a group chat and settle them into minimal transfers
#[derive(Parser, Debug)]
#[command(name = "credits-bot")]
#[command(about = "Group-chat bot that tracks credits and nets them into a bill", long_about = None)]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(
        value_name = "CONFIG",
        default_value = "/etc/credits-bot/config.toml",
        help = "Path to the TOML configuration file"
    )]
    pub config_file: PathBuf,

    /// Credit store path, overriding the configuration file
    #[arg(
        long = "database",
        value_name = "PATH",
        help = "Path of the JSON credit store (overrides the configuration)"
    )]
    pub database: Option<PathBuf>,
}
