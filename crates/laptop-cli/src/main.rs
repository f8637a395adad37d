// crates/laptop-cli/src/main.rs
//
// CLI entrypoint for the laptop catalog.
//
// Provides subcommands for logging in, creating and searching laptops,
// uploading laptop images, and rating laptops against a running laptopd.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::create::CreateCmd;
use commands::rate::RateCmd;
use commands::search::SearchCmd;
use commands::upload::UploadCmd;
use commands::ConnectOpts;
use output::OutputFormat;

/// Laptop catalog CLI.
#[derive(Parser, Debug)]
#[command(
    name = "laptop",
    version = "0.1.0",
    about = "Laptop catalog CLI: create, search, upload images, and rate laptops"
)]
struct Cli {
    #[command(flatten)]
    connect: ConnectOpts,

    /// Print results as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and print the access token.
    Login,

    /// Create a laptop.
    Create(CreateCmd),

    /// Search laptops matching a filter.
    Search(SearchCmd),

    /// Upload an image for a laptop.
    UploadImage(UploadCmd),

    /// Rate one or more laptops.
    Rate(RateCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    match &cli.command {
        Commands::Login => commands::login::run(&cli.connect).await?,
        Commands::Create(cmd) => commands::create::run(&cli.connect, cmd).await?,
        Commands::Search(cmd) => commands::search::run(&cli.connect, cmd, &format).await?,
        Commands::UploadImage(cmd) => commands::upload::run(&cli.connect, cmd).await?,
        Commands::Rate(cmd) => commands::rate::run(&cli.connect, cmd, &format).await?,
    }

    Ok(())
}
