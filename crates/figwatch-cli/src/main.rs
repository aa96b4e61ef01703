//! Figwatch CLI
//!
//! Webhook service and offline tools for design-library publish reports

use clap::{Parser, Subcommand};
use figwatch_core::logging_facility::{self, Profile};

mod archive;
mod commands;

#[derive(Debug, Parser)]
#[command(name = "figwatch")]
#[command(about = "Figwatch - change reports for design library publishes", long_about = None)]
struct Cli {
    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the publish webhook
    Serve(commands::serve::ServeArgs),
    /// Compile a report offline from an event and two snapshot files
    Render(commands::render::RenderArgs),
    /// Print the raw diff records between two snapshot files
    Diff(commands::diff::DiffArgs),
}

fn main() {
    // Before parsing, so `.env` values feed the env fallbacks of the flags.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging_facility::init(Profile::from_json_flag(cli.log_json));

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args),
        Commands::Render(args) => commands::render::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
