mod clipboard;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "markera",
    version,
    about = "Select regions on PDF pages and send them to a parsing service"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a PDF and interactively place, adjust and submit selection regions
    Open {
        /// Path to the PDF file
        file: PathBuf,

        /// Base URL of the parsing service
        #[arg(long, env = "MARKERA_API_URL", default_value = "http://localhost:8000")]
        api_url: String,

        /// Request path appended to the base URL
        #[arg(long, env = "MARKERA_API_PATH", default_value = "/parse")]
        api_path: String,
    },
    /// Print page count and native page dimensions of a PDF
    Info {
        /// Path to the PDF file
        file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Open {
            file,
            api_url,
            api_path,
        } => commands::open::run(file, &api_url, &api_path),
        Commands::Info { file, output } => commands::info::run(file, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
