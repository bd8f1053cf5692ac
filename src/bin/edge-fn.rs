use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use edge_cache_control::functions::{
    viewer_request, viewer_response, ViewerRequestEvent, ViewerResponseEvent,
};

#[derive(Parser)]
#[command(name = "edge-fn")]
#[command(about = "Evaluate an edge function against a JSON test event", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the viewer-request function; prints the request or generated response
    ViewerRequest {
        /// Event file, or `-` for stdin
        event: PathBuf,
    },
    /// Run the viewer-response function; prints the response
    ViewerResponse {
        /// Event file, or `-` for stdin
        event: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::ViewerRequest { event } => {
            let event: ViewerRequestEvent = read_event(&event)?;
            serde_json::to_string_pretty(&viewer_request::handle(event))?
        }
        Commands::ViewerResponse { event } => {
            let event: ViewerResponseEvent = read_event(&event)?;
            serde_json::to_string_pretty(&viewer_response::handle(event))?
        }
    };

    println!("{}", output);
    Ok(())
}

fn read_event<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}
