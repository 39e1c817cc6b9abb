mod db;
mod identity;
mod web;

use clap::{Parser, Subcommand};

use db::SqliteStore;
use identity::device_uuid::get_or_create;
use identity::fingerprint::{fingerprint, host_attributes};
use identity::interfaces::{DatalinkSource, enumerate, enumerate_by_pattern, primary};

#[derive(Parser)]
#[command(name = "rust_device_identity_tool")]
#[command(about = "Inspect host MAC addresses and the sandbox-safe fallbacks: a fingerprint hash and a persisted device UUID")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List non-internal, MAC-bearing network endpoints
    List {
        /// Case-insensitive substring filter on the interface name
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Print the MAC of the first non-internal interface
    Primary,
    /// Compute the device fingerprint hash from host-observable attributes
    Fingerprint,
    /// Get or create the persistent device UUID
    Uuid,
    /// Serve the browser demo page and JSON API
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::List { pattern } => {
            let records = match pattern {
                Some(pattern) => enumerate_by_pattern(&DatalinkSource, &pattern)?,
                None => enumerate(&DatalinkSource)?,
            };
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Primary => match primary(&DatalinkSource)? {
            Some(mac) => println!("{}", mac),
            None => eprintln!("No non-internal interface with a MAC address found"),
        },
        Command::Fingerprint => {
            let result = fingerprint(host_attributes());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Uuid => {
            let store = SqliteStore::open()?;
            println!("{}", get_or_create(&store)?);
        }
        Command::Serve { port } => {
            web::start(port);
            tokio::signal::ctrl_c().await?;
            println!("Shutting down");
        }
    }

    Ok(())
}
