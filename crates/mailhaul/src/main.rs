//! `mailhaul` - bulk-download and optionally delete mail from an IMAP server.
//!
//! Thin orchestration over the `mailhaul-imap` engine: parse arguments,
//! open a session, walk folders and messages, and write what comes back to
//! disk. All protocol state lives in the engine.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod download;

use anyhow::Context;
use clap::Parser;
use mailhaul_imap::Session;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use download::Options;

/// Bulk-download and optionally delete mail from an IMAP server.
#[derive(Parser, Debug)]
#[command(name = "mailhaul", version, about)]
struct Args {
    /// Target server.
    #[arg(short = 'S', long = "server", value_name = "SERVER-NAME")]
    server: String,

    /// Target port.
    #[arg(short = 'P', long = "port", value_name = "PORT-NUMBER")]
    port: u16,

    /// Username.
    #[arg(short = 'l', long = "login", value_name = "USERNAME")]
    login: String,

    /// Password.
    #[arg(short = 'p', long = "pass", value_name = "PASSWORD")]
    pass: String,

    /// Download from this folder only (repeatable).
    #[arg(short = 'f', long = "folder", value_name = "FOLDER-NAME")]
    folder: Vec<String>,

    /// Delete messages after downloading.
    #[arg(short = 'd', long = "delete")]
    delete: bool,

    /// Download all folders, ignoring any --folder restriction.
    #[arg(short = 'a', long = "all")]
    all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailhaul=info,mailhaul_imap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("connecting to {}:{}", args.server, args.port);
    let mut session = Session::connect(&args.server, args.port)
        .await
        .with_context(|| format!("connecting to {}:{}", args.server, args.port))?;

    session
        .login(&args.login, &args.pass)
        .await
        .context("authentication failed")?;

    let root = std::env::current_dir()
        .context("determining working directory")?
        .join("IMAP");

    let options = Options {
        folders: args.folder,
        delete: args.delete,
        all: args.all,
        root,
    };

    download::run(&mut session, &options).await
}
