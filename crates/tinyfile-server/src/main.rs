//! Tiny File server entry point.
//!
//! ```text
//! tinyfile-server [-v] [--bind ADDR] <PORT> <ROOT>
//! ```
//!
//! Binds the listener, then runs the accept loop until Ctrl-C.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::{arg, value_parser, Command};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tinyfile_server::{run_server, Catalog};

fn get_args() -> Command {
    Command::new("tinyfile-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(arg!(-v --debug "Print debug information"))
        .arg(
            arg!(-b --bind <ADDR> "Address to listen on")
                .value_parser(value_parser!(IpAddr))
                .default_value("0.0.0.0"),
        )
        .arg(arg!(<PORT> "TCP port to listen on").value_parser(value_parser!(u16)))
        .arg(arg!(<ROOT> "Directory whose files are served").value_parser(value_parser!(PathBuf)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = get_args().get_matches();

    let level = if matches.get_flag("debug") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let bind = *matches.get_one::<IpAddr>("bind").context("missing bind address")?;
    let port = *matches.get_one::<u16>("PORT").context("missing port")?;
    let root = matches.get_one::<PathBuf>("ROOT").context("missing root directory")?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let listener = TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("failed to bind {bind}:{port}"))?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    run_server(listener, Arc::new(Catalog::new(root.clone())), running).await?;
    Ok(())
}
