//! Tiny File command-line client entry point.
//!
//! ```text
//! main()
//!  └─ cli::get_args()            -- parse command line
//!  └─ load_config[_from]()       -- TOML defaults, then CLI overrides
//!  └─ RemoteFileSource           -- FileClient bound to host:port
//!  └─ subcommand
//!       ├─ list      -> BrowseFilesUseCase::browse
//!       ├─ head      -> FetchFileUseCase::inspect
//!       ├─ get       -> FetchFileUseCase::get / download
//!       └─ preview   -> FetchFileUseCase::preview
//! ```
//!
//! File contents go to stdout; logs go to stderr.

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tinyfile_client::application::{BrowseFilesUseCase, FetchFileUseCase, FileSource};
use tinyfile_client::infrastructure::{
    network::{FileClient, RemoteFileSource},
    storage::config::{load_config, load_config_from},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli::get_args().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };
    cli::apply_overrides(&matches, &mut config);

    let level = if matches.get_flag("debug") {
        "debug"
    } else {
        config.client.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    debug!(?config, "configuration resolved");

    let client = FileClient::new(config.file_client_config());
    let source: Arc<dyn FileSource> = Arc::new(RemoteFileSource::new(client, config.endpoint()));

    match matches.subcommand() {
        Some(("list", _)) => {
            let listing = BrowseFilesUseCase::new(source)
                .browse()
                .await
                .context("failed to list files")?;
            for label in listing.labels() {
                println!("{label}");
            }
        }
        Some(("head", sub)) => {
            let name = required_name(sub)?;
            let info = FetchFileUseCase::new(source)
                .inspect(name)
                .await
                .with_context(|| format!("failed to inspect {name}"))?;
            println!("{info}");
        }
        Some(("get", sub)) => {
            let name = required_name(sub)?;
            let use_case = FetchFileUseCase::new(source);
            match sub.get_one::<PathBuf>("output") {
                Some(target) => {
                    let written = use_case
                        .download(name, target)
                        .await
                        .with_context(|| format!("failed to download {name}"))?;
                    eprintln!("Saved {written} bytes to {}", target.display());
                }
                None => {
                    let result = use_case
                        .get(name)
                        .await
                        .with_context(|| format!("failed to fetch {name}"))?;
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&result.body).await?;
                    stdout.flush().await?;
                }
            }
        }
        Some(("preview", sub)) => {
            let name = required_name(sub)?;
            let preview = FetchFileUseCase::new(source)
                .preview(name)
                .await
                .with_context(|| format!("failed to preview {name}"))?;
            println!("{preview}");
        }
        _ => unreachable!("clap requires a subcommand"),
    }

    Ok(())
}

fn required_name(matches: &clap::ArgMatches) -> anyhow::Result<&str> {
    matches
        .get_one::<String>("NAME")
        .map(String::as_str)
        .context("missing file name")
}
