use std::path::PathBuf;

use clap::{arg, value_parser, ArgMatches, Command};

use tinyfile_client::infrastructure::storage::config::AppConfig;

pub fn get_args() -> Command {
    Command::new("tinyfile")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(arg!(-v --debug "Print debug information"))
        .arg(
            arg!(-c --config <PATH> "Configuration file to use instead of the platform default")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--host <HOST> "Server host name or address"))
        .arg(arg!(-p --port <PORT> "Server TCP port").value_parser(value_parser!(u16)))
        .arg(
            arg!(-t --timeout <SECS> "Connect and read timeout in seconds")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .subcommand(Command::new("list").about("List the files offered by the server"))
        .subcommand(
            Command::new("head")
                .about("Show the type and size of a remote file")
                .arg(arg!(<NAME> "Remote file name"))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("get")
                .about("Download a remote file (to stdout unless --output is given)")
                .arg(arg!(<NAME> "Remote file name"))
                .arg(
                    arg!(-o --output <PATH> "Save the file to this path")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("preview")
                .about("Fetch a remote file and show it as text, image or binary summary")
                .arg(arg!(<NAME> "Remote file name"))
                .arg_required_else_help(true),
        )
}

/// Applies `--host`, `--port` and `--timeout` on top of the loaded file.
pub fn apply_overrides(matches: &ArgMatches, config: &mut AppConfig) {
    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.client.timeout_secs = *timeout;
    }
}
