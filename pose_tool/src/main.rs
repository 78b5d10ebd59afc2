use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;
mod store;

use store::StoreFormat;

/// The configuration used when no other layer sets a value.
const DEFAULT_CONFIG: &str = include_str!("../assets/default_config.toml");

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Overrides the configured store format.
    #[arg(long, global = true)]
    format: Option<StoreFormat>,

    /// Writes JSON without indentation.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Saves a small sample animation to the store.
    Sample {
        /// The name to save it under.
        name: String,
    },
    /// Converts a pose file to another format.
    ///
    /// Both formats are determined by the file extensions, `.dat` for binary
    /// and `.json` for text.
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// Prints a summary of a pose file.
    Inspect {
        input: PathBuf,
    },
    /// Lists the animations in the store.
    List,
    /// Deletes an animation from the store.
    Delete {
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let res = run(cli);
    if let Err(why) = &res {
        log::error!("Exiting due to error: {why:?}");
    }

    log::logger().flush();
    res
}

fn run(cli: Cli) -> anyhow::Result<()> {
    use crate::store::Store;

    let config = build_config()?;
    init_logging(config.log)?;

    log::debug!("pose_tool v{}", env!("CARGO_PKG_VERSION"));

    let mut store = Store::new(&config.store);
    if let Some(format) = cli.format {
        store = store.with_format(format);
    }

    if cli.compact {
        store = store.with_style(record_codec::text::TextStyle::Compact);
    }

    match cli.command {
        Command::Sample { name } => commands::sample(&store, &name),
        Command::Convert { input, output } => commands::convert(&input, &output, store.style()),
        Command::Inspect { input } => commands::inspect(&input),
        Command::List => commands::list(&store),
        Command::Delete { name } => commands::delete(&store, &name),
    }
}

fn build_config() -> anyhow::Result<config::PoseConfig> {
    use crate::config::setup::{Builder, Env, File, TomlText};

    Builder::new()
        .add_layer(TomlText::new(DEFAULT_CONFIG))
        .add_layer(File::new("pose_tool.toml").required(false))
        .add_layer(Env::prefixed("POSE_TOOL"))
        .build()
        .context("cannot load configuration")
}

fn init_logging(config: log4rs::config::RawConfig) -> anyhow::Result<()> {
    let deserializers = crate::logging::deserializers();
    let (appenders, errors) = config.appenders_lossy(&deserializers);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let config = log4rs::Config::builder()
        .appenders(appenders)
        .loggers(config.loggers())
        .build(config.root())?;

    log4rs::init_config(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pose_tool", "list", "--format", "json", "--compact"])
            .expect("valid arguments");
        assert_eq!(cli.format, Some(StoreFormat::Json), "format override");
        assert!(cli.compact, "compact flag");
        assert!(matches!(cli.command, Command::List), "subcommand");
    }

    #[test]
    fn convert_takes_two_paths() {
        Cli::try_parse_from(["pose_tool", "convert", "a.dat"]).expect_err("output is missing");
    }
}
