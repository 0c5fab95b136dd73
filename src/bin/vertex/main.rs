//! vertex - terminal vertex-waveform synthesizer
//!
//! Run with: cargo run --bin vertex -- [--config synth.toml] [--verbose]

mod app;
mod ui;

use std::{fs::File, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use vertex_synth::SynthConfig;

const LOG_FILE: &str = "vertex.log";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML file with startup parameters
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level instead of warnings only
    #[arg(short, long)]
    verbose: bool,
}

/// Log to a file so records never land on top of the TUI.
fn init_logging(verbose: bool) -> EyreResult<()> {
    use simplelog::*;

    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let log_file =
        File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    WriteLogger::init(log_level, Config::default(), log_file)
        .wrap_err("failed to initialize logger")?;

    log::info!("vertex starting (log level: {:?})", log_level);
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = match &args.config {
        Some(path) => SynthConfig::load(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => SynthConfig::default(),
    };

    app::run(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_config_and_verbose() {
        let args = Args::try_parse_from(["vertex", "--config", "synth.toml", "-v"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("synth.toml")));
        assert!(args.verbose);

        let args = Args::try_parse_from(["vertex"]).unwrap();
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_paths() {
        assert!(Args::try_parse_from(["vertex", "--loud"]).is_err());
        assert!(Args::try_parse_from(["vertex", "--config"]).is_err());
    }
}
