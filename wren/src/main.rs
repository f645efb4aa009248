use std::path::PathBuf;
use std::process::ExitCode;

use corner::{Builder, Compressor, Config, Policy, Report};
use corner::error::Result;
use tracing_subscriber::EnvFilter;

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Builds the site and keeps its images small. Run from the project
        /// directory.
        cmd wren {
            /// Log everything, including skipped files.
            optional -v, --verbose

            /// Rebuild every page into the output directory.
            default cmd build {
                /// Record failed pages and keep building the rest.
                optional -k, --keep-going
                /// Read settings from this file instead of `site.toml`.
                optional -c, --config path: PathBuf
            }

            /// Re-encode the site's JPEGs in place.
            cmd compress {
                /// Record failed images and keep compressing the rest.
                optional -k, --keep-going
                /// Read settings from this file instead of `site.toml`.
                optional -c, --config path: PathBuf
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn policy(keep_going: bool) -> Policy {
    if keep_going { Policy::KeepGoing } else { Policy::FailFast }
}

fn config(explicit: Option<PathBuf>) -> Result<Config> {
    let root = std::env::current_dir()?;
    Config::discover(root, explicit.as_deref())
}

fn run(flags: flags::Wren) -> Result<Report> {
    match flags.subcommand {
        flags::WrenCmd::Build(build) => {
            let config = config(build.config)?;
            corner::time!("build", Builder::new(&config).run(policy(build.keep_going)))
        }
        flags::WrenCmd::Compress(compress) => {
            let config = config(compress.config)?;
            corner::time!("compress", Compressor::new(&config).run(policy(compress.keep_going)))
        }
    }
}

pub fn main() -> ExitCode {
    let flags = flags::Wren::from_env_or_exit();
    init_logging(flags.verbose);

    match run(flags) {
        Ok(report) if report.is_success() => {
            tracing::info!("{report}");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            tracing::error!("{report}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
