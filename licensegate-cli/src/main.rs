//! licensegate: offline license check
//!
//! Verifies a signed license token against the shared secret and prints the
//! verdict. Meant for deployment scripts and service start-up hooks.
//!
//! Usage:
//!   licensegate <license-key> --secret <secret-key>
//!   JWT_SECRET=... licensegate --file license.txt --feature sso
//!   licensegate --file license.txt --heartbeat 60
//!
//! Exit status is 0 for a valid license, 1 for an invalid one, and 2 when
//! the token or secret is missing.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use licensegate_cli::{
    exit_status, heartbeat, render_human, render_json, Args, Config, TokenSource, EXIT_USAGE,
};
use tracing::{debug, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match Config::resolve(&args, |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };
    if let TokenSource::File(path) = &config.source {
        debug!(path = %path.display(), "reading license from file");
    }

    let verdict = config.source.verify(&config.verifier);
    let feature = args.feature.as_deref();

    if args.json {
        println!("{}", render_json(&verdict).context("failed to encode verdict")?);
    } else {
        print!("{}", render_human(&verdict, feature));
    }

    let verdict = match args.heartbeat {
        Some(minutes) => {
            let every = Duration::from_secs(minutes.saturating_mul(60));
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("failed to listen for Ctrl-C: {e}");
                }
            };
            heartbeat(&config, every, verdict, ctrl_c).await
        }
        None => verdict,
    };

    Ok(ExitCode::from(exit_status(&verdict, feature)))
}
