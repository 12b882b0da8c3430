//! Argument handling and output for the `licensegate` binary.

use clap::Parser;
use licensegate::{parse_timestamp, LicenseVerifier, SecretKey, Verdict};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable holding the token when none is passed.
pub const LICENSE_KEY_VAR: &str = "LICENSE_KEY";

/// Exit status for a valid license.
pub const EXIT_VALID: u8 = 0;
/// Exit status for an invalid license or a missing feature.
pub const EXIT_INVALID: u8 = 1;
/// Exit status when the token or secret could not be found.
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "licensegate")]
#[command(about = "Verify an offline license token")]
pub struct Args {
    /// License token. Falls back to the LICENSE_KEY environment variable.
    #[arg(conflicts_with = "file")]
    pub license_key: Option<String>,

    /// Read the license token from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Verification secret. Falls back to JWT_SECRET, then LICENSE_SECRET_KEY.
    #[arg(short, long)]
    pub secret: Option<String>,

    /// Fail unless the license grants this feature
    #[arg(long)]
    pub feature: Option<String>,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,

    /// Re-verify every MINUTES minutes until interrupted
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Missing configuration, reported with exit status [`EXIT_USAGE`].
#[derive(Debug, Error)]
pub enum UsageError {
    #[error(
        "license key required\n\nProvide it as:\n  1. Argument: licensegate <license-key>\n  2. File: licensegate --file <path>\n  3. Environment variable: LICENSE_KEY=<license-key> licensegate"
    )]
    MissingLicenseKey,

    #[error(
        "secret key required\n\nProvide it as:\n  1. Flag: licensegate --secret <secret-key>\n  2. Environment variable: JWT_SECRET=<secret-key> licensegate\n  3. Environment variable: LICENSE_SECRET_KEY=<secret-key> licensegate"
    )]
    MissingSecret,
}

/// Where the token comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenSource {
    Inline(String),
    File(PathBuf),
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.debug_tuple("Inline").field(&"[REDACTED]").finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl TokenSource {
    /// Verifies the token from this source.
    #[must_use]
    pub fn verify(&self, verifier: &LicenseVerifier) -> Verdict {
        match self {
            Self::Inline(token) => verifier.verify(token),
            Self::File(path) => verifier.verify_file(path),
        }
    }
}

/// Token source and verifier resolved from arguments and environment.
#[derive(Debug)]
pub struct Config {
    pub source: TokenSource,
    pub verifier: LicenseVerifier,
}

impl Config {
    /// Resolves configuration from `args`, reading environment variables
    /// through `lookup`.
    ///
    /// Token order: `--file`, positional argument, `LICENSE_KEY`.
    /// Secret order: `--secret`, `JWT_SECRET`, `LICENSE_SECRET_KEY`.
    /// Empty values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] if no token or no secret is available.
    pub fn resolve<F>(args: &Args, lookup: F) -> Result<Self, UsageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match (&args.file, &args.license_key) {
            (Some(path), _) => TokenSource::File(path.clone()),
            (None, Some(key)) if !key.is_empty() => TokenSource::Inline(key.clone()),
            _ => lookup(LICENSE_KEY_VAR)
                .filter(|key| !key.is_empty())
                .map(TokenSource::Inline)
                .ok_or(UsageError::MissingLicenseKey)?,
        };

        let secret = match args.secret.as_deref() {
            Some(secret) if !secret.is_empty() => SecretKey::from(secret),
            _ => SecretKey::from_lookup(&lookup).ok_or(UsageError::MissingSecret)?,
        };

        Ok(Self {
            source,
            verifier: LicenseVerifier::new(secret),
        })
    }
}

/// Exit status for `verdict`, also requiring `feature` when given.
#[must_use]
pub fn exit_status(verdict: &Verdict, feature: Option<&str>) -> u8 {
    let granted = match feature {
        Some(feature) => verdict.has_feature(feature),
        None => verdict.is_valid(),
    };
    if granted { EXIT_VALID } else { EXIT_INVALID }
}

/// Terminal rendering of a verdict, with an optional feature line.
pub struct HumanVerdict<'a> {
    pub verdict: &'a Verdict,
    pub feature: Option<&'a str>,
}

impl fmt::Display for HumanVerdict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Valid(license) => {
                writeln!(f, "License is VALID\n")?;
                writeln!(f, "Details:")?;
                writeln!(f, "  Customer ID:    {}", license.customer_id)?;
                writeln!(f, "  Issued At:      {}", display_optional_time(license.issued_at.as_deref()))?;
                writeln!(f, "  Expires At:     {}", display_time(&license.expires_at))?;
                writeln!(f, "  Days Remaining: {}", license.days_remaining)?;
                writeln!(f, "  Features:       {}", display_features(&license.features))?;
                if let Some(feature) = self.feature {
                    let granted = if self.verdict.has_feature(feature) { "granted" } else { "NOT granted" };
                    writeln!(f, "\nFeature '{feature}' is {granted}")?;
                }
            }
            Verdict::Invalid(invalid) => {
                writeln!(f, "License is INVALID\n")?;
                writeln!(f, "Error: {}", invalid.error)?;
                if let Some(customer_id) = &invalid.customer_id {
                    writeln!(f, "\nLicense Info (expired):")?;
                    writeln!(f, "  Customer ID: {customer_id}")?;
                    writeln!(f, "  Expires At:  {}", display_optional_time(invalid.expires_at.as_deref()))?;
                }
            }
        }
        Ok(())
    }
}

/// Renders the verdict for a terminal.
#[must_use]
pub fn render_human(verdict: &Verdict, feature: Option<&str>) -> String {
    HumanVerdict { verdict, feature }.to_string()
}

/// Renders the verdict as its JSON report.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(verdict: &Verdict) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&verdict.to_report())
}

/// Re-verifies the license every `every` until `shutdown` resolves.
///
/// `initial` is the verdict of the check that preceded the heartbeat.
/// Returns the last verdict observed.
pub async fn heartbeat<S>(config: &Config, every: Duration, initial: Verdict, shutdown: S) -> Verdict
where
    S: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(every);
    let mut last = initial;
    tokio::pin!(shutdown);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                last = config.source.verify(&config.verifier);
                log_heartbeat(&last);
            }
            () = &mut shutdown => {
                info!("heartbeat stopped");
                return last;
            }
        }
    }
}

fn log_heartbeat(verdict: &Verdict) {
    match verdict {
        Verdict::Valid(license) => {
            info!("license heartbeat OK - {} days remaining", license.days_remaining);
        }
        Verdict::Invalid(invalid) => {
            warn!("license validation failed during heartbeat: {}", invalid.error);
        }
    }
}

fn display_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn display_optional_time(raw: Option<&str>) -> String {
    raw.map_or_else(|| "N/A".to_string(), display_time)
}

fn display_features(features: &[String]) -> String {
    if features.is_empty() {
        "None".to_string()
    } else {
        features.join(", ")
    }
}
