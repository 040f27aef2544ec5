// Command-line options. There is no config file and no environment lookup:
// everything the binary needs comes from these flags.

use crate::api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use clap::{ArgAction, Parser};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "perp", version, about = "Interactive shell for asking Perplexity AI questions")]
pub struct Args {
    /// Perplexity API authentication token
    #[arg(long, value_name = "TOKEN")]
    pub auth: Option<String>,

    /// Model to send questions to
    #[arg(long, value_name = "ID", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Root URL of the API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Increase log verbosity (-v, -vv, -vvv); logs go to stderr
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Settings handed to the HTTP client each time a credential is set.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// The startup token, ignoring an empty `--auth ""`.
    pub fn startup_token(&self) -> Option<&str> {
        self.auth.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["perp"]);
        assert_eq!(args.startup_token(), None);
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.verbose, 0);
        assert_eq!(args.api_config(), ApiConfig::default());
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "perp",
            "--auth",
            "pplx-abc",
            "--model",
            "sonar",
            "--base-url",
            "http://localhost:8080",
            "--timeout",
            "5",
            "-vv",
        ]);
        assert_eq!(args.startup_token(), Some("pplx-abc"));
        assert_eq!(args.model, "sonar");
        assert_eq!(args.verbose, 2);
        let cfg = args.api_config();
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn empty_auth_flag_is_ignored() {
        let args = Args::parse_from(["perp", "--auth", ""]);
        assert_eq!(args.startup_token(), None);
    }
}
