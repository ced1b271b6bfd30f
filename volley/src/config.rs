//! config module validates [Arg] into the inputs of a load test

use crate::arg::Arg;
use crate::dispatcher::MAX_REQUESTS;
use crate::error::Error;
use reqwest::Url;
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

/// timeout applied to every request unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// upper bound of concurrent workers
pub const MAX_CONCURRENCY: usize = 10_000;

/// validated inputs of a load test
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: String,
    pub requests: NonZeroU64,
    pub concurrency: NonZeroUsize,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        url: &str,
        requests: u64,
        concurrency: usize,
    ) -> Result<Config, Error> {
        Self::validate(url, requests, concurrency, DEFAULT_TIMEOUT)
    }

    fn validate(
        url: &str,
        requests: u64,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Config, Error> {
        let url = url.trim();
        if url.is_empty() {
            return Err(invalid("url must not be empty"));
        }
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {},
            Ok(parsed) => {
                return Err(invalid(format!(
                    "unsupported url scheme: {}",
                    parsed.scheme()
                )))
            },
            Err(err) => {
                return Err(invalid(format!("invalid url {}: {}", url, err)))
            },
        }

        let requests = NonZeroU64::new(requests)
            .ok_or_else(|| invalid("requests must be positive"))?;
        if requests.get() > MAX_REQUESTS {
            return Err(invalid(format!(
                "requests must not exceed {}",
                MAX_REQUESTS
            )));
        }

        let concurrency = NonZeroUsize::new(concurrency)
            .ok_or_else(|| invalid("concurrency must be positive"))?;
        if concurrency.get() > MAX_CONCURRENCY {
            return Err(invalid(format!(
                "concurrency must not exceed {}",
                MAX_CONCURRENCY
            )));
        }

        if timeout.is_zero() {
            return Err(invalid("timeout must be positive"));
        }

        Ok(Config {
            url: url.to_string(),
            requests,
            concurrency,
            timeout,
        })
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::Config(msg.into())
}

impl TryFrom<&Arg> for Config {
    type Error = Error;

    fn try_from(arg: &Arg) -> Result<Self, Self::Error> {
        let url = arg.url.as_deref().unwrap_or_default();
        Self::validate(
            url,
            arg.requests.unwrap_or(0),
            arg.concurrency.unwrap_or(0),
            arg.timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Config, Error> {
        let arg = Arg::try_parse_from(args).unwrap();
        Config::try_from(&arg)
    }

    #[test]
    fn test_valid() {
        let config = parse(&[
            "volley",
            "-u",
            "http://127.0.0.1:8080/",
            "-n",
            "100",
            "-c",
            "10",
            "-t",
            "3s",
        ])
        .unwrap();
        assert_eq!(
            config,
            Config {
                url: "http://127.0.0.1:8080/".to_string(),
                requests: NonZeroU64::new(100).unwrap(),
                concurrency: NonZeroUsize::new(10).unwrap(),
                timeout: Duration::from_secs(3),
            }
        );
    }

    #[test]
    fn test_default_timeout() {
        let config = Config::new("https://example.com", 1, 1).unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_reject_zero() {
        let config = Config::new("http://localhost", 0, 1);
        assert!(matches!(config, Err(Error::Config(_))));

        let config = Config::new("http://localhost", 1, 0);
        assert!(matches!(config, Err(Error::Config(_))));

        let config = parse(&[
            "volley", "-u", "http://a", "-n", "1", "-c", "1", "-t", "0",
        ]);
        assert!(matches!(config, Err(Error::Config(_))));
    }

    #[test]
    fn test_reject_url() {
        for url in ["", "   ", "not a url", "ftp://example.com"] {
            let config = Config::new(url, 1, 1);
            assert!(matches!(config, Err(Error::Config(_))), "{}", url);
        }
    }

    #[test]
    fn test_reject_too_large() {
        assert!(Config::new("http://a", MAX_REQUESTS + 1, 1).is_err());
        assert!(Config::new("http://a", 1, MAX_CONCURRENCY + 1).is_err());
    }

    #[test]
    fn test_completions_only() {
        let config = parse(&["volley", "--completions", "zsh"]);
        assert!(matches!(config, Err(Error::Config(_))));
    }
}
