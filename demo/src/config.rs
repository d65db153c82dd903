use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Run concurrent actors against a shared route network
#[derive(Parser, Debug, Clone)]
#[command(name = "route-graph-demo")]
#[command(about = "Run concurrent actors against a shared route network")]
#[command(version)]
pub struct Cli {
    /// Base actor period in milliseconds
    #[arg(long, env = "ROUTE_GRAPH_TICK_MS", default_value_t = 1000)]
    pub tick_ms: u64,

    /// Stop all actors after this many seconds (0 = run until killed)
    #[arg(long, env = "ROUTE_GRAPH_DURATION_SECS", default_value_t = 0)]
    pub duration_secs: u64,

    /// Origin of the watched path query
    #[arg(long, default_value = "Kyiv")]
    pub from: String,

    /// Destination of the watched path query
    #[arg(long, default_value = "Dnipro")]
    pub to: String,

    /// Print the final network snapshot as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick_ms must be greater than zero")]
    ZeroTick,
    #[error("city name for --{0} must not be empty")]
    EmptyCity(&'static str),
    #[error("path query needs two different cities, got '{0}' for both")]
    SameEndpoints(String),
}

/// Validated demo settings.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub tick: Duration,
    /// None runs forever.
    pub run_for: Option<Duration>,
    pub from: String,
    pub to: String,
    pub json: bool,
    pub verbose: bool,
}

impl TryFrom<Cli> for DemoConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if cli.from.trim().is_empty() {
            return Err(ConfigError::EmptyCity("from"));
        }
        if cli.to.trim().is_empty() {
            return Err(ConfigError::EmptyCity("to"));
        }
        if cli.from == cli.to {
            return Err(ConfigError::SameEndpoints(cli.from));
        }

        Ok(Self {
            tick: Duration::from_millis(cli.tick_ms),
            run_for: (cli.duration_secs > 0).then(|| Duration::from_secs(cli.duration_secs)),
            from: cli.from,
            to: cli.to,
            json: cli.json,
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DemoConfig, ConfigError> {
        let argv = std::iter::once("route-graph-demo").chain(args.iter().copied());
        DemoConfig::try_from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.from, "Kyiv");
        assert_eq!(config.to, "Dnipro");
        assert!(!config.json);
        assert!(!config.verbose);
    }

    #[test]
    fn test_duration() {
        let config = parse(&["--tick-ms", "50", "--duration-secs", "3"]).unwrap();
        assert_eq!(config.tick, Duration::from_millis(50));
        assert_eq!(config.run_for, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_duration_runs_forever() {
        let config = parse(&["--tick-ms", "50", "--duration-secs", "0"]).unwrap();
        assert_eq!(config.run_for, None);
    }

    #[test]
    fn test_zero_tick_rejected() {
        assert_eq!(parse(&["--tick-ms", "0"]).unwrap_err(), ConfigError::ZeroTick);
    }

    #[test]
    fn test_empty_city_rejected() {
        assert_eq!(
            parse(&["--from", " "]).unwrap_err(),
            ConfigError::EmptyCity("from")
        );
    }

    #[test]
    fn test_same_endpoints_rejected() {
        let err = parse(&["--from", "Lviv", "--to", "Lviv"]).unwrap_err();
        assert_eq!(err, ConfigError::SameEndpoints("Lviv".to_string()));
        assert_eq!(
            err.to_string(),
            "path query needs two different cities, got 'Lviv' for both"
        );
    }
}
