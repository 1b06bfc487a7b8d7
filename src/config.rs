use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Lab-usage scheduling service.
#[derive(Debug, Clone, Parser)]
#[command(name = "lab_scheduler", version, about)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// JSON dataset (semesters, registrations, labs, teachings) to seed the store with.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Deadline for one scheduling run, in seconds.
    #[arg(long, default_value_t = 30)]
    pub run_timeout_secs: u64,

    /// Default log filter, overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["lab_scheduler"]);
        assert_eq!(config.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert!(config.data.is_none());
        assert_eq!(config.run_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse_from([
            "lab_scheduler",
            "--bind",
            "0.0.0.0:9000",
            "--data",
            "term.json",
            "--run-timeout-secs",
            "5",
        ]);
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.data, Some(PathBuf::from("term.json")));
        assert_eq!(config.run_timeout_secs, 5);
    }
}
