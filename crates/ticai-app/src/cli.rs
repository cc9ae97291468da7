use std::path::PathBuf;

use clap::Parser;

/// TicAI: chat with an answer-mode aware assistant from the terminal.
#[derive(Parser, Debug)]
#[command(name = "ticai", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Store file path override.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Keep the conversation in memory only.
    #[arg(long, conflicts_with = "store")]
    pub ephemeral: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["ticai"]);
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(args.store.is_none());
        assert!(!args.ephemeral);
        assert!(!args.print_config);
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "ticai",
            "--config",
            "/tmp/ticai.toml",
            "--log-level",
            "debug",
            "--store",
            "/tmp/store.json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/ticai.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.store, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn ephemeral_conflicts_with_store() {
        assert!(Args::try_parse_from(["ticai", "--ephemeral", "--store", "x.json"]).is_err());
    }
}
