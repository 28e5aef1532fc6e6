use clap::Parser;

use crate::models::CLIConfig;

/// Terminal chat client for the echo scheduler API.
#[derive(Debug, Parser)]
#[command(name = "echo-debug", version)]
pub struct Args {
    /// Scheduler API base URL
    #[arg(long = "base", env = "ECHO_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Print the raw action payload after each reply
    #[arg(long, env = "ECHO_DEBUG")]
    pub debug: bool,
}

pub fn parse_config() -> CLIConfig {
    let args = Args::parse();
    CLIConfig {
        base_url: args.base_url,
        debug: args.debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from(["echo-debug", "--base", "http://10.0.0.2:9000", "--debug"])
            .expect("parsed");
        assert_eq!(args.base_url, "http://10.0.0.2:9000");
        assert!(args.debug);
    }
}
