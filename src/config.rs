use std::time::Duration;

use clap::Parser;

pub const DEFAULT_MESSAGE_TIMEOUT: u64 = 8000;
pub const DEFAULT_FAIL_MESSAGE: &str = "We are sorry, but something went wrong!";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    pub log: Option<String>,

    /// How long success and failure messages stay visible (milliseconds)
    #[arg(short = 't', long, default_value_t = DEFAULT_MESSAGE_TIMEOUT)]
    pub message_timeout: u64,

    #[arg(long)]
    pub fail_message: Option<String>,
}

pub fn load_config() -> Config {
    let args = Args::parse();
    Config {
        log_path: args.log,
        message_timeout: Duration::from_millis(args.message_timeout),
        fail_message: args
            .fail_message
            .unwrap_or_else(|| DEFAULT_FAIL_MESSAGE.to_string()),
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub log_path: Option<String>,
    pub message_timeout: Duration,
    pub fail_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MESSAGE_TIMEOUT),
            DEFAULT_FAIL_MESSAGE.to_string(),
        )
    }
}

impl Config {
    pub fn new(message_timeout: Duration, fail_message: String) -> Config {
        Config {
            log_path: None,
            message_timeout,
            fail_message,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["request-status", "--log", "/tmp/log", "-t", "500"]);
        assert_eq!(Some("/tmp/log".to_string()), args.log);
        assert_eq!(500, args.message_timeout);
        assert_eq!(None, args.fail_message);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(Duration::from_secs(8), config.message_timeout);
        assert_eq!(DEFAULT_FAIL_MESSAGE, config.fail_message);
        assert_eq!(None, config.log_path);
    }
}
