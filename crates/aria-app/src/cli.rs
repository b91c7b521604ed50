use std::path::PathBuf;

use clap::Parser;

/// Aria: a talking avatar driven from the terminal.
///
/// Type a message to talk to the avatar. Lines starting with `:` are
/// commands (`:click`, `:look X Y`, `:resize W H`, `:character ID`,
/// `:clip`, `:emotion E`, `:quit`).
#[derive(Parser, Debug)]
#[command(name = "aria", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log directive override (e.g. `debug`, `aria_engine=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Character to load instead of the configured default.
    #[arg(long)]
    pub character: Option<String>,

    /// Send this message as soon as the avatar is loaded.
    #[arg(long)]
    pub say: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "aria",
            "--config",
            "/tmp/aria.toml",
            "--log-level",
            "debug",
            "--character",
            "jinyoung",
            "--say",
            "hello there",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("/tmp/aria.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.character.as_deref(), Some("jinyoung"));
        assert_eq!(args.say.as_deref(), Some("hello there"));
    }

    #[test]
    fn all_flags_optional() {
        let args = Args::try_parse_from(["aria"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.say.is_none());
    }
}
