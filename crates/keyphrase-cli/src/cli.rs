use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use keyphrase_core::UnrecognizedKeyPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "keyphrase",
    version = env!("CARGO_PKG_VERSION"),
    about = "keyphrase - keystroke-driven text expansion",
    long_about = "keyphrase swaps a typed phrase key for its stored text after a trigger key."
)]
pub struct Keyphrase {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(long, short, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the expansion daemon in the foreground
    Run(RunArgs),
    /// List the accepted trigger key names
    Keys,
}

#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    #[clap(long, help = "Number of recent characters kept for matching")]
    pub buffer_size: Option<usize>,

    #[clap(
        long = "trigger-keys",
        value_name = "KEY",
        help = "Key that ends a phrase key (repeatable; default enter and space)"
    )]
    pub trigger_keys: Vec<String>,

    #[clap(long, help = "Path to config.json (default ~/.keyphrase/config.json)")]
    pub config: Option<PathBuf>,

    #[clap(long, help = "Path to the phrase database (default ~/.keyphrase/phrases.json)")]
    pub database: Option<PathBuf>,

    #[clap(long, value_enum, help = "What unrecognized keys do to the buffer")]
    pub unrecognized: Option<UnrecognizedArg>,

    #[clap(long, help = "When several keys match, prefer the longest")]
    pub longest_key_first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnrecognizedArg {
    Ignore,
    Clear,
}

impl From<UnrecognizedArg> for UnrecognizedKeyPolicy {
    fn from(arg: UnrecognizedArg) -> Self {
        match arg {
            UnrecognizedArg::Ignore => UnrecognizedKeyPolicy::Ignore,
            UnrecognizedArg::Clear => UnrecognizedKeyPolicy::ClearBuffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        let command = Keyphrase::command();
        command.clone().debug_assert();
        assert_eq!(command.get_name(), "keyphrase");
        assert!(command.get_author().is_none());
    }

    #[test]
    fn run_flags_parse() {
        let args = Keyphrase::try_parse_from([
            "keyphrase",
            "-vv",
            "run",
            "--trigger-keys",
            "tab",
            "--trigger-keys",
            "enter",
            "--unrecognized",
            "clear",
            "--longest-key-first",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        let Commands::Run(run) = args.commands else {
            panic!("expected run");
        };
        assert_eq!(run.trigger_keys, vec!["tab".to_string(), "enter".to_string()]);
        assert_eq!(run.unrecognized, Some(UnrecognizedArg::Clear));
        assert!(run.longest_key_first);
        assert_eq!(run.buffer_size, None);
    }
}
