use crate::error::Result;
use clap::Parser;
use primetune::engine::config::SearchOptions;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "primetune - Tune an integer parameter of an external command by concurrent prime-seeded search.",
    help_template = HELP_TEMPLATE,
    after_help = "The command is run once per candidate with every `{}` replaced by the \
candidate value (appended as a final argument when no placeholder is given); its stdout \
must end in a floating-point score."
)]
pub struct Cli {
    /// Scorer command and its arguments; `{}` marks where the candidate goes.
    #[arg(required = true, trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,

    /// Smallest parameter value allowed to be scored (values below 2 are clamped to 2)
    #[arg(long, value_name = "INT")]
    pub min: Option<i64>,

    /// Largest parameter value allowed to be scored (any value below 2 means unbounded)
    #[arg(long, value_name = "INT")]
    pub max: Option<i64>,

    /// Number of prime-seeded search lineages (defaults to the available logical cores)
    #[arg(short, long, value_name = "NUM")]
    pub branches: Option<i64>,

    /// Minimize the score instead of maximizing it
    #[arg(long)]
    pub minimize: bool,

    /// Log every processed candidate and its score
    #[arg(long)]
    pub show_candidates: bool,

    /// Path to a TOML file with search options; explicit flags override it
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Search options from the optional TOML file, with explicit flags
    /// applied on top.
    pub fn merged_options(&self) -> Result<SearchOptions> {
        let mut options = match &self.config {
            Some(path) => SearchOptions::load(path)?,
            None => SearchOptions::default(),
        };

        if let Some(min) = self.min {
            options.min_value = min;
        }
        if let Some(max) = self.max {
            options.max_value = max;
        }
        if let Some(branches) = self.branches {
            options.branches = branches;
        }
        if self.minimize {
            options.maximize = false;
        }
        if self.show_candidates {
            options.verbose = true;
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_map_onto_search_options() {
        let cli = Cli::try_parse_from([
            "primetune",
            "--min",
            "14",
            "--max",
            "50",
            "--branches",
            "8",
            "--minimize",
            "--",
            "bench.sh",
            "{}",
        ])
        .unwrap();

        let options = cli.merged_options().unwrap();
        assert_eq!(options.min_value, 14);
        assert_eq!(options.max_value, 50);
        assert_eq!(options.branches, 8);
        assert!(!options.maximize);
        assert_eq!(cli.command, vec!["bench.sh", "{}"]);
    }

    #[test]
    fn omitted_flags_keep_the_defaults() {
        let cli = Cli::try_parse_from(["primetune", "bench.sh"]).unwrap();
        let options = cli.merged_options().unwrap();
        assert_eq!(options, SearchOptions::default());
    }

    #[test]
    fn explicit_flags_override_the_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min-value = 5\nmax-value = 100\nbranches = 2").unwrap();

        let cli = Cli::try_parse_from([
            "primetune",
            "--config",
            file.path().to_str().unwrap(),
            "--max",
            "60",
            "bench.sh",
        ])
        .unwrap();

        let options = cli.merged_options().unwrap();
        assert_eq!(options.min_value, 5);
        assert_eq!(options.max_value, 60);
        assert_eq!(options.branches, 2);
    }

    #[test]
    fn the_scorer_command_is_required() {
        assert!(Cli::try_parse_from(["primetune", "--min", "2"]).is_err());
    }
}
