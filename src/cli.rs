use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Replace regex matches in file contents and names.
///
/// `resub` rewrites every substring matched by one or more regular expressions,
/// in single files, whole directory trees, or standard input.
#[derive(Parser, Debug)]
#[command(
    name = "resub",
    author,
    version,
    about = "Replace regex matches in files, directory trees and names",
    override_usage = "resub [OPTIONS] <PATTERN> <REPLACEMENT> <PATHS>...\n       resub [OPTIONS] -e <PATTERN> <REPLACEMENT> [-e <PATTERN> <REPLACEMENT>]... <PATHS>...",
    long_about = "resub - replace all the substrings matched by regular expressions in one or more files.

Given a directory, every file of the directory tree is edited recursively.
Use `-` as the only path to edit standard input and print the result.

When -e is given several times, the pairs run in the order they are written,
each one on the output of the previous one.",
    after_help = "EXAMPLES:
  resub foo bar my/path1 my/path2
      Replace \"foo\" with \"bar\" in every file under my/path1 and my/path2.

  resub -e foo bar -e baz qux my/path
      Replace \"foo\" with \"bar\", then \"baz\" with \"qux\".

  resub -p -v foo bar my/path
      Print the edited contents instead of writing them.

  resub -e foo bar -e baz qux -g '*.txt' -a my/path
      Edit text files only, hidden ones included.

  resub -n 'test_(.*)' 'spec_$1' src/
      Rename matching files and directories, leaving contents alone."
)]
pub struct Args {
    /// Print to stdout instead of modifying files.
    #[arg(short = 'p', long = "print")]
    pub to_stdout: bool,

    /// Explain what is being done.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only process entries whose name matches this glob.
    ///
    /// Supports `*`, `?` and `[...]` classes, negated with `[!...]` (not
    /// `[^...]`). A `**` must stand alone, so `**.txt` is rejected; use `*.txt`.
    #[arg(short, long, default_value = "*")]
    pub glob: String,

    /// Include hidden files and directories (names starting with a dot).
    #[arg(short = 'a', long = "all")]
    pub include_hidden: bool,

    /// Maximum directory depth. Negative values mean no limit.
    #[arg(short = 'l', long = "max-depth", default_value_t = -1, allow_negative_numbers = true)]
    pub max_depth: i64,

    /// Replace matches in file and directory names.
    #[arg(short = 'r', long = "replace-names")]
    pub replace_names: bool,

    /// Only replace matches in names, ignoring file contents.
    #[arg(short = 'n', long = "names-only")]
    pub names_only: bool,

    /// A pattern and its replacement. Can be repeated.
    #[arg(
        short = 'e',
        long = "expr",
        num_args = 2,
        value_names = ["PATTERN", "REPLACEMENT"],
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub exprs: Vec<String>,

    /// YAML file listing pattern/replacement pairs, applied before any -e pair.
    #[arg(short = 'f', long = "rules")]
    pub rules: Option<PathBuf>,

    /// The number of parallel worker threads. Defaults to the number of logical CPU cores.
    ///
    /// Every selected entry still gets its own task; this only caps how many
    /// run at the same time.
    #[arg(short = 'w', long = "workers", env = "RESUB_WORKERS")]
    pub workers: Option<usize>,

    /// Pattern and replacement (without -e or --rules) followed by the paths to edit.
    ///
    /// Options are only recognised before the first of these; everything after
    /// it is taken literally, so a replacement may start with `-`.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

/// Renders the full help text, used when required arguments are missing.
pub fn usage() -> String {
    Args::command().render_long_help().to_string()
}
