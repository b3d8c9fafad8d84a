use crate::cli::Args;
use crate::errors::{Error, Result};
use crate::transform::{Transform, TransformChain};
use glob::Pattern;
use serde::Deserialize;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// The path argument that stands for standard input and output.
pub const STDIN_SENTINEL: &str = "-";

/// A single pattern/replacement pair as it appears in a rules file.
#[derive(Deserialize, Debug, Clone)]
pub struct Rule {
    /// The regex pattern string.
    pub pattern: String,
    /// The replacement, which may reference capture groups (`$1`, `${name}`).
    #[serde(default)]
    pub replacement: String,
}

/// The contents of a YAML rules file.
///
/// ```yaml
/// pairs:
///   - pattern: 'foo'
///     replacement: 'bar'
/// ```
#[derive(Deserialize, Debug)]
pub struct RulesFile {
    pub pairs: Vec<Rule>,
}

/// Traversal and editing switches shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Base names must match this glob to be dispatched.
    pub glob: Pattern,
    /// Visit entries whose name starts with a dot.
    pub include_hidden: bool,
    /// Directories deeper than this are skipped. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Apply the chain to file and directory names too.
    pub replace_names: bool,
    /// Apply the chain to names only, never touching contents.
    pub names_only: bool,
    /// Print edited contents instead of writing them back.
    pub to_stdout: bool,
    pub verbose: bool,
    /// Number of worker threads. `None` uses one per logical CPU.
    pub workers: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            glob: Pattern::new("*").expect("`*` is a valid glob"),
            include_hidden: false,
            max_depth: None,
            replace_names: false,
            names_only: false,
            to_stdout: false,
            verbose: false,
            workers: None,
        }
    }
}

impl WalkOptions {
    /// Whether the chain must be applied to entry names.
    pub fn edits_names(&self) -> bool {
        self.replace_names || self.names_only
    }

    /// Converts the command-line depth, where any negative value is unbounded.
    pub fn depth_limit(max_depth: i64) -> Option<usize> {
        usize::try_from(max_depth).ok()
    }
}

/// What a run operates on.
///
/// Standard input cannot be combined with filesystem paths, so the two are
/// separate variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    Stdin,
    Paths(Vec<PathBuf>),
}

impl Targets {
    /// Classifies the path arguments, rejecting stdin mixed with other paths.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let has_stdin = args.iter().any(|a| a.as_ref() == STDIN_SENTINEL);
        match args {
            [] => Err(Error::Usage),
            [only] if only.as_ref() == STDIN_SENTINEL => Ok(Targets::Stdin),
            _ if has_stdin => {
                Err("cannot edit multiple files and stdin at the same time".into())
            }
            _ => Ok(Targets::Paths(
                args.iter().map(|a| clean_path(Path::new(a.as_ref()))).collect(),
            )),
        }
    }
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain: TransformChain,
    pub targets: Targets,
    pub options: WalkOptions,
}

impl Config {
    /// Validates the parsed arguments and compiles patterns and glob.
    ///
    /// Without any `-e` pair or rules file, the first two positionals are the
    /// pattern and replacement and at least one path must follow. Otherwise
    /// every positional is a path.
    pub fn from_args(args: Args) -> Result<Self> {
        let mut chain = TransformChain::default();

        if let Some(rules_path) = &args.rules {
            for rule in ConfigLoader::load_rules(rules_path)?.pairs {
                chain.push(Transform::new(&rule.pattern, rule.replacement)?);
            }
        }
        for pair in args.exprs.chunks_exact(2) {
            chain.push(Transform::new(&pair[0], pair[1].as_str())?);
        }

        let paths = if args.rules.is_none() && args.exprs.is_empty() {
            match args.args.as_slice() {
                [pattern, replacement, paths @ ..] if !paths.is_empty() => {
                    chain.push(Transform::new(pattern, replacement.as_str())?);
                    paths
                }
                _ => return Err(Error::Usage),
            }
        } else {
            args.args.as_slice()
        };

        if chain.is_empty() {
            return Err("no pattern/replacement pairs given".into());
        }
        let targets = Targets::from_args(paths)?;

        let options = WalkOptions {
            glob: Pattern::new(&args.glob)?,
            include_hidden: args.include_hidden,
            max_depth: WalkOptions::depth_limit(args.max_depth),
            replace_names: args.replace_names,
            names_only: args.names_only,
            to_stdout: args.to_stdout,
            verbose: args.verbose,
            workers: args.workers,
        };

        Ok(Self {
            chain,
            targets,
            options,
        })
    }
}

/// A utility for loading rules files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a `RulesFile` from a YAML file.
    pub fn load_rules(path: &Path) -> Result<RulesFile> {
        let file = File::open(path).map_err(|e| Error::processing(path, e))?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// Lexically tidies a user-supplied path.
///
/// Repeated separators, `.` components and trailing separators are dropped.
/// `..` is kept as-is and a path that reduces to nothing becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
