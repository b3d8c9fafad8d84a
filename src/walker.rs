use crate::config::{Config, Targets, WalkOptions};
use crate::editor::{Editor, FileTask};
use crate::errors::Result;
use crate::transform::TransformChain;
use rayon::Scope;
use std::ffi::OsStr;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::{DirEntry, WalkDir};

/// The walker's decision for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Hand the entry to the editor.
    Dispatch,
    /// Leave the entry alone but keep descending into it.
    Skip,
    /// Leave the entry and everything below it alone.
    SkipSubtree,
}

/// Counters collected over a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub dispatched: usize,
    pub renamed: usize,
    pub written: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    dispatched: AtomicUsize,
    renamed: AtomicUsize,
    written: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> WalkStats {
        WalkStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            renamed: self.renamed.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Walks target paths and fans selected entries out to an [`Editor`].
///
/// The directory walk itself runs on one thread; every selected entry becomes
/// its own task on a Rayon pool. [`Walker::walk`] returns only once every task
/// it spawned has finished.
pub struct Walker<'a> {
    editor: Editor<'a>,
    options: &'a WalkOptions,
    counters: Counters,
}

impl<'a> Walker<'a> {
    pub fn new(chain: &'a TransformChain, options: &'a WalkOptions) -> Self {
        Self {
            editor: Editor::new(chain, options),
            options,
            counters: Counters::default(),
        }
    }

    /// Processes every target and waits for all dispatched edits.
    ///
    /// Standard input is edited inline and never touches the pool.
    pub fn walk(&self, targets: &Targets) -> Result<WalkStats> {
        match targets {
            Targets::Stdin => {
                if let Err(e) = self.editor.edit_stream(io::stdin().lock(), io::stdout().lock()) {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("{e}");
                }
            }
            Targets::Paths(paths) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.options.workers.unwrap_or_else(num_cpus::get))
                    .build()?;
                pool.scope(|scope| {
                    for root in paths {
                        self.walk_tree(scope, root);
                    }
                });
            }
        }
        Ok(self.counters.snapshot())
    }

    /// Depth-first walk of one root, spawning a task per selected entry.
    fn walk_tree<'s>(&'s self, scope: &Scope<'s>, root: &Path) {
        // Sorted walks read each directory in full before yielding from it, so
        // temp files written by running tasks never show up as entries.
        let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();
        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    eprintln!("{e}");
                    continue;
                }
            };

            match self.classify(&entry) {
                Visit::Dispatch => self.dispatch(scope, &entry),
                Visit::Skip => {}
                Visit::SkipSubtree => entries.skip_current_dir(),
            }
        }
    }

    fn classify(&self, entry: &DirEntry) -> Visit {
        classify(
            self.options,
            entry.path(),
            entry.file_name(),
            entry.file_type().is_dir(),
        )
    }

    fn dispatch<'s>(&'s self, scope: &Scope<'s>, entry: &DirEntry) {
        let task = FileTask {
            path: entry.path().to_path_buf(),
            is_dir: entry.file_type().is_dir(),
        };
        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);

        scope.spawn(move |_| {
            match self.editor.process(task) {
                Ok(outcome) => {
                    if outcome.renamed {
                        self.counters.renamed.fetch_add(1, Ordering::Relaxed);
                    }
                    if outcome.written {
                        self.counters.written.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("{e}");
                }
            }
        });
    }
}

/// Decides what to do with one entry, checking depth, then hidden-ness,
/// then the glob.
pub fn classify(options: &WalkOptions, path: &Path, name: &OsStr, is_dir: bool) -> Visit {
    if is_dir {
        if let Some(max) = options.max_depth {
            if depth(path) > max {
                return Visit::SkipSubtree;
            }
        }
    }

    if !options.include_hidden && is_hidden(name) {
        return if is_dir {
            Visit::SkipSubtree
        } else {
            Visit::Skip
        };
    }

    if options.glob.matches(&name.to_string_lossy()) {
        Visit::Dispatch
    } else {
        Visit::Skip
    }
}

/// Names starting with a dot are hidden, except `.` and `..`.
pub fn is_hidden(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name != "." && name != ".." && name.starts_with('.')
}

/// Structural depth of a path: its separator count plus one.
///
/// A leading `./`, as produced when walking from `.`, is not counted.
pub fn depth(path: &Path) -> usize {
    let path = path.strip_prefix(".").unwrap_or(path);
    path.to_string_lossy().matches(MAIN_SEPARATOR).count() + 1
}

/// The main entry point: walks every target of `config` and reports a summary
/// in verbose mode.
pub fn run(config: Config) -> Result<WalkStats> {
    if config.options.verbose {
        eprintln!("applying {}", config.chain);
    }

    let walker = Walker::new(&config.chain, &config.options);
    let stats = walker.walk(&config.targets)?;

    if config.options.verbose && matches!(config.targets, Targets::Paths(_)) {
        eprintln!(
            "dispatched {}, renamed {}, written {}, failed {}",
            stats.dispatched, stats.renamed, stats.written, stats.failed
        );
    }
    Ok(stats)
}

/// Convenience wrapper that walks plain paths with the given chain and options.
pub fn walk_paths(
    chain: &TransformChain,
    options: &WalkOptions,
    paths: Vec<PathBuf>,
) -> Result<WalkStats> {
    Walker::new(chain, options).walk(&Targets::Paths(paths))
}
