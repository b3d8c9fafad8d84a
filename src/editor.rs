use crate::config::WalkOptions;
use crate::errors::{Error, Result};
use crate::transform::TransformChain;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// One filesystem entry selected by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// What happened to a single task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub renamed: bool,
    pub written: bool,
}

/// Applies a `TransformChain` to the names and contents of file tasks.
///
/// An `Editor` is shared by reference between all concurrent tasks of a run;
/// only the print-to-stdout writer needs locking.
pub struct Editor<'a> {
    chain: &'a TransformChain,
    options: &'a WalkOptions,
    out: Mutex<Box<dyn Write + Send + 'a>>,
}

impl<'a> Editor<'a> {
    /// Creates an editor that prints to the process's standard output.
    pub fn new(chain: &'a TransformChain, options: &'a WalkOptions) -> Self {
        Self::with_output(chain, options, Box::new(std::io::stdout()))
    }

    /// Creates an editor whose print-to-stdout output goes to `out`.
    pub fn with_output(
        chain: &'a TransformChain,
        options: &'a WalkOptions,
        out: Box<dyn Write + Send + 'a>,
    ) -> Self {
        Self {
            chain,
            options,
            out: Mutex::new(out),
        }
    }

    /// Runs one task to completion: rename first, then the content edit.
    ///
    /// A failed rename is reported and the content edit continues on the
    /// original path. Content errors abort the task.
    pub fn process(&self, task: FileTask) -> Result<EditOutcome> {
        let mut outcome = EditOutcome::default();
        let mut path = task.path;

        if self.options.edits_names() {
            match self.rename(&path) {
                Ok(Some(new_path)) => {
                    path = new_path;
                    outcome.renamed = true;
                }
                Ok(None) => {}
                Err(e) => eprintln!("{e}"),
            }
        }

        if self.options.names_only || task.is_dir || !self.matches_glob(&path) {
            return Ok(outcome);
        }

        outcome.written = self.edit_content(&path)?;
        Ok(outcome)
    }

    /// Renames `path` within its parent directory by applying the chain to its
    /// base name.
    ///
    /// Returns `Ok(None)` when the name would not change.
    pub fn rename(&self, path: &Path) -> Result<Option<PathBuf>> {
        let Some(name) = path.file_name() else {
            return Ok(None);
        };
        let old = name_bytes(name);
        let new = self.chain.replace_all(&old);
        if new.as_ref() == old.as_slice() {
            return Ok(None);
        }

        let new_path = path.with_file_name(name_from_bytes(new.into_owned()));
        if self.options.verbose {
            println!("renaming {} to {}", path.display(), new_path.display());
        }
        fs::rename(path, &new_path).map_err(|e| Error::processing(path, e))?;
        Ok(Some(new_path))
    }

    /// Edits the content of a regular file.
    ///
    /// In print-to-stdout mode the result is always printed and the file is
    /// left alone. Otherwise the file is only rewritten when at least one
    /// transform matches. Returns whether the file was written.
    pub fn edit_content(&self, path: &Path) -> Result<bool> {
        let content = fs::read(path).map_err(|e| Error::processing(path, e))?;

        if self.options.to_stdout {
            let replaced = self.chain.replace_all(&content);
            self.emit(&replaced).map_err(|e| Error::processing(path, e))?;
            return Ok(false);
        }

        if !self.chain.is_match(&content) {
            return Ok(false);
        }

        if self.options.verbose {
            println!("writing {}", path.display());
        }
        let replaced = self.chain.replace_all(&content);
        write_preserving_permissions(path, &replaced)?;
        Ok(true)
    }

    /// Reads `input` up to a NUL byte or end of input, applies the chain once
    /// and writes the result, terminator included, to `output`.
    pub fn edit_stream<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        let mut buf = Vec::new();
        input.read_until(0, &mut buf)?;
        output.write_all(&self.chain.replace_all(&buf))?;
        output.flush()?;
        Ok(())
    }

    /// Whether the base name of `path` matches the configured glob.
    pub fn matches_glob(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(OsStr::to_string_lossy)
            .unwrap_or_else(|| path.to_string_lossy());
        self.options.glob.matches(&name)
    }

    fn emit(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| std::io::Error::other("output writer poisoned"))?;
        out.write_all(bytes)?;
        out.flush()
    }
}

/// Atomically replaces the content of `path`, keeping its permission bits.
///
/// Symlinks are resolved first so the link survives and its target is
/// rewritten.
fn write_preserving_permissions(path: &Path, content: &[u8]) -> Result<()> {
    let target = fs::canonicalize(path).map_err(|e| Error::processing(path, e))?;
    let perms = fs::metadata(&target)
        .map_err(|e| Error::processing(path, e))?
        .permissions();

    let parent = target
        .parent()
        .ok_or_else(|| format!("Could not get parent directory for {}", path.display()))?;
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| Error::processing(path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::processing(path, e))?;
    fs::set_permissions(temp_file.path(), perms).map_err(|e| Error::processing(path, e))?;
    temp_file
        .persist(&target)
        .map_err(|e| Error::processing(path, e))?;
    Ok(())
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(unix)]
fn name_from_bytes(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

#[cfg(not(unix))]
fn name_from_bytes(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}
