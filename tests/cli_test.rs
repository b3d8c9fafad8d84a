use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// A temp directory whose name is not hidden, so the walker descends into it.
fn temp_tree() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("cli").tempdir().unwrap()
}

fn resub(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resub"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RESUB_WORKERS")
        .output()
        .unwrap()
}

fn resub_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_resub"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

// ---------------------------------------------------------------------------
// End-to-end runs
// ---------------------------------------------------------------------------

#[test]
fn chained_pairs_rewrite_file() {
    let dir = temp_tree();
    let file = dir.path().join("file.txt");
    fs::write(&file, "foo baz foo baz").unwrap();

    let out = resub(&["-e", "foo", "bar", "-e", "baz", "qux", "file.txt"], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&file).unwrap(), "bar qux bar qux");
}

#[test]
fn hidden_files_are_left_alone() {
    let dir = temp_tree();
    fs::write(dir.path().join("foo.txt"), "foo").unwrap();
    fs::write(dir.path().join(".hidden.txt"), "foo").unwrap();

    let out = resub(&["-g", "*.txt", "foo", "", "."], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("foo.txt")).unwrap(), "");
    assert_eq!(fs::read_to_string(dir.path().join(".hidden.txt")).unwrap(), "foo");
}

#[test]
fn names_only_renames_without_editing() {
    let dir = temp_tree();
    fs::write(dir.path().join("foo.txt"), "foo content").unwrap();

    let out = resub(&["-n", "foo", "bar", "foo.txt"], dir.path());

    assert!(out.status.success());
    assert!(!dir.path().join("foo.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("bar.txt")).unwrap(),
        "foo content"
    );
}

#[test]
fn stdin_is_edited_up_to_terminator() {
    let out = resub_stdin(
        &["-e", "foo", "bar", "-e", "baz", "qux", "-"],
        b"foo baz foo\0",
    );

    assert!(out.status.success());
    assert_eq!(out.stdout, b"bar qux bar\0");
}

#[test]
fn print_mode_leaves_file_untouched() {
    let dir = temp_tree();
    let file = dir.path().join("a.txt");
    fs::write(&file, "foo").unwrap();

    let out = resub(&["-p", "foo", "bar", "a.txt"], dir.path());

    assert!(out.status.success());
    assert_eq!(out.stdout, b"bar");
    assert_eq!(fs::read_to_string(&file).unwrap(), "foo");
}

#[test]
fn io_errors_do_not_change_exit_status() {
    let dir = temp_tree();

    let out = resub(&["foo", "bar", "does-not-exist"], dir.path());

    assert!(out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn replace_names_renames_entries_and_edits_content() {
    let dir = temp_tree();
    fs::write(dir.path().join("foo.txt"), "foo inside").unwrap();
    fs::create_dir(dir.path().join("foo_dir")).unwrap();

    let out = resub(&["-r", "foo", "bar", "."], dir.path());

    assert!(out.status.success());
    assert!(!dir.path().join("foo.txt").exists());
    assert!(!dir.path().join("foo_dir").exists());
    assert!(dir.path().join("bar_dir").is_dir());
    assert_eq!(
        fs::read_to_string(dir.path().join("bar.txt")).unwrap(),
        "bar inside"
    );
}

#[test]
fn max_depth_limits_descent() {
    let dir = temp_tree();
    fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
    fs::write(dir.path().join("a.txt"), "foo").unwrap();
    fs::write(dir.path().join("sub/b.txt"), "foo").unwrap();
    fs::write(dir.path().join("sub/deeper/c.txt"), "foo").unwrap();

    let out = resub(&["-l", "1", "foo", "bar", "."], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "bar");
    assert_eq!(fs::read_to_string(dir.path().join("sub/b.txt")).unwrap(), "bar");
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/deeper/c.txt")).unwrap(),
        "foo"
    );
}

#[test]
fn all_flag_includes_hidden_entries() {
    let dir = temp_tree();
    fs::write(dir.path().join(".hidden.txt"), "foo").unwrap();
    fs::create_dir(dir.path().join(".cache")).unwrap();
    fs::write(dir.path().join(".cache/inner.txt"), "foo").unwrap();

    let out = resub(&["-a", "foo", "bar", "."], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(dir.path().join(".hidden.txt")).unwrap(), "bar");
    assert_eq!(
        fs::read_to_string(dir.path().join(".cache/inner.txt")).unwrap(),
        "bar"
    );
}

#[test]
fn glob_excludes_non_matching_files() {
    let dir = temp_tree();
    fs::write(dir.path().join("a.txt"), "foo").unwrap();
    fs::write(dir.path().join("foo.md"), "foo").unwrap();

    let out = resub(&["-r", "-g", "*.txt", "foo", "bar", "."], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "bar");
    assert_eq!(fs::read_to_string(dir.path().join("foo.md")).unwrap(), "foo");
    assert!(!dir.path().join("bar.md").exists());
}

#[test]
fn verbose_reports_writes_and_summary() {
    let dir = temp_tree();
    fs::write(dir.path().join("a.txt"), "foo").unwrap();

    let out = resub(&["-v", "foo", "bar", "a.txt"], dir.path());

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stdout.contains("writing a.txt"));
    assert!(stderr.contains("applying ['foo', 'bar']"));
    assert!(stderr.contains("dispatched 1, renamed 0, written 1, failed 0"));
}

#[test]
fn verbose_reports_renames() {
    let dir = temp_tree();
    fs::write(dir.path().join("foo.txt"), "content").unwrap();

    let out = resub(&["-v", "-n", "foo", "bar", "foo.txt"], dir.path());

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("renaming foo.txt to bar.txt"));
    assert!(!stdout.contains("writing"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("renamed 1, written 0"));
}

#[test]
fn replacement_may_start_with_hyphen() {
    let dir = temp_tree();
    let file = dir.path().join("a.txt");
    fs::write(&file, "x").unwrap();

    let out = resub(&["x", "-y", "a.txt"], dir.path());

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&file).unwrap(), "-y");
}

#[cfg(unix)]
#[test]
fn task_errors_name_the_path_once() {
    let dir = temp_tree();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.txt"))
        .unwrap();

    let out = resub(&["foo", "bar", "."], dir.path());

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("dangling.txt").count(), 1, "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[test]
fn stdin_mixed_with_paths_is_rejected() {
    let dir = temp_tree();
    let file = dir.path().join("a.txt");
    fs::write(&file, "foo").unwrap();

    let out = resub(&["foo", "bar", "-", "a.txt"], dir.path());

    assert!(!out.status.success());
    assert_eq!(fs::read_to_string(&file).unwrap(), "foo");
}

#[test]
fn missing_paths_print_usage() {
    let dir = temp_tree();

    let out = resub(&["foo", "bar"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));

    let out = resub(&["-e", "foo", "bar"], dir.path());
    assert!(!out.status.success());
}

#[test]
fn invalid_pattern_is_fatal() {
    let dir = temp_tree();
    let file = dir.path().join("a.txt");
    fs::write(&file, "foo(").unwrap();

    let out = resub(&["foo(", "bar", "a.txt"], dir.path());

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid pattern"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "foo(");
}
