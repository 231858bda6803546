//! Integration tests for the runner against real processes
//!
//! These spawn actual child processes through the system spawner, so they
//! are limited to Unix hosts where `sh` and `pwd` are available.

#![cfg(unix)]

use folders_core::{
    command::CommandSpec,
    config::Settings,
    dispatch::MainContext,
    error::ExecutionFailure,
    host::{Host, CANCELLED},
    picker::{FolderEntry, FolderPicker},
    runner::{Completion, ExecuteOptions, ExecutionResult, ProcessRunner},
    spawn::SystemSpawner,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

type Results = HashMap<&'static str, ExecutionResult>;

fn drain(context: &MainContext<Results>, results: &mut Results, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while results.len() < expected && Instant::now() < deadline {
        context.run_next(results, Duration::from_millis(100));
    }
}

fn record(results: &mut Results, completion: Completion<&'static str>) {
    results.insert(completion.data, completion.result);
}

/// Back to back commands each run in their own directory
#[test]
fn test_concurrent_commands_keep_their_working_directories() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let context: MainContext<Results> = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());

    for _ in 0..5 {
        runner.execute(
            CommandSpec::new(["pwd", "-P"]).with_working_dir(first.path()),
            ExecuteOptions::with_data("first"),
            record,
        );
        runner.execute(
            CommandSpec::new(["pwd", "-P"]).with_working_dir(second.path()),
            ExecuteOptions::with_data("second"),
            record,
        );

        let mut results = Results::new();
        drain(&context, &mut results, 2);

        let first_dir = results.remove("first").unwrap().unwrap();
        let second_dir = results.remove("second").unwrap().unwrap();
        assert_eq!(
            PathBuf::from(first_dir.trim()),
            first.path().canonicalize().unwrap()
        );
        assert_eq!(
            PathBuf::from(second_dir.trim()),
            second.path().canonicalize().unwrap()
        );
    }

    // The runner never moves the process itself
    assert_ne!(env::current_dir().unwrap(), first.path());
    assert_ne!(env::current_dir().unwrap(), second.path());
}

/// Execute returns before a slow command finishes
#[test]
fn test_execute_does_not_block_the_caller() {
    let context: MainContext<Results> = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());

    let started = Instant::now();
    runner.execute(
        CommandSpec::new(["sh", "-c", "sleep 1; echo done"]),
        ExecuteOptions::with_data("slow"),
        record,
    );
    assert!(started.elapsed() < Duration::from_millis(500));

    let mut results = Results::new();
    drain(&context, &mut results, 1);
    assert_eq!(results["slow"].as_deref().unwrap(), "done\n");
}

/// Merged output of a failing command is not a success value
#[test]
fn test_failing_command_reports_exit_code() {
    let context: MainContext<Results> = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());

    runner.execute(
        CommandSpec::new(["sh", "-c", "echo oops 1>&2; exit 1"]),
        ExecuteOptions::with_data("failing"),
        record,
    );

    let mut results = Results::new();
    drain(&context, &mut results, 1);
    assert!(matches!(
        results["failing"],
        Err(ExecutionFailure::NonZeroExit { code: 1 })
    ));
}

/// Stdin payloads reach the child
#[test]
fn test_stdin_is_fed_to_the_child() {
    let context: MainContext<Results> = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());

    runner.execute(
        CommandSpec::new(["tr", "a-z", "A-Z"]),
        ExecuteOptions::with_data("upper").stdin("beta\n"),
        record,
    );

    let mut results = Results::new();
    drain(&context, &mut results, 1);
    assert_eq!(results["upper"].as_deref().unwrap(), "BETA\n");
}

#[derive(Default)]
struct MessageHost {
    errors: Vec<String>,
    panels: usize,
    pick: Option<isize>,
}

impl Host for MessageHost {
    fn active_file(&self) -> Option<PathBuf> {
        None
    }

    fn project_folders(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    fn fallback_encoding(&self) -> Option<String> {
        None
    }

    fn show_quick_panel(&mut self, _entries: &[FolderEntry]) -> isize {
        self.panels += 1;
        self.pick.unwrap_or(CANCELLED)
    }

    fn status_message(&mut self, _message: &str) {}

    fn error_message(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// A list command missing from PATH shows one message with the real PATH
#[test]
fn test_missing_executable_message_uses_environment_path() {
    let context = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());
    let settings = Settings {
        list_command: "folders-test-no-such-lister".to_string(),
        ..Settings::default()
    };
    let mut picker = FolderPicker::new(settings, MessageHost::default(), runner).unwrap();

    picker.list();
    picker.run_until_idle(&context);

    let errors = &picker.host().errors;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].ends_with(&format!("PATH is: {}", env::var("PATH").unwrap_or_default())));
    assert_eq!(picker.host().panels, 0);
    assert!(picker.entries().is_empty());
}

/// Listing a real directory finds its folders
#[test]
fn test_lists_real_directory() {
    let base = tempfile::tempdir().unwrap();
    for name in ["alpha", "beta", "gamma"] {
        fs::create_dir(base.path().join(name)).unwrap();
    }

    let context = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());
    let settings = Settings {
        base_folder: base.path().to_string_lossy().into_owned(),
        ..Settings::default()
    };
    let mut picker = FolderPicker::new(settings, MessageHost::default(), runner).unwrap();

    picker.list();
    picker.run_until_idle(&context);

    let names: Vec<&str> = picker.entries().iter().map(FolderEntry::name).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(picker.host().panels, 1);
}

/// An editor launcher that forks a long-lived window process does not keep
/// the session waiting
#[test]
fn test_open_returns_when_editor_launcher_exits() {
    let base = tempfile::tempdir().unwrap();
    fs::create_dir(base.path().join("alpha")).unwrap();

    let bin = tempfile::tempdir().unwrap();
    let launcher = bin.path().join("forking-editor");
    fs::write(&launcher, "#!/bin/sh\n(sleep 4) &\nexit 0\n").unwrap();
    fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755)).unwrap();

    let context = MainContext::new();
    let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());
    let settings = Settings {
        base_folder: base.path().to_string_lossy().into_owned(),
        editor_command: launcher.to_string_lossy().into_owned(),
        show_status: false,
        ..Settings::default()
    };
    let host = MessageHost {
        pick: Some(0),
        ..MessageHost::default()
    };
    let mut picker = FolderPicker::new(settings, host, runner).unwrap();

    let started = Instant::now();
    picker.list();
    picker.run_until_idle(&context);

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(picker.host().errors.is_empty());
    assert!(picker.take_fatal().is_none());
}
