//! Dry runs: folders are listed for real but never opened.

use log::info;

use folders_core::command::CommandSpec;
use folders_core::error::SpawnError;
use folders_core::spawn::{RawOutput, Spawner, SystemSpawner};

/// Spawner that prints editor commands instead of running them.
#[derive(Debug, Clone)]
pub struct DryRunSpawner {
    editor_command: String,
    inner: SystemSpawner,
}

impl DryRunSpawner {
    #[must_use]
    pub fn new(editor_command: impl Into<String>) -> Self {
        Self {
            editor_command: editor_command.into(),
            inner: SystemSpawner,
        }
    }

    fn is_editor(&self, command: &CommandSpec) -> bool {
        command.program() == Some(self.editor_command.as_str())
    }
}

impl Spawner for DryRunSpawner {
    fn run(&self, command: &CommandSpec) -> Result<RawOutput, SpawnError> {
        if !self.is_editor(command) {
            return self.inner.run(command);
        }

        info!("Dry run, not running `{command}`");
        match command.working_dir() {
            Some(working_dir) => println!(
                "Dry run is specified, would run:\n{command}\nin {}",
                working_dir.display()
            ),
            None => println!("Dry run is specified, would run:\n{command}"),
        }

        Ok(RawOutput {
            output: Vec::new(),
            exit_code: Some(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_command_is_not_run() {
        let spawner = DryRunSpawner::new("folders-test-no-such-editor");
        let output = spawner
            .run(&CommandSpec::new(["folders-test-no-such-editor", "/work/beta"]))
            .unwrap();

        assert!(output.success());
        assert!(output.output.is_empty());
    }

    #[test]
    fn test_other_commands_still_run() {
        let spawner = DryRunSpawner::new("subl");
        let result = spawner.run(&CommandSpec::new(["folders-test-no-such-lister"]));

        assert!(matches!(result, Err(SpawnError::NotFound { .. })));
    }
}
