//! Shell commands run before and after scaffolding.

use std::fmt::Display;
use std::path::Path;
use std::process::{Command, Stdio};

use log::{error, info};

use crate::config::ConfigStore;
use crate::constants::keys;
use crate::error::{Error, Result};
use crate::report::{EntryKind, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    After,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Before => "pre-scaffolding",
            Phase::After => "post-scaffolding",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandsContext {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl CommandsContext {
    pub fn resolve(store: &ConfigStore) -> Self {
        Self {
            before: store.get_or(keys::COMMANDS_BEFORE, Vec::new()),
            after: store.get_or(keys::COMMANDS_AFTER, Vec::new()),
        }
    }

    pub fn commands(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Before => &self.before,
            Phase::After => &self.after,
        }
    }

    /// Runs the commands of `phase` in order. A failing command is logged and
    /// reported; the remaining commands still run.
    pub fn execute(&self, phase: Phase, cwd: &Path, report: &mut Report) {
        info!("Executing {phase} commands...");
        for command in self.commands(phase) {
            if let Err(err) = run_command(command, cwd) {
                error!("{err}");
                report.error(EntryKind::Commands, command.as_str(), &err);
            }
        }
        info!("All {phase} commands executed");
    }
}

/// Runs one command through the platform shell with inherited stdio.
pub fn run_command(command: &str, cwd: &Path) -> Result<()> {
    info!("Executing: '{command}'");
    let status = shell(command)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(Error::CommandExecutionError { command: command.to_string(), status });
    }
    Ok(())
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
