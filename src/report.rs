//! Run summary: what was created, skipped and what failed.

use std::fmt::{Display, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Kind of entry a report line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Component,
    Directories,
    Units,
    Files,
    Templates,
    Commands,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryKind::Component => "Component",
            EntryKind::Directories => "Directories",
            EntryKind::Units => "Units",
            EntryKind::Files => "Files",
            EntryKind::Templates => "Templates",
            EntryKind::Commands => "Commands",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub kind: EntryKind,
    pub name: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: EntryKind,
    pub name: String,
    pub message: String,
}

/// Collects the outcome of every stage of one run.
#[derive(Debug, Clone)]
pub struct Report {
    created: IndexMap<EntryKind, Vec<PathBuf>>,
    skipped: Vec<Skipped>,
    errors: Vec<Failure>,
}

impl Default for Report {
    fn default() -> Self {
        let created = [EntryKind::Directories, EntryKind::Units, EntryKind::Files]
            .into_iter()
            .map(|kind| (kind, Vec::new()))
            .collect();
        Self { created, skipped: Vec::new(), errors: Vec::new() }
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created<P: Into<PathBuf>>(&mut self, kind: EntryKind, path: P) {
        self.created.entry(kind).or_default().push(path.into());
    }

    pub fn skipped<S: Into<String>>(&mut self, kind: EntryKind, name: S, reason: Option<String>) {
        self.skipped.push(Skipped { kind, name: name.into(), reason });
    }

    pub fn error<S: Into<String>, M: Display>(&mut self, kind: EntryKind, name: S, message: M) {
        self.errors.push(Failure { kind, name: name.into(), message: message.to_string() });
    }

    pub fn created_entries(&self, kind: EntryKind) -> &[PathBuf] {
        self.created.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn skipped_entries(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    /// The printable summary for a component.
    pub fn render(&self, component_name: &str, component_path: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "'{component_name}' Scaffolded Successfully!");
        let _ = writeln!(out, "Path: {}", component_path.display());

        for (kind, entries) in &self.created {
            let _ = writeln!(out, "  {kind}: {}", entries.len());
        }

        if !self.skipped.is_empty() {
            let _ = writeln!(out, "\nSkipped:");
            for s in &self.skipped {
                let reason = s.reason.as_deref().unwrap_or("No reason");
                let _ = writeln!(out, "  - [{}] {} ({reason})", s.kind, s.name);
            }
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "\nErrors:");
            for e in &self.errors {
                let _ = writeln!(out, "  - [{}] {} ({})", e.kind, e.name, e.message);
            }
        }
        out
    }

    pub fn print(&self, component_name: &str, component_path: &Path) {
        print!("{}", self.render(component_name, component_path));
    }
}
