//! # Webbuilder CLI
//!
//! Command-line front end for Webbuilder projects.
//!
//! ## Usage
//!
//! ```bash
//! webbuilder new "My Site" --template landing
//! webbuilder add "My Site" heading button
//! webbuilder layers "My Site"
//! webbuilder export "My Site" --output site.html
//! ```
//!
//! Projects live as JSON files in the data directory (`--data-dir` or
//! `WEBBUILDER_DATA_DIR`).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use webbuilder_core::{
    persist, EditorSession, Project, ProjectStore, SessionConfig, StylePreset, Theme,
};
use webbuilder_export::{ExportConfig, HtmlExporter};

/// Command-line arguments for webbuilder.
#[derive(Debug, Clone, Parser)]
#[command(name = "webbuilder")]
#[command(about = "Build static web pages from components and templates")]
#[command(version)]
pub struct Cli {
    /// Directory holding project files
    #[arg(long, global = true, env = "WEBBUILDER_DATA_DIR", default_value = ".webbuilder")]
    pub data_dir: PathBuf,

    /// Palette for new components and templates (dark or light)
    #[arg(long, global = true, env = "WEBBUILDER_THEME", default_value = "dark", value_parser = parse_theme)]
    pub theme: Theme,

    /// Maximum undo depth for editing sessions
    #[arg(long, global = true, env = "WEBBUILDER_HISTORY_LIMIT", default_value = "50")]
    pub history_limit: usize,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a project, optionally from a template
    New {
        /// Project name
        name: String,
        /// Project description
        #[arg(long, default_value = "")]
        description: String,
        /// Template to start from
        #[arg(long)]
        template: Option<String>,
    },
    /// Append components to a project
    Add {
        /// Project id or name
        project: String,
        /// Component types, in order
        #[arg(required = true)]
        components: Vec<String>,
    },
    /// List a project's elements in render order
    Layers {
        /// Project id or name
        project: String,
    },
    /// Export a project as a standalone HTML page
    Export {
        /// Project id or name
        project: String,
        /// Output file; stdout if omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Page title; defaults to the project name
        #[arg(long)]
        title: Option<String>,
        /// Omit the scroll reveal script
        #[arg(long)]
        no_animation_script: bool,
        /// Style preset (modern, midnight, playful, professional)
        #[arg(long, value_parser = parse_preset)]
        preset: Option<StylePreset>,
    },
    /// List available components, sections and templates
    Templates,
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),
}

/// Project management commands.
#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    /// List all projects
    List,
    /// Create an empty project
    Create {
        /// Project name
        name: String,
        /// Project description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a project
    Delete {
        /// Project id or name
        project: String,
    },
    /// Create a project from a saved project file
    Import {
        /// Path to the project JSON
        file: PathBuf,
        /// Name for the new project
        #[arg(long)]
        name: String,
    },
    /// Write a project's document as a project file
    Save {
        /// Project id or name
        project: String,
        /// Output file; stdout if omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    match value.to_ascii_lowercase().as_str() {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        other => Err(format!("unknown theme '{other}' (expected dark or light)")),
    }
}

fn parse_preset(value: &str) -> Result<StylePreset, String> {
    value.parse()
}

impl Cli {
    /// Session settings derived from the flags.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_history_limit(self.history_limit)
            .with_theme(self.theme)
    }
}

/// Execute a parsed command, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns an error if the data directory is unusable, a project or
/// template cannot be found, or export fails.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = ProjectStore::with_data_dir(&cli.data_dir)
        .with_context(|| format!("Failed to open data directory {}", cli.data_dir.display()))?;
    let loaded = store
        .load_all_from_disk()
        .context("Failed to read projects")?;
    tracing::debug!("Loaded {} projects from {}", loaded.len(), cli.data_dir.display());

    match &cli.command {
        Command::New {
            name,
            description,
            template,
        } => {
            let id = store.create_project(name.as_str(), description.as_str());
            if let Some(template) = template {
                let mut session = EditorSession::with_config(cli.session_config());
                if !session.load_named_template(template) {
                    store.delete_project(&id)?;
                    bail!("Unknown template: {template}");
                }
                store.save_elements(&id, session.elements())?;
            }
            writeln!(out, "{id}")?;
        }
        Command::Add {
            project,
            components,
        } => {
            let project = resolve(&store, project)?;
            let mut session = EditorSession::from_elements(project.elements, cli.session_config());
            let mut created = Vec::with_capacity(components.len());
            for kind in components {
                let id = session
                    .create(kind)
                    .with_context(|| format!("Unknown component: {kind}"))?;
                created.push(id);
            }
            store.save_elements(&project.id, session.elements())?;
            for id in created {
                writeln!(out, "{id}")?;
            }
        }
        Command::Layers { project } => {
            let project = resolve(&store, project)?;
            let session = EditorSession::from_elements(project.elements, cli.session_config());
            for layer in session.layers() {
                writeln!(out, "{:>3}  {}  {:<12} {}", layer.index, layer.icon, layer.label, layer.id)?;
            }
        }
        Command::Export {
            project,
            output,
            title,
            no_animation_script,
            preset,
        } => {
            let project = resolve(&store, project)?;
            let exporter = HtmlExporter::new(ExportConfig {
                title: title.clone().unwrap_or_else(|| project.name.clone()),
                animation_script: !no_animation_script,
                preset: *preset,
                ..ExportConfig::default()
            });
            let html = exporter
                .export(&project.elements)
                .with_context(|| format!("Failed to export {}", project.name))?;
            write_output(output.as_ref(), &html, out)?;
        }
        Command::Templates => {
            let session = EditorSession::with_config(cli.session_config());
            writeln!(out, "Components:")?;
            for kind in session.catalog().component_kinds() {
                writeln!(out, "  {kind}")?;
            }
            writeln!(out, "Sections:")?;
            for kind in session.catalog().section_kinds() {
                writeln!(out, "  {kind}")?;
            }
            writeln!(out, "Templates:")?;
            for name in session.catalog().template_names() {
                writeln!(out, "  {name}")?;
            }
        }
        Command::Projects(command) => run_project_command(&store, command, out)?,
    }
    Ok(())
}

fn run_project_command(
    store: &ProjectStore,
    command: &ProjectCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        ProjectCommand::List => {
            for project in store.list() {
                writeln!(
                    out,
                    "{}  {}  ({} elements)",
                    project.id,
                    project.name,
                    project.elements.len()
                )?;
            }
        }
        ProjectCommand::Create { name, description } => {
            let id = store.create_project(name.as_str(), description.as_str());
            writeln!(out, "{id}")?;
        }
        ProjectCommand::Delete { project } => {
            let project = resolve(store, project)?;
            store.delete_project(&project.id)?;
            writeln!(out, "Deleted {}", project.name)?;
        }
        ProjectCommand::Import { file, name } => {
            let elements = persist::read_file(file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let id = store.create_project(name.as_str(), "");
            store.save_elements(&id, &elements)?;
            writeln!(out, "{id}")?;
        }
        ProjectCommand::Save { project, output } => {
            let project = resolve(store, project)?;
            match output {
                Some(path) => {
                    persist::write_file(path, &project.elements)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Saved {} to {}", project.name, path.display());
                }
                None => out.write_all(persist::save(&project.elements)?.as_bytes())?,
            }
        }
    }
    Ok(())
}

/// Find a project by id, falling back to an exact name match.
fn resolve(store: &ProjectStore, key: &str) -> anyhow::Result<Project> {
    if let Some(project) = store.get(key) {
        return Ok(project);
    }
    let mut matches = store.list().into_iter().filter(|p| p.name == key);
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project),
        (Some(_), Some(_)) => bail!("Project name '{key}' is ambiguous; use the id"),
        (None, _) => bail!("Project not found: {key}"),
    }
}

fn write_output(path: Option<&PathBuf>, contents: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", contents.len(), path.display());
        }
        None => out.write_all(contents.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["webbuilder", "--data-dir", "/tmp/x", "templates"])
            .expect("parse");
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Command::Templates));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "webbuilder",
            "layers",
            "site",
            "--theme",
            "light",
            "--history-limit",
            "7",
        ])
        .expect("parse");
        assert_eq!(cli.theme, Theme::Light);
        let config = cli.session_config();
        assert_eq!(config.history_limit, 7);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_parse_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["webbuilder", "--theme", "sepia", "templates"]).is_err());
    }

    #[test]
    fn test_parse_export_preset() {
        let cli = Cli::try_parse_from(["webbuilder", "export", "site", "--preset", "midnight"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Export { preset: Some(StylePreset::Midnight), .. }
        ));
        assert!(Cli::try_parse_from(["webbuilder", "export", "site", "--preset", "neon"]).is_err());
    }

    #[test]
    fn test_add_requires_components() {
        assert!(Cli::try_parse_from(["webbuilder", "add", "site"]).is_err());
    }

    #[test]
    fn test_parse_project_subcommands() {
        let cli = Cli::try_parse_from(["webbuilder", "projects", "delete", "site"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Projects(ProjectCommand::Delete { ref project }) if project == "site"
        ));
    }
}
