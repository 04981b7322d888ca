#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GsiError {
    #[error("Project name is required")]
    #[diagnostic(help("Pass a project name, or '.' to initialize the current directory"))]
    MissingProjectName,

    #[error("Invalid project name '{name}'")]
    #[diagnostic(help(
        "Project names may only contain letters, numbers, hyphens, underscores, dots, and slashes"
    ))]
    InvalidProjectName { name: String },

    #[error("--only-docs and --no-docs are mutually exclusive")]
    #[diagnostic(help("Drop one of the two flags"))]
    ConflictingModes,

    #[error("Missing required commands: {}", .tools.join(", "))]
    #[diagnostic(help("Install the missing tools and make sure they are on your PATH"))]
    MissingTools { tools: Vec<String> },

    #[error("{tool} is required for {purpose} but is not installed")]
    #[diagnostic(help("Install {tool}: {hint}"))]
    MissingTool {
        tool: String,
        purpose: String,
        hint: String,
    },

    #[error("Unknown capability '{name}'")]
    #[diagnostic(help("Known capabilities: {known}"))]
    UnknownCapability { name: String, known: String },

    #[error("Unknown template '{name}'")]
    UnknownTemplate { name: String },

    #[error("Failed to render template '{name}'")]
    #[diagnostic(help("Check the Tera syntax of the embedded template"))]
    RenderError {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    #[diagnostic(help("Check the TOML syntax of your gsi config file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{description} failed{}", .code.map(|c| format!(" (exit status {c})")).unwrap_or_default())]
    CommandFailed {
        description: String,
        code: Option<i32>,
    },

    #[error("Could not start command for: {description}")]
    CommandSpawn {
        description: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GsiError>;
