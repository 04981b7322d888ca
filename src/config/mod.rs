pub mod user;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::capability::CapabilityState;
use crate::error::{GsiError, Result};

pub use user::{default_author, load_user_config, UserConfig};

/// Module path prefix used when neither `--module` nor a config file prefix is given.
pub const DEFAULT_MODULE_PREFIX: &str = "github.com/joescharf";

/// Project argument selecting the working directory itself.
pub const CURRENT_DIR: &str = ".";

/// Everything one scaffold run needs, built from CLI input before any I/O.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw project argument until resolution, then the directory's base name.
    pub project_name: String,
    /// Absolute project directory. Empty until resolved.
    pub project_dir: PathBuf,
    pub author: String,
    /// Explicit module path; derived from `module_prefix` and the project name when unset.
    pub module_path: Option<String>,
    pub module_prefix: String,
    pub dry_run: bool,
    pub verbose: bool,
    pub only_docs: bool,
    pub capabilities: CapabilityState,
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            project_dir: PathBuf::new(),
            author: String::new(),
            module_path: None,
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
            dry_run: false,
            verbose: false,
            only_docs: false,
            capabilities: CapabilityState::defaults(),
        }
    }

    /// The module path in effect: explicit, or `<prefix>/<project name>`.
    pub fn module_path(&self) -> String {
        match &self.module_path {
            Some(path) if !path.is_empty() => path.clone(),
            _ => format!(
                "{}/{}",
                self.module_prefix.trim_end_matches('/'),
                self.project_name
            ),
        }
    }

    /// `~/.config/<project>` as the generated CLI will use it.
    pub fn app_config_dir(&self) -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".config")
            .join(&self.project_name)
    }
}

/// A project argument resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    pub name: String,
    pub dir: PathBuf,
    /// The project is the working directory itself (`.`).
    pub in_place: bool,
}

fn valid_project_name() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_/.\-]+$").expect("project name pattern is valid")
    })
}

/// Interpret the project argument. Pure: nothing on disk is touched.
pub fn resolve_project(arg: &str, cwd: &Path) -> Result<ResolvedProject> {
    if arg.is_empty() {
        return Err(GsiError::MissingProjectName);
    }

    if arg == CURRENT_DIR || arg == "./" {
        let name = base_name(cwd, arg)?;
        if !valid_project_name().is_match(&name) {
            return Err(GsiError::InvalidProjectName { name });
        }
        return Ok(ResolvedProject {
            name,
            dir: cwd.to_path_buf(),
            in_place: true,
        });
    }

    if !valid_project_name().is_match(arg) {
        return Err(GsiError::InvalidProjectName {
            name: arg.to_string(),
        });
    }

    let given = Path::new(arg);
    let dir = if given.is_absolute() {
        given.to_path_buf()
    } else {
        cwd.join(given)
    };

    Ok(ResolvedProject {
        name: base_name(&dir, arg)?,
        dir,
        in_place: false,
    })
}

fn base_name(dir: &Path, arg: &str) -> Result<String> {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| n != "." && n != "..")
        .ok_or_else(|| GsiError::InvalidProjectName {
            name: arg.to_string(),
        })
}
