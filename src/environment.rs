use std::path::Path;

use crate::capability::{Capability, CapabilityState};
use crate::config::Config;
use crate::error::{GsiError, Result};
use crate::log::Logger;

pub const GO: &str = "go";
pub const GIT: &str = "git";
pub const NPX: &str = "npx";
pub const UV: &str = "uv";
pub const BUN: &str = "bun";
pub const COBRA_CLI: &str = "cobra-cli";
pub const GH: &str = "gh";

/// Tools whose absence aborts a full run.
pub const REQUIRED: &[&str] = &[GO];

pub fn install_hint(tool: &str) -> &'static str {
    match tool {
        GO => "https://go.dev/doc/install",
        GIT => "https://git-scm.com/downloads",
        NPX => "https://nodejs.org/",
        UV => "https://docs.astral.sh/uv/",
        BUN => "https://bun.sh",
        GH => "https://cli.github.com/",
        _ => "see the tool's documentation",
    }
}

/// Answers "is this executable on PATH?".
pub trait ToolProbe {
    fn has(&self, tool: &str) -> bool;
}

/// Looks tools up on the real `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathProbe;

impl ToolProbe for PathProbe {
    fn has(&self, tool: &str) -> bool {
        which::which(tool).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WhenMissing {
    Disable,
    /// The capability's own step re-checks and aborts if the tool is still missing.
    Warn,
}

const SOFT_DEPENDENCIES: &[(Capability, &str, WhenMissing)] = &[
    (Capability::Git, GIT, WhenMissing::Disable),
    (Capability::Bmad, NPX, WhenMissing::Disable),
    (Capability::Docs, UV, WhenMissing::Disable),
    (Capability::Ui, BUN, WhenMissing::Warn),
];

/// Check external tools before any step runs.
///
/// Hard-required tools are collected and reported together. Enabled
/// capabilities whose tool is missing are switched off in `caps`; the
/// returned list names them.
pub fn validate(
    config: &Config,
    caps: &mut CapabilityState,
    probe: &dyn ToolProbe,
    log: &Logger,
) -> Result<Vec<Capability>> {
    if config.only_docs {
        log.info("Validating environment (docs-only mode)...");
        if !probe.has(UV) {
            log.error("uv is required for docs scaffolding but is not installed");
            return Err(GsiError::MissingTool {
                tool: UV.to_string(),
                purpose: "docs scaffolding".to_string(),
                hint: install_hint(UV).to_string(),
            });
        }
        log.success("Environment validation complete");
        return Ok(Vec::new());
    }

    log.info("Validating environment...");

    let mut missing = Vec::new();
    for tool in REQUIRED {
        if probe.has(tool) {
            log.verbose(format!("Found {tool}"));
        } else {
            log.error(format!("{tool} is not installed or not in PATH"));
            missing.push(tool.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(GsiError::MissingTools { tools: missing });
    }

    let mut disabled = Vec::new();
    for &(cap, tool, policy) in SOFT_DEPENDENCIES {
        if !caps.is_enabled(cap) {
            continue;
        }
        if probe.has(tool) {
            log.verbose(format!("Found {tool}"));
            continue;
        }
        match policy {
            WhenMissing::Disable => {
                log.warning(format!(
                    "{tool} is not installed, disabling '{cap}' (install: {})",
                    install_hint(tool)
                ));
                caps.disable(cap);
                disabled.push(cap);
            }
            WhenMissing::Warn => {
                log.warning(format!(
                    "{tool} is not installed; '{cap}' will fail unless it is installed (install: {})",
                    install_hint(tool)
                ));
            }
        }
    }

    log.success("Environment validation complete");
    Ok(disabled)
}

/// Artifacts a previous run (or the user) may already have produced.
const EXISTING_MARKERS: &[(&str, bool)] = &[
    ("go.mod", false),
    (".git", true),
    ("cmd", true),
    ("_bmad", true),
    ("ui", true),
    ("docs", true),
];

/// Report which known artifacts already exist under `dir`. Informational only.
pub fn check_existing_state(dir: &Path, log: &Logger) -> Vec<String> {
    log.info("Checking existing state...");

    let existing: Vec<String> = EXISTING_MARKERS
        .iter()
        .filter(|(name, is_dir)| {
            let path = dir.join(name);
            if *is_dir {
                path.is_dir()
            } else {
                path.is_file()
            }
        })
        .map(|(name, is_dir)| {
            if *is_dir {
                format!("{name}/")
            } else {
                name.to_string()
            }
        })
        .collect();

    if existing.is_empty() {
        log.success("No existing project files found");
    } else {
        log.info("Found existing project files (will skip where appropriate):");
        for item in &existing {
            log.verbose(format!("  - {item}"));
        }
    }

    existing
}
