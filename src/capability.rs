use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GsiError;

/// A named, independently toggleable unit of scaffolding behavior.
///
/// The set is closed: adding a variant forces every `match` below to be
/// updated, and the CLI registers `--<name>` / `--no-<name>` for each entry
/// in [`Capability::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Bmad,
    Config,
    Git,
    Docs,
    Ui,
    Goreleaser,
    Docker,
    Release,
    Mockery,
    Editorconfig,
    Makefile,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Bmad,
        Capability::Config,
        Capability::Git,
        Capability::Docs,
        Capability::Ui,
        Capability::Goreleaser,
        Capability::Docker,
        Capability::Release,
        Capability::Mockery,
        Capability::Editorconfig,
        Capability::Makefile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::Bmad => "bmad",
            Capability::Config => "config",
            Capability::Git => "git",
            Capability::Docs => "docs",
            Capability::Ui => "ui",
            Capability::Goreleaser => "goreleaser",
            Capability::Docker => "docker",
            Capability::Release => "release",
            Capability::Mockery => "mockery",
            Capability::Editorconfig => "editorconfig",
            Capability::Makefile => "makefile",
        }
    }

    /// Name of the flag that turns this capability off (`--no-<name>`).
    pub fn negated_flag(self) -> &'static str {
        match self {
            Capability::Bmad => "no-bmad",
            Capability::Config => "no-config",
            Capability::Git => "no-git",
            Capability::Docs => "no-docs",
            Capability::Ui => "no-ui",
            Capability::Goreleaser => "no-goreleaser",
            Capability::Docker => "no-docker",
            Capability::Release => "no-release",
            Capability::Mockery => "no-mockery",
            Capability::Editorconfig => "no-editorconfig",
            Capability::Makefile => "no-makefile",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Capability::Bmad => "BMAD method framework installation",
            Capability::Config => "Viper config management scaffolding",
            Capability::Git => "Git initialization and initial commit",
            Capability::Docs => "mkdocs-material documentation scaffolding",
            Capability::Ui => "React/shadcn/Tailwind UI in ui/ subdirectory",
            Capability::Goreleaser => "GoReleaser configuration",
            Capability::Docker => "Dockerfile and .dockerignore",
            Capability::Release => "GitHub Actions release workflow",
            Capability::Mockery => "Mockery configuration",
            Capability::Editorconfig => "EditorConfig file",
            Capability::Makefile => "Makefile with common targets",
        }
    }

    pub fn default_enabled(self) -> bool {
        !matches!(self, Capability::Ui)
    }

    fn known_names() -> String {
        Capability::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = GsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| GsiError::UnknownCapability {
                name: s.to_string(),
                known: Capability::known_names(),
            })
    }
}

/// Live enabled/disabled map for one run.
///
/// Seeded from the compiled-in defaults, narrowed by user overrides and by
/// the environment validator, and read by every step and by the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityState {
    enabled: BTreeMap<Capability, bool>,
}

impl CapabilityState {
    /// The closed capability set with its compiled-in defaults.
    pub fn defaults() -> Self {
        Self {
            enabled: Capability::ALL
                .into_iter()
                .map(|c| (c, c.default_enabled()))
                .collect(),
        }
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enabled.get(&cap).copied().unwrap_or(false)
    }

    /// String-keyed lookup for the configuration boundary. Unknown names are disabled.
    pub fn is_enabled_name(&self, name: &str) -> bool {
        name.parse::<Capability>()
            .map(|cap| self.is_enabled(cap))
            .unwrap_or(false)
    }

    pub fn set(&mut self, cap: Capability, enabled: bool) {
        self.enabled.insert(cap, enabled);
    }

    pub fn disable(&mut self, cap: Capability) {
        self.set(cap, false);
    }

    /// String-keyed disable. Unknown names are ignored.
    pub fn disable_name(&mut self, name: &str) {
        if let Ok(cap) = name.parse::<Capability>() {
            self.disable(cap);
        }
    }

    /// Apply explicit overrides on top of the current state.
    pub fn apply<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (Capability, bool)>,
    {
        for (cap, enabled) in overrides {
            self.set(cap, enabled);
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = Capability> + '_ {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(cap, _)| *cap)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.enabled.iter().map(|(cap, on)| (*cap, *on))
    }
}

impl Default for CapabilityState {
    fn default() -> Self {
        Self::defaults()
    }
}
