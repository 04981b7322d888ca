use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches, Parser};

use gsi::capability::Capability;
use gsi::config::{Config, UserConfig};
use gsi::error::{GsiError, Result};

#[derive(Parser)]
#[command(
    name = "gsi",
    about = "Initialize a Go project with best practices and tooling",
    long_about = "gsi scaffolds a new Go project with cobra, viper, mkdocs-material \
documentation, an embedded web UI, mockery, editorconfig, and an optional \
React/shadcn/Tailwind frontend.\n\n\
Each capability can be toggled with --<name> / --no-<name> flags. \
Most capabilities are on by default; ui is off.",
    after_help = "Examples:\n  \
gsi my-awesome-app\n  \
gsi --author \"Jane Doe jane@example.com\" my-app\n  \
gsi --module github.com/myorg/myapp --dry-run my-app\n  \
gsi --no-bmad --no-git my-app\n  \
gsi --only-docs my-app\n  \
gsi --ui my-app\n  \
gsi .    # Initialize in current directory",
    version
)]
pub struct Cli {
    /// Project name or path ('.' for the current directory)
    pub project: Option<String>,

    /// Author name and email
    #[arg(short, long)]
    pub author: Option<String>,

    /// Go module path (default: <module prefix>/<project>)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Show what would be done without executing
    #[arg(short, long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only add docs scaffolding (skip everything else)
    #[arg(long)]
    pub only_docs: bool,

    #[command(flatten)]
    pub capabilities: CapabilityFlags,
}

/// `--<name>` and hidden `--no-<name>` for every capability.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapabilityFlags {
    pub enable: Vec<Capability>,
    pub disable: Vec<Capability>,
}

impl CapabilityFlags {
    /// Explicit flag overrides. A `--no-<name>` wins over `--<name>`.
    pub fn overrides(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        let enable = self
            .enable
            .iter()
            .filter(|cap| !self.disable.contains(cap))
            .map(|&cap| (cap, true));
        let disable = self.disable.iter().map(|&cap| (cap, false));
        enable.chain(disable)
    }
}

impl FromArgMatches for CapabilityFlags {
    fn from_arg_matches(matches: &ArgMatches) -> std::result::Result<Self, clap::Error> {
        let mut flags = Self::default();
        flags.update_from_arg_matches(matches)?;
        Ok(flags)
    }

    fn update_from_arg_matches(
        &mut self,
        matches: &ArgMatches,
    ) -> std::result::Result<(), clap::Error> {
        for cap in Capability::ALL {
            if matches.get_flag(cap.name()) && !self.enable.contains(&cap) {
                self.enable.push(cap);
            }
            if matches.get_flag(cap.negated_flag()) && !self.disable.contains(&cap) {
                self.disable.push(cap);
            }
        }
        Ok(())
    }
}

impl Args for CapabilityFlags {
    fn augment_args(cmd: Command) -> Command {
        Capability::ALL.iter().fold(cmd, |cmd, cap| {
            cmd.arg(
                Arg::new(cap.name())
                    .long(cap.name())
                    .action(ArgAction::SetTrue)
                    .help(cap.description())
                    .help_heading("Capabilities"),
            )
            .arg(
                Arg::new(cap.negated_flag())
                    .long(cap.negated_flag())
                    .action(ArgAction::SetTrue)
                    .help(format!("Disable: {}", cap.description()))
                    .hide(true),
            )
        })
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

impl Cli {
    /// Merge flags over the user config file and fallbacks.
    ///
    /// Capability precedence: `--no-x`, then `--x`, then the config file, then
    /// the built-in default.
    pub fn into_config(
        self,
        user: UserConfig,
        fallback_author: impl FnOnce() -> Option<String>,
    ) -> Result<Config> {
        let project = self.project.ok_or(GsiError::MissingProjectName)?;
        let mut config = Config::new(project);

        config.capabilities.apply(user.capability_overrides()?);
        config.capabilities.apply(self.capabilities.overrides());

        config.author = self
            .author
            .or(user.author)
            .or_else(fallback_author)
            .unwrap_or_default();
        config.module_path = self.module.filter(|m| !m.is_empty());
        if let Some(prefix) = user.module_prefix.filter(|p| !p.is_empty()) {
            config.module_prefix = prefix;
        }
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.only_docs = self.only_docs;

        Ok(config)
    }
}
