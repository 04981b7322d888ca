//! The scaffold run: resolve, validate, then execute the step table in order.

pub mod steps;
pub mod summary;

use std::path::PathBuf;

use crate::capability::{Capability, CapabilityState};
use crate::config::{resolve_project, Config, ResolvedProject};
use crate::environment::{self, PathProbe, ToolProbe};
use crate::error::{GsiError, Result};
use crate::exec::{CommandRunner, Executor, ShellRunner};
use crate::files::FileWriter;
use crate::log::Logger;
use crate::render::{Renderer, TemplateData};

pub use steps::{StepContext, StepOutcome};

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub project_name: String,
    pub project_dir: PathBuf,
    pub module_path: String,
    /// Capability state after every auto-disable.
    pub capabilities: CapabilityState,
    /// Capabilities the environment check switched off.
    pub auto_disabled: Vec<Capability>,
    /// Artifacts found before any step ran.
    pub existing: Vec<String>,
    /// Steps whose action ran, in order.
    pub executed: Vec<&'static str>,
}

/// Drives one scaffold run.
pub struct Scaffolder {
    config: Config,
    log: Logger,
    runner: Box<dyn CommandRunner>,
    probe: Box<dyn ToolProbe>,
    cwd: Option<PathBuf>,
}

impl Scaffolder {
    /// A scaffolder using the real shell, `PATH` and terminal.
    pub fn new(config: Config) -> Self {
        let log = Logger::new(config.verbose);
        Self {
            config,
            log,
            runner: Box::new(ShellRunner),
            probe: Box::new(PathProbe),
            cwd: None,
        }
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_probe(mut self, probe: impl ToolProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Resolve relative project arguments against `cwd` instead of the process working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn run(self) -> Result<RunReport> {
        let Scaffolder {
            mut config,
            log,
            runner,
            probe,
            cwd,
        } = self;

        let cwd = match cwd {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| GsiError::Io {
                context: "reading the current directory".to_string(),
                source: e,
            })?,
        };

        let project = resolve_project(&config.project_name, &cwd)?;
        config.project_name = project.name.clone();
        config.project_dir = project.dir.clone();
        let module_path = config.module_path();
        config.module_path = Some(module_path.clone());

        if config.only_docs && !config.capabilities.is_enabled(Capability::Docs) {
            return Err(GsiError::ConflictingModes);
        }

        display_configuration(&log, &config);

        let mut caps = config.capabilities.clone();
        let auto_disabled = environment::validate(&config, &mut caps, probe.as_ref(), &log)?;

        ensure_project_dir(&project, config.dry_run, &log)?;
        let existing = environment::check_existing_state(&config.project_dir, &log);

        log.plain("");
        log.info("Starting project initialization...");
        log.plain("");

        let renderer = Renderer::new()?;
        let exec = Executor::new(runner.as_ref(), &config.project_dir, config.dry_run);
        let files = FileWriter::new(&renderer, config.dry_run);
        let data = TemplateData::new(&config.project_name, &module_path);

        let executed = {
            let mut ctx = StepContext {
                config: &config,
                caps: &mut caps,
                log: &log,
                exec: &exec,
                files: &files,
                probe: probe.as_ref(),
                data: &data,
                cli_scaffolded: false,
            };
            steps::run_steps(steps::plan(config.only_docs), &mut ctx)?
        };

        summary::print_summary(&log, &config, &caps);

        Ok(RunReport {
            project_name: config.project_name,
            project_dir: config.project_dir,
            module_path,
            capabilities: caps,
            auto_disabled,
            existing,
            executed,
        })
    }
}

fn display_configuration(log: &Logger, config: &Config) {
    log.plain("");
    log.info("Configuration:");
    log.plain(format!("  Project Name:  {}", config.project_name));
    log.plain(format!("  Project Dir:   {}", config.project_dir.display()));
    log.plain(format!("  Module Path:   {}", config.module_path()));
    log.plain(format!("  Author:        {}", config.author));
    log.plain(format!(
        "  Config Dir:    {}",
        config.app_config_dir().display()
    ));
    log.plain(format!("  Only Docs:     {}", config.only_docs));
    log.plain(format!(
        "  Capabilities:  {}",
        config
            .capabilities
            .enabled()
            .map(Capability::name)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    if config.dry_run {
        log.plain(format!(
            "  {}",
            console::style("Mode:          DRY-RUN").yellow().bold()
        ));
    }
    log.plain("");
}

fn ensure_project_dir(project: &ResolvedProject, dry_run: bool, log: &Logger) -> Result<()> {
    let dir = &project.dir;

    if project.in_place {
        log.info("Initializing in current directory");
        log.verbose(format!("Project directory: {}", dir.display()));
        return Ok(());
    }

    if dir.is_dir() {
        log.info(format!(
            "Directory '{}' already exists, continuing with initialization",
            dir.display()
        ));
        return Ok(());
    }

    if dir.exists() {
        return Err(GsiError::Io {
            context: format!("using {} as the project directory", dir.display()),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "a non-directory file is in the way",
            ),
        });
    }

    if dry_run {
        log.dry_run(format!("Would create directory: {}", dir.display()));
        return Ok(());
    }

    log.info(format!("Creating project directory: {}", dir.display()));
    std::fs::create_dir_all(dir).map_err(|e| GsiError::Io {
        context: format!("creating project directory {}", dir.display()),
        source: e,
    })?;
    log.success("Created project directory");
    Ok(())
}
