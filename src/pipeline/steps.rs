use std::path::{Path, PathBuf};

use crate::capability::{Capability, CapabilityState};
use crate::config::Config;
use crate::environment::{self, ToolProbe};
use crate::error::{GsiError, Result};
use crate::exec::{shell_quote, Executor};
use crate::files::{Content, FileMode, FileWriter, WriteOutcome};
use crate::log::Logger;
use crate::render::{TemplateData, FAVICON_SVG};

/// How a step ended when it did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Nothing to do: the artifact already exists or a prerequisite is absent.
    Skipped,
    /// A best-effort part of the step failed. The run continues.
    Degraded(String),
}

impl From<WriteOutcome> for StepOutcome {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Skipped => StepOutcome::Skipped,
            WriteOutcome::Created | WriteOutcome::Overwritten | WriteOutcome::Planned => {
                StepOutcome::Completed
            }
        }
    }
}

/// Everything a step may read or touch.
pub struct StepContext<'a> {
    pub config: &'a Config,
    pub caps: &'a mut CapabilityState,
    pub log: &'a Logger,
    pub exec: &'a Executor<'a>,
    pub files: &'a FileWriter<'a>,
    pub probe: &'a dyn ToolProbe,
    pub data: &'a TemplateData,
    /// Set once the CLI scaffolder has run (or would have, under dry-run) in this run,
    /// or when its untouched stubs are found from an earlier run.
    pub cli_scaffolded: bool,
}

impl StepContext<'_> {
    fn path(&self, rel: &str) -> PathBuf {
        self.config.project_dir.join(rel)
    }

    fn dry_run(&self) -> bool {
        self.config.dry_run
    }

    fn write(&self, rel: &str, template: &str, mode: FileMode) -> Result<WriteOutcome> {
        self.files.write(
            self.log,
            &self.path(rel),
            Content::Template {
                name: template,
                data: self.data,
            },
            mode,
        )
    }

    fn render(&self, rel: &str, template: &str) -> Result<StepOutcome> {
        self.write(rel, template, FileMode::Regular).map(StepOutcome::from)
    }

    /// Replace a stub the CLI scaffolder generated. Edited files are left alone.
    fn replace_stub(&self, rel: &str, template: &str) -> Result<StepOutcome> {
        let content = Content::Template {
            name: template,
            data: self.data,
        };
        let outcome = if self.cli_scaffolded {
            self.files.overwrite(self.log, &self.path(rel), content, FileMode::Regular)?
        } else {
            self.files.write(self.log, &self.path(rel), content, FileMode::Regular)?
        };
        Ok(outcome.into())
    }

    fn execute(&self, command: &str, description: &str) -> Result<StepOutcome> {
        self.exec.execute(self.log, command, description)?;
        Ok(StepOutcome::Completed)
    }
}

type Action = fn(&mut StepContext<'_>) -> Result<StepOutcome>;

/// One ordered unit of the pipeline.
pub struct Step {
    /// Human label, used in skip and progress messages.
    pub name: &'static str,
    /// Capability that must be enabled for the step to run.
    pub gate: Option<Capability>,
    pub action: Action,
}

const fn step(name: &'static str, gate: Option<Capability>, action: Action) -> Step {
    Step { name, gate, action }
}

const DOCS: Step = step("docs scaffolding", Some(Capability::Docs), init_docs);

/// The full pipeline, in order.
pub const FULL: &[Step] = &[
    step("BMAD installation", Some(Capability::Bmad), install_bmad),
    step("cobra-cli installation", None, install_cobra_cli),
    step("Go module initialization", None, go_mod_init),
    step("Cobra CLI scaffolding", None, cobra_init),
    step("main.go", None, |ctx| ctx.replace_stub("main.go", "main_go.tmpl")),
    step("root command", None, |ctx| {
        ctx.replace_stub("cmd/root.go", "cmd_root_go.tmpl")
    }),
    step("version command", None, |ctx| {
        ctx.render("cmd/version.go", "cmd_version.go.tmpl")
    }),
    step("serve command", None, |ctx| {
        ctx.render("cmd/serve.go", "cmd_serve.go.tmpl")
    }),
    step("config command scaffolding", Some(Capability::Config), |ctx| {
        ctx.render("cmd/config.go", "cmd_config.go.tmpl")
    }),
    step("config package scaffolding", Some(Capability::Config), |ctx| {
        ctx.render("internal/config/config.go", "config_go.tmpl")
    }),
    step("config init scaffolding", Some(Capability::Config), |ctx| {
        ctx.render("cmd/config_init.go", "cmd_config_init.go.tmpl")
    }),
    step("mockery config", Some(Capability::Mockery), |ctx| {
        ctx.render(".mockery.yml", "mockery_yml.tmpl")
    }),
    step("golangci-lint config", None, |ctx| {
        ctx.render(".golangci.yml", "golangci_yml.tmpl")
    }),
    step("editorconfig", Some(Capability::Editorconfig), |ctx| {
        ctx.render(".editorconfig", "editorconfig.tmpl")
    }),
    step("embedded UI placeholder", None, |ctx| {
        ctx.render("internal/ui/dist/index.html", "index_html.tmpl")
    }),
    step("embedded UI glue", None, |ctx| {
        ctx.render("internal/ui/embed.go", "embed_go.tmpl")
    }),
    step("dependency tidy", None, |ctx| {
        ctx.execute("go mod tidy", "Tidying Go dependencies")
    }),
    step("Makefile", Some(Capability::Makefile), |ctx| {
        ctx.render("Makefile", "makefile.tmpl")
    }),
    step("goreleaser config", Some(Capability::Goreleaser), |ctx| {
        ctx.render(".goreleaser.yml", "goreleaser_yml.tmpl")
    }),
    step("pycodesign config", Some(Capability::Release), |ctx| {
        let rel = format!("{}_pycodesign.ini", ctx.config.project_name);
        ctx.render(&rel, "pycodesign_ini.tmpl")
    }),
    step("Dockerfile", Some(Capability::Docker), |ctx| {
        ctx.render("Dockerfile", "dockerfile.tmpl")
    }),
    step(".dockerignore", Some(Capability::Docker), |ctx| {
        ctx.render(".dockerignore", "dockerignore.tmpl")
    }),
    step("release workflow", Some(Capability::Release), |ctx| {
        ctx.render(".github/workflows/release.yml", "github_release_yml.tmpl")
    }),
    step("CI workflow", Some(Capability::Release), |ctx| {
        ctx.render(".github/workflows/ci.yml", "github_ci_yml.tmpl")
    }),
    step("docs workflow", Some(Capability::Docs), |ctx| {
        ctx.render(".github/workflows/docs.yml", "github_docs_yml.tmpl")
    }),
    DOCS,
    step("UI initialization", Some(Capability::Ui), init_ui),
    step("git initialization", Some(Capability::Git), init_git),
    step("GitHub Pages configuration", Some(Capability::Docs), configure_pages),
];

/// Documentation only.
pub const DOCS_ONLY: &[Step] = &[DOCS];

pub fn plan(only_docs: bool) -> &'static [Step] {
    if only_docs {
        DOCS_ONLY
    } else {
        FULL
    }
}

/// Run `steps` in order. The first error aborts; later steps never run.
///
/// Returns the names of the steps whose action was invoked.
pub fn run_steps(steps: &[Step], ctx: &mut StepContext<'_>) -> Result<Vec<&'static str>> {
    let mut executed = Vec::new();

    for step in steps {
        if let Some(cap) = step.gate {
            if !ctx.caps.is_enabled(cap) {
                ctx.log.info(format!("Skipping {} (--{})", step.name, cap.negated_flag()));
                continue;
            }
        }

        ctx.log.verbose(format!("Step: {}", step.name));
        executed.push(step.name);

        match (step.action)(ctx)? {
            StepOutcome::Completed | StepOutcome::Skipped => {}
            StepOutcome::Degraded(message) => ctx.log.warning(message),
        }
    }

    Ok(executed)
}

// ── Tooling ─────────────────────────────────────────────────────────

fn install_bmad(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if ctx.path("_bmad").exists() {
        ctx.log.info("_bmad/ directory already exists, skipping BMAD installation");
        return Ok(StepOutcome::Skipped);
    }

    if !ctx.probe.has(environment::NPX) {
        ctx.log.warning("Skipping BMAD installation (npx not found)");
        return Ok(StepOutcome::Skipped);
    }

    ctx.execute(
        "npx bmad-method install --directory . --modules bmm --tools claude-code --yes",
        "Installing BMAD method framework",
    )
}

fn install_cobra_cli(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if ctx.probe.has(environment::COBRA_CLI) {
        ctx.log.success("cobra-cli is already installed");
        return Ok(StepOutcome::Skipped);
    }
    ctx.execute(
        "go install github.com/spf13/cobra-cli@latest",
        "Installing cobra-cli",
    )
}

fn go_mod_init(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if ctx.path("go.mod").exists() && !ctx.dry_run() {
        ctx.log.info("go.mod already exists, skipping go mod init");
        return Ok(StepOutcome::Skipped);
    }
    ctx.execute(
        &format!("go mod init {}", ctx.data.module_path),
        "Initializing Go module",
    )
}

/// Comment cobra-cli puts above `rootCmd` in the `cmd/root.go` it generates.
const COBRA_STUB_MARKER: &str =
    "rootCmd represents the base command when called without any subcommands";

fn is_cobra_stub(path: &Path) -> bool {
    std::fs::read_to_string(path).is_ok_and(|content| content.contains(COBRA_STUB_MARKER))
}

fn cobra_init(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if ctx.path("cmd").exists() && !ctx.dry_run() {
        ctx.log.info("cmd/ directory already exists, skipping cobra-cli init");
        // Stubs left by an init that wrote files and then failed.
        if is_cobra_stub(&ctx.path("cmd/root.go")) {
            ctx.log.info("cmd/root.go is still the cobra-cli stub, replacing generated sources");
            ctx.cli_scaffolded = true;
        }
        return Ok(StepOutcome::Skipped);
    }

    let command = format!(
        "cobra-cli init --viper --author {} --config $HOME/.config/{}",
        shell_quote(&ctx.config.author),
        ctx.config.project_name
    );
    ctx.execute(&command, "Creating Cobra CLI application structure")?;
    ctx.cli_scaffolded = true;
    Ok(StepOutcome::Completed)
}

// ── Documentation ───────────────────────────────────────────────────

/// Files `uv init` generates that do not belong in a docs project.
const UV_INIT_NOISE: &[&str] = &[".git", "hello.py", "main.py", "README.md"];

const DOCS_FILES: &[(&str, &str, FileMode)] = &[
    ("docs/mkdocs.yml", "mkdocs_yml.tmpl", FileMode::Regular),
    ("docs/.gitignore", "docs_gitignore.tmpl", FileMode::Regular),
    ("docs/docs/index.md", "docs_index_md.tmpl", FileMode::Regular),
    (
        "docs/docs/getting-started.md",
        "docs_getting_started_md.tmpl",
        FileMode::Regular,
    ),
    (
        "docs/docs/stylesheets/extra.css",
        "docs_extra_css.tmpl",
        FileMode::Regular,
    ),
    (
        "docs/scripts/scrape.sh",
        "docs_scripts_scrape_sh.tmpl",
        FileMode::Executable,
    ),
    (
        "docs/scripts/shots.yaml",
        "docs_scripts_shots_yaml.tmpl",
        FileMode::Regular,
    ),
    (
        "docs/scripts/add_browser_frame.py",
        "docs_scripts_add_browser_frame_py.tmpl",
        FileMode::Executable,
    ),
];

fn init_docs(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if !ctx.probe.has(environment::UV) {
        ctx.log.warning(format!(
            "uv is not installed, skipping docs scaffolding (install: {})",
            environment::install_hint(environment::UV)
        ));
        ctx.caps.disable(Capability::Docs);
        return Ok(StepOutcome::Skipped);
    }

    let pyproject = ctx.path("docs/pyproject.toml");
    if !pyproject.exists() || ctx.dry_run() {
        ctx.execute(
            &format!("uv init --name {}-docs docs", ctx.config.project_name),
            "Initializing uv project in docs/",
        )?;
        strip_uv_scaffolding(ctx);
    } else {
        ctx.log.info("docs/pyproject.toml already exists, skipping uv init");
    }

    add_docs_dependencies(ctx, &pyproject)?;

    for (rel, template, mode) in DOCS_FILES {
        ctx.write(rel, template, *mode)?;
    }
    ctx.files.write(
        ctx.log,
        &ctx.path("docs/docs/assets/favicon.svg"),
        Content::Static(FAVICON_SVG),
        FileMode::Regular,
    )?;

    Ok(StepOutcome::Completed)
}

fn strip_uv_scaffolding(ctx: &StepContext<'_>) {
    if ctx.dry_run() {
        ctx.log.dry_run(format!(
            "Would remove uv init scaffolding ({})",
            UV_INIT_NOISE
                .iter()
                .map(|f| format!("docs/{f}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        return;
    }

    for name in UV_INIT_NOISE {
        let path = ctx.path("docs").join(name);
        if let Err(e) = remove_path(&path) {
            ctx.log.warning(format!("Could not remove {}: {e}", path.display()));
        }
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn add_docs_dependencies(ctx: &StepContext<'_>, pyproject: &Path) -> Result<()> {
    if !ctx.dry_run() {
        if let Ok(content) = std::fs::read_to_string(pyproject) {
            if content.contains("mkdocs-material") {
                ctx.log.info("mkdocs-material already in docs/pyproject.toml, skipping");
                return Ok(());
            }
        }
    }

    ctx.exec.execute(
        ctx.log,
        "cd docs && uv add mkdocs-material 'mkdocs-git-revision-date-localized-plugin>=1.4'",
        "Adding mkdocs-material dependencies",
    )
}

// ── UI ──────────────────────────────────────────────────────────────

const UI_BUILD_SCRIPT: &str = "bun run build.ts";

fn init_ui(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if ctx.path("ui").exists() && !ctx.dry_run() {
        ctx.log.info("ui/ directory already exists, skipping UI initialization");
        return Ok(StepOutcome::Skipped);
    }

    if !ctx.probe.has(environment::BUN) {
        ctx.log.error("bun is required for UI initialization (--ui) but is not installed");
        return Err(GsiError::MissingTool {
            tool: environment::BUN.to_string(),
            purpose: "UI initialization (--ui)".to_string(),
            hint: environment::install_hint(environment::BUN).to_string(),
        });
    }

    ctx.execute(
        "bun init --react=shadcn ui",
        "Initializing React/shadcn/Tailwind UI in ui/",
    )?;

    // The generated build script emits relative asset paths, which break SPA routes on refresh.
    ctx.files.overwrite(
        ctx.log,
        &ctx.path("ui/build.ts"),
        Content::Template {
            name: "build_ts.tmpl",
            data: ctx.data,
        },
        FileMode::Regular,
    )?;

    if ctx.dry_run() {
        ctx.log.dry_run(format!(
            "Would update ui/package.json build script to '{UI_BUILD_SCRIPT}'"
        ));
        return Ok(StepOutcome::Completed);
    }

    match patch_build_script(&ctx.path("ui/package.json")) {
        Ok(()) => {
            ctx.log.success("Updated UI build script to use build.ts");
            Ok(StepOutcome::Completed)
        }
        Err(reason) => Ok(StepOutcome::Degraded(format!(
            "Could not update ui/package.json build script: {reason}"
        ))),
    }
}

/// Point `scripts.build` in a package manifest at `build.ts`.
pub fn patch_build_script(package_json: &Path) -> std::result::Result<(), String> {
    let raw = std::fs::read_to_string(package_json).map_err(|e| e.to_string())?;
    let mut manifest: serde_json::Value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;

    let root = manifest
        .as_object_mut()
        .ok_or_else(|| "package.json is not a JSON object".to_string())?;
    let scripts = root
        .entry("scripts")
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    let scripts = scripts
        .as_object_mut()
        .ok_or_else(|| "\"scripts\" is not a JSON object".to_string())?;
    scripts.insert(
        "build".to_string(),
        serde_json::Value::String(UI_BUILD_SCRIPT.to_string()),
    );

    let mut out = serde_json::to_string_pretty(&manifest).map_err(|e| e.to_string())?;
    out.push('\n');
    std::fs::write(package_json, out).map_err(|e| e.to_string())
}

// ── Version control ─────────────────────────────────────────────────

fn init_git(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    if !ctx.path(".git").exists() || ctx.dry_run() {
        ctx.execute("git init", "Initializing git repository")?;
    } else {
        ctx.log.info(".git directory already exists, skipping git init");
    }

    ctx.render(".gitignore", "gitignore.tmpl")?;

    if ctx.dry_run() {
        ctx.log.dry_run("Would create initial commit");
        return Ok(StepOutcome::Completed);
    }

    if ctx.exec.probe("git rev-parse HEAD") {
        ctx.log.info("Git repository already has commits, skipping initial commit");
        return Ok(StepOutcome::Skipped);
    }

    ctx.execute("git add .", "Staging files for initial commit")?;
    ctx.execute("git commit -m 'initial commit'", "Creating initial commit")
}

fn configure_pages(ctx: &mut StepContext<'_>) -> Result<StepOutcome> {
    let owner = ctx.data.module_owner.as_str();
    let name = ctx.config.project_name.as_str();
    let repo = format!("{owner}/{name}");
    let homepage = format!("https://{owner}.github.io/{name}/");

    if owner.is_empty() {
        ctx.log.info("Module path has no owner segment, skipping GitHub Pages configuration");
        return Ok(StepOutcome::Skipped);
    }

    if !ctx.probe.has(environment::GH) {
        ctx.log.warning("gh CLI not installed, skipping GitHub Pages configuration");
        ctx.log.info(format!(
            "Install gh: {}",
            environment::install_hint(environment::GH)
        ));
        return Ok(StepOutcome::Skipped);
    }

    if !ctx.exec.probe(&format!("gh repo view {repo} --json name")) {
        ctx.log.warning(format!(
            "GitHub repo {repo} not found, skipping Pages configuration"
        ));
        ctx.log.info("After creating the repo, run:");
        ctx.log.plain(format!(
            "  gh api repos/{repo}/pages -X POST --field build_type=workflow"
        ));
        ctx.log.plain(format!("  gh repo edit {repo} --homepage '{homepage}'"));
        return Ok(StepOutcome::Skipped);
    }

    let pages = format!("repos/{repo}/pages");
    let enable = ctx
        .exec
        .execute(
            ctx.log,
            &format!("gh api {pages} -X POST --field build_type=workflow"),
            "Enabling GitHub Pages",
        )
        .or_else(|_| {
            // Pages may already be enabled with another source.
            ctx.exec.execute(
                ctx.log,
                &format!("gh api {pages} -X PUT --field build_type=workflow"),
                "Updating GitHub Pages source",
            )
        });
    if let Err(e) = enable {
        return Ok(StepOutcome::Degraded(format!(
            "Could not configure GitHub Pages for {repo}: {e}"
        )));
    }

    if let Err(e) = ctx.exec.execute(
        ctx.log,
        &format!("gh repo edit {repo} --homepage '{homepage}'"),
        "Setting GitHub repo homepage URL",
    ) {
        return Ok(StepOutcome::Degraded(format!(
            "Could not set homepage for {repo}: {e}"
        )));
    }

    Ok(StepOutcome::Completed)
}
