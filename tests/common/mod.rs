#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gsi::capability::Capability;
use gsi::config::Config;
use gsi::environment::ToolProbe;
use gsi::exec::{CommandExit, CommandRunner, OutputMode};
use gsi::log::{Capture, Logger};
use gsi::pipeline::Scaffolder;

/// What `cobra-cli init` leaves in `cmd/root.go`.
pub const COBRA_ROOT_STUB: &str = "package cmd // cobra stub

// rootCmd represents the base command when called without any subcommands
var rootCmd = &cobra.Command{}
";

pub const COBRA_MAIN_STUB: &str = "package main // cobra stub\n";

/// Stands in for go, cobra-cli, git, uv and bun by producing the artifacts they would.
#[derive(Clone, Default)]
pub struct Toolchain {
    calls: Rc<RefCell<Vec<String>>>,
    failing: Rc<RefCell<Vec<String>>>,
}

impl Toolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `pattern` exit with status 1.
    pub fn fail_on(self, pattern: &str) -> Self {
        self.failing.borrow_mut().push(pattern.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn simulate(&self, command: &str, dir: &Path) -> std::io::Result<bool> {
        if let Some(module) = command.strip_prefix("go mod init ") {
            fs::write(dir.join("go.mod"), format!("module {module}\n\ngo 1.23\n"))?;
        } else if command.starts_with("cobra-cli init") {
            fs::create_dir_all(dir.join("cmd"))?;
            fs::write(dir.join("cmd/root.go"), COBRA_ROOT_STUB)?;
            fs::write(dir.join("main.go"), COBRA_MAIN_STUB)?;
        } else if command == "git init" {
            fs::create_dir_all(dir.join(".git"))?;
        } else if command.starts_with("git commit") {
            fs::write(dir.join(".git/COMMITTED"), "")?;
        } else if command == "git rev-parse HEAD" {
            return Ok(dir.join(".git/COMMITTED").exists());
        } else if command.starts_with("uv init") {
            let docs = dir.join("docs");
            fs::create_dir_all(docs.join(".git"))?;
            fs::write(
                docs.join("pyproject.toml"),
                "[project]\nname = \"docs\"\ndependencies = []\n",
            )?;
            for noise in ["hello.py", "main.py", "README.md"] {
                fs::write(docs.join(noise), "")?;
            }
        } else if command.starts_with("cd docs && uv add") {
            let manifest = dir.join("docs/pyproject.toml");
            let mut content = fs::read_to_string(&manifest)?;
            content.push_str("# \"mkdocs-material>=9\"\n");
            fs::write(manifest, content)?;
        } else if command.starts_with("bun init") {
            fs::create_dir_all(dir.join("ui"))?;
            fs::write(
                dir.join("ui/package.json"),
                r#"{"name": "ui", "scripts": {"dev": "bun --hot src/index.ts", "build": "bun build ./src/index.html"}}"#,
            )?;
            fs::write(dir.join("ui/build.ts"), "// generated stub\n")?;
        } else if command.starts_with("gh repo view") {
            return Ok(false);
        }
        Ok(true)
    }
}

impl CommandRunner for Toolchain {
    fn run(&self, command: &str, dir: &Path, _output: OutputMode) -> std::io::Result<CommandExit> {
        self.calls.borrow_mut().push(command.to_string());

        if self.failing.borrow().iter().any(|p| command.contains(p)) {
            return Ok(CommandExit::Failure(Some(1)));
        }

        Ok(if self.simulate(command, dir)? {
            CommandExit::Success
        } else {
            CommandExit::Failure(Some(1))
        })
    }
}

/// A fixed set of tools "on PATH".
#[derive(Clone)]
pub struct Tools(HashSet<String>);

impl Tools {
    /// Everything a default run needs, without the GitHub CLI.
    pub fn all() -> Self {
        Self::only(&["go", "git", "npx", "uv", "bun", "cobra-cli"])
    }

    pub fn only(tools: &[&str]) -> Self {
        Self(tools.iter().map(|t| t.to_string()).collect())
    }

    pub fn without(mut self, tool: &str) -> Self {
        self.0.remove(tool);
        self
    }
}

impl ToolProbe for Tools {
    fn has(&self, tool: &str) -> bool {
        self.0.contains(tool)
    }
}

/// Tools that answer present on their first lookup and absent afterwards,
/// as if uninstalled between the environment check and the step using them.
pub struct Vanishing {
    tools: Tools,
    vanishing: HashSet<String>,
    seen: RefCell<HashSet<String>>,
}

impl Vanishing {
    pub fn new(tools: Tools, vanishing: &[&str]) -> Self {
        Self {
            tools,
            vanishing: vanishing.iter().map(|t| t.to_string()).collect(),
            seen: RefCell::default(),
        }
    }
}

impl ToolProbe for Vanishing {
    fn has(&self, tool: &str) -> bool {
        if !self.vanishing.contains(tool) {
            return self.tools.has(tool);
        }
        self.seen.borrow_mut().insert(tool.to_string())
    }
}

pub struct Harness {
    pub root: tempfile::TempDir,
    pub toolchain: Toolchain,
    pub tools: Tools,
    pub config: Config,
}

pub struct Output {
    pub stdout: Capture,
    pub stderr: Capture,
}

impl Output {
    pub fn all(&self) -> String {
        format!("{}{}", self.stdout.contents(), self.stderr.contents())
    }
}

impl Harness {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::new(root.path().join("myapp").to_string_lossy().into_owned());
        config.author = "Jane Doe jane@example.com".to_string();
        config.module_path = Some("github.com/acme/myapp".to_string());
        Self {
            root,
            toolchain: Toolchain::new(),
            tools: Tools::all(),
            config,
        }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.root.path().join("myapp")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.project_dir().join(rel)
    }

    pub fn enable(mut self, cap: Capability) -> Self {
        self.config.capabilities.set(cap, true);
        self
    }

    pub fn disable(mut self, cap: Capability) -> Self {
        self.config.capabilities.disable(cap);
        self
    }

    pub fn run(&self) -> (gsi::error::Result<gsi::pipeline::RunReport>, Output) {
        self.run_with_tools(self.tools.clone())
    }

    pub fn run_with_tools(
        &self,
        tools: impl ToolProbe + 'static,
    ) -> (gsi::error::Result<gsi::pipeline::RunReport>, Output) {
        self.run_in(self.root.path(), tools)
    }

    /// Run with `cwd` as the working directory the project argument resolves against.
    pub fn run_in(
        &self,
        cwd: &Path,
        tools: impl ToolProbe + 'static,
    ) -> (gsi::error::Result<gsi::pipeline::RunReport>, Output) {
        let (log, stdout, stderr) = Logger::captured(true);
        let result = Scaffolder::new(self.config.clone())
            .with_logger(log)
            .with_runner(self.toolchain.clone())
            .with_probe(tools)
            .with_cwd(cwd)
            .run();
        (result, Output { stdout, stderr })
    }
}

/// Every file under `dir` with its contents, for before/after comparisons.
pub fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
