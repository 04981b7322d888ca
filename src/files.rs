use std::path::Path;

use crate::error::{GsiError, Result};
use crate::log::Logger;
use crate::render::{Renderer, TemplateData};

/// What to write: a named embedded template, or bytes copied verbatim.
#[derive(Clone, Copy)]
pub enum Content<'a> {
    Template {
        name: &'a str,
        data: &'a TemplateData,
    },
    Static(&'a [u8]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Regular,
    /// Directly executable (generated shell and python scripts).
    Executable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// The path already existed and was left untouched.
    Skipped,
    /// Dry-run: nothing was written.
    Planned,
}

/// Writes generated files, never clobbering existing ones unless asked to.
pub struct FileWriter<'a> {
    renderer: &'a Renderer,
    dry_run: bool,
}

impl<'a> FileWriter<'a> {
    pub fn new(renderer: &'a Renderer, dry_run: bool) -> Self {
        Self { renderer, dry_run }
    }

    /// Write `content` to `path` unless something already exists there.
    pub fn write(
        &self,
        log: &Logger,
        path: &Path,
        content: Content<'_>,
        mode: FileMode,
    ) -> Result<WriteOutcome> {
        if path.exists() {
            log.info(format!("{} already exists, skipping", path.display()));
            return Ok(WriteOutcome::Skipped);
        }

        if self.dry_run {
            log.dry_run(format!("Would create {}", path.display()));
            return Ok(WriteOutcome::Planned);
        }

        log.info(format!("Creating {}", path.display()));
        self.put(path, content, mode)?;
        log.success(format!("Created {}", path.display()));
        Ok(WriteOutcome::Created)
    }

    /// Write `content` to `path` even if a file is already there.
    ///
    /// Only for paths an external scaffolding tool has already stubbed out.
    pub fn overwrite(
        &self,
        log: &Logger,
        path: &Path,
        content: Content<'_>,
        mode: FileMode,
    ) -> Result<WriteOutcome> {
        if self.dry_run {
            log.dry_run(format!("Would write {}", path.display()));
            return Ok(WriteOutcome::Planned);
        }

        let existed = path.exists();
        log.info(format!("Writing {}", path.display()));
        self.put(path, content, mode)?;
        log.success(format!("Wrote {}", path.display()));
        Ok(if existed {
            WriteOutcome::Overwritten
        } else {
            WriteOutcome::Created
        })
    }

    fn put(&self, path: &Path, content: Content<'_>, mode: FileMode) -> Result<()> {
        let rendered;
        let bytes: &[u8] = match content {
            Content::Template { name, data } => {
                rendered = self.renderer.render(name, data)?;
                rendered.as_bytes()
            }
            Content::Static(bytes) => bytes,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GsiError::Io {
                context: format!("creating directory for {}", path.display()),
                source: e,
            })?;
        }

        std::fs::write(path, bytes).map_err(|e| GsiError::Io {
            context: format!("writing {}", path.display()),
            source: e,
        })?;

        if mode == FileMode::Executable {
            make_executable(path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        GsiError::Io {
            context: format!("setting permissions on {}", path.display()),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn data() -> TemplateData {
        TemplateData::new("myapp", "github.com/example/myapp")
    }

    fn editorconfig(data: &TemplateData) -> Content<'_> {
        Content::Template {
            name: "editorconfig.tmpl",
            data,
        }
    }

    #[test]
    fn creates_file_and_parents() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, out, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/.editorconfig");
        let data = data();

        let outcome = writer
            .write(&log, &path, editorconfig(&data), FileMode::Regular)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert!(fs::read_to_string(&path).unwrap().contains("root = true"));
        assert!(out.contents().contains("Created"));
    }

    #[test]
    fn existing_file_is_left_alone() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, out, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".editorconfig");
        fs::write(&path, "original").unwrap();
        let data = data();

        let outcome = writer
            .write(&log, &path, editorconfig(&data), FileMode::Regular)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(out.contents().contains("already exists, skipping"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, true);
        let (log, _, err) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/.editorconfig");
        let data = data();

        let outcome = writer
            .write(&log, &path, editorconfig(&data), FileMode::Regular)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Planned);
        assert!(!path.exists());
        assert!(!dir.path().join("sub").exists());
        assert!(err.contents().contains("[DRY-RUN] Would create"));
    }

    #[test]
    fn overwrite_replaces_stub() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, _, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "package main // stub").unwrap();
        let data = data();

        let outcome = writer
            .overwrite(
                &log,
                &path,
                Content::Template {
                    name: "main_go.tmpl",
                    data: &data,
                },
                FileMode::Regular,
            )
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Overwritten);
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("cmd.Execute(version, commit, date)"));
    }

    #[test]
    fn overwrite_honors_dry_run() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, true);
        let (log, _, err) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "stub").unwrap();
        let data = data();

        writer
            .overwrite(
                &log,
                &path,
                Content::Template {
                    name: "main_go.tmpl",
                    data: &data,
                },
                FileMode::Regular,
            )
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "stub");
        assert!(err.contents().contains("[DRY-RUN]"));
    }

    #[test]
    fn static_bytes_are_copied_verbatim() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, _, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favicon.svg");

        writer
            .write(&log, &path, Content::Static(b"<svg/>"), FileMode::Regular)
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
    }

    #[test]
    fn unknown_template_is_reported_and_nothing_written() {
        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, _, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        let data = data();

        let err = writer
            .write(
                &log,
                &path,
                Content::Template {
                    name: "missing.tmpl",
                    data: &data,
                },
                FileMode::Regular,
            )
            .unwrap_err();

        assert!(matches!(err, GsiError::UnknownTemplate { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn executable_mode_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let renderer = Renderer::new().unwrap();
        let writer = FileWriter::new(&renderer, false);
        let (log, _, _) = Logger::captured(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts/scrape.sh");
        let data = data();

        writer
            .write(
                &log,
                &path,
                Content::Template {
                    name: "docs_scripts_scrape_sh.tmpl",
                    data: &data,
                },
                FileMode::Executable,
            )
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
