use tera::Tera;

use crate::error::{GsiError, Result};
use crate::render::context::{build_context, TemplateData};

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

/// Every template the scaffolder can render, keyed by name.
pub const TEMPLATES: &[(&str, &str)] = embedded![
    "main_go.tmpl",
    "cmd_root_go.tmpl",
    "cmd_version.go.tmpl",
    "cmd_serve.go.tmpl",
    "cmd_config.go.tmpl",
    "cmd_config_init.go.tmpl",
    "config_go.tmpl",
    "mockery_yml.tmpl",
    "golangci_yml.tmpl",
    "editorconfig.tmpl",
    "index_html.tmpl",
    "embed_go.tmpl",
    "makefile.tmpl",
    "goreleaser_yml.tmpl",
    "pycodesign_ini.tmpl",
    "dockerfile.tmpl",
    "dockerignore.tmpl",
    "github_release_yml.tmpl",
    "github_ci_yml.tmpl",
    "github_docs_yml.tmpl",
    "mkdocs_yml.tmpl",
    "docs_gitignore.tmpl",
    "docs_index_md.tmpl",
    "docs_getting_started_md.tmpl",
    "docs_extra_css.tmpl",
    "docs_scripts_scrape_sh.tmpl",
    "docs_scripts_shots_yaml.tmpl",
    "docs_scripts_add_browser_frame_py.tmpl",
    "build_ts.tmpl",
    "gitignore.tmpl",
];

/// Static assets copied without rendering.
pub const FAVICON_SVG: &[u8] = include_bytes!("../../assets/favicon.svg");

/// Renders the embedded template set.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| GsiError::RenderError {
                name: "embedded templates".to_string(),
                source: e,
            })?;
        Ok(Self { tera })
    }

    pub fn contains(&self, name: &str) -> bool {
        TEMPLATES.iter().any(|(n, _)| *n == name)
    }

    pub fn render(&self, name: &str, data: &TemplateData) -> Result<String> {
        if !self.contains(name) {
            return Err(GsiError::UnknownTemplate {
                name: name.to_string(),
            });
        }

        self.tera
            .render(name, &build_context(data))
            .map_err(|e| GsiError::RenderError {
                name: name.to_string(),
                source: e,
            })
    }
}
