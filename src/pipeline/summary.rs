use crate::capability::{Capability, CapabilityState};
use crate::config::Config;
use crate::log::Logger;
use crate::render::module_owner;

/// Follow-up instructions for the generated project.
///
/// Reads the capability state as it stands at the end of the run, so
/// capabilities switched off along the way are not advertised.
pub fn next_steps(config: &Config, caps: &CapabilityState) -> Vec<String> {
    if config.only_docs {
        return vec![
            "Run 'make docs-serve' to start the docs dev server".to_string(),
            "Edit docs in docs/docs/".to_string(),
        ];
    }

    let mut steps = vec![
        "Review the generated code in cmd/".to_string(),
        "Update the project description in cmd/root.go".to_string(),
        "Run 'make build' to build your application".to_string(),
        format!(
            "Run 'make run' or './bin/{} --help' to see available commands",
            config.project_name
        ),
        "Run 'make serve' to start the embedded web UI server".to_string(),
    ];
    if caps.is_enabled(Capability::Docs) {
        steps.push("Run 'make docs-serve' to start the docs dev server".to_string());
    }
    if caps.is_enabled(Capability::Ui) {
        steps.push("Run 'make ui-dev' to start the React dev server".to_string());
    }
    steps.push("Run 'make help' to see all available targets".to_string());
    steps
}

/// Commands for publishing the project on GitHub. The Pages lines only
/// appear while docs are still enabled.
pub fn github_setup(config: &Config, caps: &CapabilityState) -> Vec<String> {
    let module_path = config.module_path();
    let owner = module_owner(&module_path);
    let repo = format!("{owner}/{}", config.project_name);

    let mut lines = vec![format!(
        "Run 'gh repo create {repo} --public --source=.' to create the GitHub repo"
    )];
    if caps.is_enabled(Capability::Docs) {
        lines.push(format!(
            "Run 'gh api repos/{repo}/pages -X POST --field build_type=workflow' to enable GitHub Pages"
        ));
        lines.push(format!(
            "Run 'gh repo edit --homepage \"https://{owner}.github.io/{}/\"' to set the docs URL",
            config.project_name
        ));
    }
    lines
}

pub fn print_summary(log: &Logger, config: &Config, caps: &CapabilityState) {
    log.plain("");
    if config.dry_run {
        log.success("Dry run complete, no changes were made");
    } else {
        log.success("Project initialization complete!");
    }
    log.plain("");

    log.info("Next steps:");
    for (i, step) in next_steps(config, caps).iter().enumerate() {
        log.plain(format!("  {}. {step}", i + 1));
    }

    log.plain("");
    log.info("GitHub Setup:");
    for line in github_setup(config, caps) {
        log.plain(format!("  {line}"));
    }
    log.plain("");
}
