use tera::Context;

/// The fixed variable set every embedded template can reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    pub project_name: String,
    pub project_name_upper: String,
    pub module_path: String,
    /// Second path segment of the module path (`github.com/<owner>/...`), empty if absent.
    pub module_owner: String,
}

impl TemplateData {
    pub fn new(project_name: &str, module_path: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_name_upper: project_name.to_uppercase(),
            module_path: module_path.to_string(),
            module_owner: module_owner(module_path).to_string(),
        }
    }
}

pub fn module_owner(module_path: &str) -> &str {
    module_path.split('/').nth(1).unwrap_or("")
}

/// Build a Tera context from the template data.
pub fn build_context(data: &TemplateData) -> Context {
    let mut context = Context::new();
    context.insert("project_name", &data.project_name);
    context.insert("project_name_upper", &data.project_name_upper);
    context.insert("module_path", &data.module_path);
    context.insert("module_owner", &data.module_owner);
    context
}
