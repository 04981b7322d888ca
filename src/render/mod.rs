pub mod catalog;
pub mod context;

pub use catalog::{Renderer, FAVICON_SVG, TEMPLATES};
pub use context::{build_context, module_owner, TemplateData};
