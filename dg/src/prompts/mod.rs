//! Prompt Template System
//!
//! The generation prompt is a fixed template embedded in the binary and
//! rendered with Handlebars. Values are substituted verbatim (no HTML escaping)
//! so the formatted schema reaches the model exactly as produced.

pub mod embedded;

use handlebars::{Handlebars, RenderError, RenderErrorReason};
use serde::Serialize;
use tracing::debug;

/// Values substituted into the sample prompt
#[derive(Debug, Clone, Serialize)]
pub struct SamplePromptContext<'a> {
    pub record_count: u32,
    pub schema: &'a str,
}

/// Render the sample-generation prompt
pub fn render_sample_prompt(context: &SamplePromptContext<'_>) -> Result<String, RenderError> {
    debug!(record_count = %context.record_count, schema_len = context.schema.len(), "render_sample_prompt: called");
    render("sample", context)
}

/// Render an embedded template by name
fn render<T: Serialize>(name: &str, context: &T) -> Result<String, RenderError> {
    debug!(%name, "render: called");
    let template =
        embedded::get_embedded(name).ok_or_else(|| RenderErrorReason::TemplateNotFound(name.to_string()))?;

    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(true);
    hbs.register_escape_fn(handlebars::no_escape);
    hbs.register_template_string(name, template)?;
    hbs.render(name, context)
}
