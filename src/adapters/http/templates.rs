use std::sync::Arc;
use tera::Tera;

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Loads every `*.html.tera` file below `dir`
  pub fn new(dir: &str) -> Result<Self, tera::Error> {
    let pattern = format!("{}/**/*.html.tera", dir.trim_end_matches('/'));
    let mut tera = Tera::new(&pattern)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    tracing::debug!(
      "Loaded {} templates from {}",
      tera.get_template_names().count(),
      dir
    );

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

#[cfg(test)]
pub(crate) fn test_engine() -> TemplateEngine {
  TemplateEngine::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap()
}
