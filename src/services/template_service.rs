use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::assets::AssetLoader;

/// Error type for template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Service for rendering HTML pages with Tera
pub struct TemplateService {
    loader: Arc<AssetLoader>,
    /// Templates parsed at startup; bypassed when a templates directory is
    /// configured so edits show up without a restart.
    compiled: Tera,
}

impl TemplateService {
    /// Create a new template service, parsing every available template
    pub fn new(loader: Arc<AssetLoader>) -> Result<Self, TemplateError> {
        let compiled = Self::build(&loader)?;
        tracing::info!(
            templates = compiled.get_template_names().count(),
            overrides = loader.has_template_overrides(),
            "Template service initialized"
        );
        Ok(Self { loader, compiled })
    }

    fn build(loader: &AssetLoader) -> Result<Tera, TemplateError> {
        let mut tera = Tera::default();
        let sources = loader
            .list_templates()
            .into_iter()
            .map(|name| {
                let content = loader.read_template_string(&name)?;
                Ok((name, content))
            })
            .collect::<Result<Vec<_>, std::io::Error>>()?;
        tera.add_raw_templates(sources)?;
        Self::register_filters(&mut tera);
        Ok(tera)
    }

    /// Register custom Tera filters
    fn register_filters(tera: &mut Tera) {
        // fixed-point number formatting
        tera.register_filter(
            "fixed",
            |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let v = tera::try_get_value!("fixed", "value", f64, value);
                let places = args.get("places").and_then(|v| v.as_u64()).unwrap_or(2) as usize;
                Ok(tera::Value::String(format!("{v:.places$}")))
            },
        );

        // format_time filter
        tera.register_filter(
            "format_time",
            |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let ts = tera::try_get_value!("format_time", "value", i64, value);
                let fmt = args
                    .get("format")
                    .and_then(|v| v.as_str())
                    .unwrap_or("%Y-%m-%d %H:%M");

                use chrono::{TimeZone, Utc};
                if let Some(dt) = Utc.timestamp_opt(ts, 0).single() {
                    Ok(tera::Value::String(dt.format(fmt).to_string()))
                } else {
                    Ok(tera::Value::String("--".to_string()))
                }
            },
        );
    }

    /// Render a template with the given data
    pub fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, TemplateError> {
        let context = Context::from_serialize(data)?;

        if self.loader.has_template_overrides() {
            let tera = Self::build(&self.loader)?;
            return Self::render_with(&tera, name, &context);
        }
        Self::render_with(&self.compiled, name, &context)
    }

    fn render_with(tera: &Tera, name: &str, context: &Context) -> Result<String, TemplateError> {
        if !tera.get_template_names().any(|t| t == name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        Ok(tera.render(name, context)?)
    }

    /// Render the error page, falling back to a bare page if the template
    /// itself is broken
    pub fn render_error(&self, status: u16, message: &str) -> String {
        let data = serde_json::json!({ "status": status, "message": message });
        match self.render("error.html", &data) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                format!(
                    "<!DOCTYPE html><html><body><h1>Error {status}</h1><p>{}</p></body></html>",
                    html_escape(message)
                )
            }
        }
    }
}

/// Simple HTML escape for error messages
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TemplateService {
        TemplateService::new(Arc::new(AssetLoader::new(None, None))).unwrap()
    }

    #[test]
    fn test_render_error_page_escapes() {
        let html = service().render_error(404, "<no such analysis>");
        assert!(html.contains("404"));
        assert!(html.contains("&lt;no such analysis&gt;"));
        assert!(!html.contains("<no such analysis>"));
    }

    #[test]
    fn test_unknown_template() {
        let err = service().render("missing.html", &json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_fixed_filter() {
        let mut tera = Tera::default();
        tera.add_raw_template("t", "{{ v | fixed }} {{ v | fixed(places=0) }}")
            .unwrap();
        TemplateService::register_filters(&mut tera);
        let mut ctx = Context::new();
        ctx.insert("v", &127.456);
        assert_eq!(tera.render("t", &ctx).unwrap(), "127.46 127");
    }

    #[test]
    fn test_format_time_filter() {
        let mut tera = Tera::default();
        tera.add_raw_template("t", "{{ ts | format_time(format=\"%H:%M\") }}")
            .unwrap();
        TemplateService::register_filters(&mut tera);
        let mut ctx = Context::new();
        ctx.insert("ts", &3_600i64);
        assert_eq!(tera.render("t", &ctx).unwrap(), "01:00");
    }

    #[test]
    fn test_override_directory_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(AssetLoader::new(Some(dir.path().to_path_buf()), None));
        let service = TemplateService::new(loader).unwrap();

        std::fs::write(dir.path().join("home.html"), "v1").unwrap();
        assert_eq!(service.render("home.html", &json!({})).unwrap(), "v1");
        std::fs::write(dir.path().join("home.html"), "v2").unwrap();
        assert_eq!(service.render("home.html", &json!({})).unwrap(), "v2");
    }
}
