use crate::error::Result;
use handlebars::Handlebars;
use serde::Serialize;

/// Renders listing markup from a handlebars template
///
/// Values are HTML-escaped. Missing fields render as empty text.
pub struct ViewRenderer {
    registry: Handlebars<'static>,
}

impl ViewRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        ViewRenderer { registry }
    }

    /// Render `template` against `data`
    ///
    /// # Examples
    /// ```
    /// use event_listing::render::ViewRenderer;
    /// use serde_json::json;
    ///
    /// let html = ViewRenderer::new()
    ///     .render_from_template("<b>{{title}}</b>", &json!({"title": "Fish & Chips"}))
    ///     .unwrap();
    /// assert_eq!(html, "<b>Fish &amp; Chips</b>");
    /// ```
    pub fn render_from_template<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        Ok(self.registry.render_template(template, data)?)
    }
}

impl Default for ViewRenderer {
    fn default() -> Self {
        Self::new()
    }
}
