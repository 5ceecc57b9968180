use super::enums::DiagramFamily;

/// A single generation call. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub diagram_type: DiagramFamily,
    /// Upstream model name; the configured default is used when absent
    pub model: Option<String>,
    /// Structured sub-type name, e.g. "sequence"
    pub chart_type: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, diagram_type: DiagramFamily) -> Self {
        Self {
            prompt: prompt.into(),
            diagram_type,
            model: None,
            chart_type: Some("flowchart".to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_chart_type(mut self, chart_type: impl Into<String>) -> Self {
        self.chart_type = Some(chart_type.into());
        self
    }
}

/// Text produced by the model after code-fence stripping.
///
/// The content is opaque: Mermaid source for the structured family, a
/// JSON-array-shaped string for the freeform family. It is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub diagram_type: DiagramFamily,
    pub content: String,
}
