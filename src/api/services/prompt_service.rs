//! System prompt selection for diagram generation.
//!
//! The freeform (Excalidraw) family always uses one template. The structured
//! (Mermaid) family uses a base template plus a directive naming the starting
//! keyword of the requested chart type, except for architecture diagrams which
//! get a dedicated template with their own syntax rules.

use crate::config::AiConfig;
use crate::models::{ChartType, DiagramFamily};

/// Default base template for Mermaid diagrams.
pub const DEFAULT_STRUCTURED_PROMPT: &str = r#"You are an expert technical diagram author and business process analyst.
Analyse the user's request thoroughly, think through the business logic, and produce a detailed, complete Mermaid.js diagram.

Core requirements:
1. Depth: explore every business branch, error path and edge case the scenario implies
2. Completeness: include every key step, decision node and branch
3. Detail: do not oversimplify; every significant stage must appear
4. Professionalism: follow industry practice for the scenario at hand
5. Brevity: node labels must be short, at most 8 CJK characters or 16 Latin characters

Output rules:
1. Return only raw Mermaid source, without markdown code fences
2. If the user does not name a diagram type, use 'graph TD' (flowchart)
3. Follow Mermaid syntax strictly
4. Keep node text concise and free of special symbols
5. Do not add any explanation

Syntax restrictions:
- Never use punctuation such as commas, question marks or colons inside node labels
- Never use parentheses (), brackets [] or braces {} inside label text
- Never append parenthesised notes to a label; split complex information into several nodes instead
- Decision nodes must be short, e.g. 'Input valid' rather than 'Is the input valid (stock, limits, account state)?'

Label length limits:
- CJK labels: at most 8 characters
- Latin labels: at most 16 characters, e.g. 'User Login', 'Verify Auth', 'Submit Order'
- Mixed labels: count CJK characters as two, total at most 16
- Use shorter synonyms or abbreviations when a description is too long

Detail guidance:
- Flowcharts must contain a start, every processing step, every decision branch (success and failure), error handling and an end node
- Sign-up and login scenarios must cover input validation, credential checks, success path, failure paths and error handling
- Business processes must cover the normal flow, exception flow, edge cases and rollback
- Use decision nodes ({}) for conditional branches and label each branch

Supported diagram types:
- graph TD/LR: flowchart
- sequenceDiagram: sequence diagram
- classDiagram: class diagram
- erDiagram: entity relationship diagram
- stateDiagram-v2: state diagram
- gantt: gantt chart"#;

/// Default template for Excalidraw element arrays.
pub const DEFAULT_FREEFORM_PROMPT: &str = r#"You are an expert diagram designer.
Your task is to produce a JSON data structure usable by Excalidraw.

Output format:
Return one strictly valid JSON array; every object is one shape element.

Supported element types:
- Rectangle: {"type": "rectangle", "x": number, "y": number, "width": number, "height": number, "label": "text", "backgroundColor": "color"}
- Ellipse: {"type": "ellipse", "x": number, "y": number, "width": number, "height": number, "label": "text"}
- Arrow: {"type": "arrow", "startX": number, "startY": number, "endX": number, "endY": number}
- Text: {"type": "text", "x": number, "y": number, "text": "text", "fontSize": number}

Layout rules:
- Place elements sensibly and avoid overlaps
- Use a coordinate system starting at (0,0)
- Keep reasonable spacing between elements

Text restrictions:
- label and text fields must be short
- CJK labels: at most 8 characters
- Latin labels: at most 16 characters, e.g. 'User Login', 'Verify Auth', 'Submit Order'
- Never use parentheses (), brackets [] or braces {} in text
- Never append parenthesised notes; they overflow the shape bounds
- Use shorter synonyms or abbreviations when a description is too long

Return only the JSON array and nothing else."#;

/// Template for `architecture-beta` diagrams.
pub const ARCHITECTURE_PROMPT: &str = r#"You are an expert software architect.
Produce a Mermaid architecture diagram for the system the user describes.

The output MUST start with the keyword architecture-beta on its own line.

Syntax rules (follow exactly):
1. Groups: group {id}({icon})[{Title}]
   Nested group: group {id}({icon})[{Title}] in {parent_group_id}
2. Services: service {id}({icon})[{Title}]
   Service inside a group: service {id}({icon})[{Title}] in {group_id}
3. Connections: {service_id}:{side} -- {side}:{service_id}
   Directed connections: {service_id}:{side} --> {side}:{service_id}
   {side} is exactly one of L, R, T, B (left, right, top, bottom)
4. Icons are limited to: cloud, database, disk, internet, server
5. Ids use only ASCII letters, digits and underscores, start with a letter, and are unique
6. Titles are English only, at most 16 characters, without punctuation, parentheses or brackets
7. Declare every group before the services inside it, and every service before any connection that uses it
8. Do not write comments, styling, markdown code fences or explanations

Example:
architecture-beta
    group api(cloud)[API]
    service gateway(internet)[Gateway] in api
    service app(server)[App Server] in api
    service db(database)[Database] in api
    gateway:R --> L:app
    app:B -- T:db

Return only the diagram source."#;

/// Builds the system prompt for a generation request.
#[derive(Debug, Clone)]
pub struct PromptSelector {
    structured: String,
    freeform: String,
}

impl PromptSelector {
    pub fn new(structured: impl Into<String>, freeform: impl Into<String>) -> Self {
        Self {
            structured: structured.into(),
            freeform: freeform.into(),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.structured_prompt.clone(), config.freeform_prompt.clone())
    }

    /// Produce the system prompt for `family` and an optional chart sub-type.
    ///
    /// Unknown or missing sub-types are treated as flowcharts. The sub-type is
    /// ignored for the freeform family.
    pub fn build_system_prompt(&self, family: DiagramFamily, chart_type: Option<&str>) -> String {
        match family {
            DiagramFamily::Excalidraw => self.freeform.clone(),
            DiagramFamily::Mermaid => match ChartType::resolve(chart_type) {
                ChartType::Architecture => ARCHITECTURE_PROMPT.to_string(),
                chart => format!("{}{}", self.structured, keyword_directive(chart)),
            },
        }
    }
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new(DEFAULT_STRUCTURED_PROMPT, DEFAULT_FREEFORM_PROMPT)
    }
}

/// Directive appended to the structured template for non-architecture charts.
pub fn keyword_directive(chart: ChartType) -> String {
    format!(
        "\n\nThe diagram type is fixed: the output MUST start with the keyword '{}'.",
        chart.keyword()
    )
}
