//! Unit tests for system prompt selection

use genai_flow_api::models::{ChartType, DiagramFamily};
use genai_flow_api::services::prompt_service::{
    ARCHITECTURE_PROMPT, DEFAULT_FREEFORM_PROMPT, DEFAULT_STRUCTURED_PROMPT, PromptSelector,
    keyword_directive,
};

#[test]
fn test_every_known_chart_type_names_its_keyword() {
    let selector = PromptSelector::default();

    for chart in ChartType::ALL {
        let prompt = selector.build_system_prompt(DiagramFamily::Mermaid, Some(chart.name()));
        assert!(
            prompt.contains(chart.keyword()),
            "prompt for {} is missing {}",
            chart.name(),
            chart.keyword()
        );
    }
}

#[test]
fn test_architecture_prompt() {
    let prompt = PromptSelector::default()
        .build_system_prompt(DiagramFamily::Mermaid, Some("architecture"));

    assert!(prompt.contains("architecture-beta"));
    assert_eq!(prompt, ARCHITECTURE_PROMPT);
}

#[test]
fn test_sequence_prompt() {
    let prompt =
        PromptSelector::default().build_system_prompt(DiagramFamily::Mermaid, Some("sequence"));

    assert!(prompt.contains("sequenceDiagram"));
    assert!(prompt.starts_with(DEFAULT_STRUCTURED_PROMPT));
    assert!(prompt.ends_with(&keyword_directive(ChartType::Sequence)));
}

#[test]
fn test_unknown_chart_type_falls_back_to_flowchart() {
    let selector = PromptSelector::default();
    let expected = format!(
        "{}{}",
        DEFAULT_STRUCTURED_PROMPT,
        keyword_directive(ChartType::Flowchart)
    );

    let unknown = selector.build_system_prompt(DiagramFamily::Mermaid, Some("unknown_type"));
    assert!(unknown.contains("graph TD"));
    assert_eq!(unknown, expected);

    // Matching is case-sensitive
    let shouted = selector.build_system_prompt(DiagramFamily::Mermaid, Some("SEQUENCE"));
    assert_eq!(shouted, expected);

    let missing = selector.build_system_prompt(DiagramFamily::Mermaid, None);
    assert_eq!(missing, expected);
}

#[test]
fn test_freeform_prompt_describes_elements() {
    let prompt =
        PromptSelector::default().build_system_prompt(DiagramFamily::Excalidraw, Some("gantt"));

    assert_eq!(prompt, DEFAULT_FREEFORM_PROMPT);
    for shape in ["rectangle", "ellipse", "arrow", "text"] {
        assert!(prompt.contains(&format!("\"type\": \"{}\"", shape)));
    }
}

#[test]
fn test_configured_templates_are_used() {
    let selector = PromptSelector::new("CUSTOM STRUCTURED", "CUSTOM FREEFORM");

    assert_eq!(
        selector.build_system_prompt(DiagramFamily::Excalidraw, None),
        "CUSTOM FREEFORM"
    );
    assert!(
        selector
            .build_system_prompt(DiagramFamily::Mermaid, Some("pie"))
            .starts_with("CUSTOM STRUCTURED")
    );
}
