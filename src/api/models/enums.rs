use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Top-level kind of diagram output.
///
/// `Mermaid` is the structured family (graph markup source), `Excalidraw` the
/// freeform family (an array of canvas shapes encoded as JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagramFamily {
    Mermaid,
    Excalidraw,
}

impl DiagramFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramFamily::Mermaid => "MERMAID",
            DiagramFamily::Excalidraw => "EXCALIDRAW",
        }
    }
}

impl fmt::Display for DiagramFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MERMAID" => Ok(DiagramFamily::Mermaid),
            "EXCALIDRAW" => Ok(DiagramFamily::Excalidraw),
            other => Err(format!("Unknown diagram type: {}", other)),
        }
    }
}

/// Sub-type of a structured (Mermaid) diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Gantt,
    Pie,
    Journey,
    Architecture,
}

impl ChartType {
    pub const ALL: [ChartType; 9] = [
        ChartType::Flowchart,
        ChartType::Sequence,
        ChartType::Class,
        ChartType::State,
        ChartType::Er,
        ChartType::Gantt,
        ChartType::Pie,
        ChartType::Journey,
        ChartType::Architecture,
    ];

    /// Look up a sub-type by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Resolve an optional, user-supplied sub-type. Missing or unknown names
    /// fall back to a flowchart.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or(ChartType::Flowchart)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Flowchart => "flowchart",
            ChartType::Sequence => "sequence",
            ChartType::Class => "class",
            ChartType::State => "state",
            ChartType::Er => "er",
            ChartType::Gantt => "gantt",
            ChartType::Pie => "pie",
            ChartType::Journey => "journey",
            ChartType::Architecture => "architecture",
        }
    }

    /// Keyword the generated Mermaid source must start with.
    pub fn keyword(&self) -> &'static str {
        match self {
            ChartType::Flowchart => "graph TD",
            ChartType::Sequence => "sequenceDiagram",
            ChartType::Class => "classDiagram",
            ChartType::State => "stateDiagram-v2",
            ChartType::Er => "erDiagram",
            ChartType::Gantt => "gantt",
            ChartType::Pie => "pie",
            ChartType::Journey => "journey",
            ChartType::Architecture => "architecture-beta",
        }
    }
}
