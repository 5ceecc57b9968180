//! Export of rendered diagrams.
//!
//! The client renders diagrams to SVG. SVG is handed back as a download;
//! PNG and PDF conversion happens in the client, so those formats only get
//! an acknowledgement.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err("Unsupported export format".to_string()),
        }
    }
}

/// What the export endpoint should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Raw file bytes to send as an attachment
    File {
        content_type: &'static str,
        filename: String,
        bytes: Vec<u8>,
    },
    /// Conversion is left to the client
    ClientSide { message: String },
}

/// Service for exporting rendered diagrams.
pub struct ExportService;

impl ExportService {
    pub fn export(svg_content: &str, format: ExportFormat, filename: Option<&str>) -> ExportOutcome {
        match format {
            ExportFormat::Svg => ExportOutcome::File {
                content_type: "image/svg+xml",
                filename: Self::attachment_name(filename, format),
                bytes: svg_content.as_bytes().to_vec(),
            },
            ExportFormat::Png => ExportOutcome::ClientSide {
                message: "Convert to PNG on the client".to_string(),
            },
            ExportFormat::Pdf => ExportOutcome::ClientSide {
                message: "Convert to PDF on the client".to_string(),
            },
        }
    }

    /// Attachment filename: the caller's name, or `diagram.{ext}`.
    ///
    /// Quotes and line breaks are dropped so the name is safe inside a
    /// Content-Disposition header.
    pub fn attachment_name(filename: Option<&str>, format: ExportFormat) -> String {
        let cleaned: String = filename
            .unwrap_or_default()
            .chars()
            .filter(|c| !matches!(c, '"' | '\r' | '\n') && !c.is_control())
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            format!("diagram.{}", format.extension())
        } else {
            cleaned.to_string()
        }
    }
}
