//! CLI output formatting for batch compression runs.
//!
//! # Output Format
//!
//! ```text
//! portrait.jpg
//!     compressed: 2.9 MB → 61.4 KB (image/jpeg)
//! banner.png
//!     rejected (dimensions_too_large): image dimensions too large (20000x15000). Maximum 10000px per side
//!
//! Compressed 1 of 2 inputs
//! ```
//!
//! With `--json` the same reports are written as a JSON array instead.
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure, with no I/O and no side effects.

use crate::error::{PipelineError, RejectionKind};
use serde::Serialize;

/// Result of compressing one CLI input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
    /// Input as given on the command line.
    pub input: String,
    /// Length of the submitted data URI.
    pub input_bytes: usize,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Compressed {
        mime_type: String,
        output_bytes: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        data_uri: Option<String>,
    },
    Rejected {
        kind: RejectionKind,
        message: String,
    },
}

impl CompressionReport {
    /// Build a report from a pipeline result. The data URI is only kept
    /// when `keep_uri` is set.
    pub fn new(
        input: impl Into<String>,
        input_bytes: usize,
        result: Result<String, PipelineError>,
        keep_uri: bool,
    ) -> Self {
        let outcome = match result {
            Ok(uri) => ReportOutcome::Compressed {
                mime_type: mime_of(&uri).to_string(),
                output_bytes: uri.len(),
                data_uri: keep_uri.then_some(uri),
            },
            Err(e) => ReportOutcome::Rejected {
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        Self {
            input: input.into(),
            input_bytes,
            outcome,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Rejected { .. })
    }
}

fn mime_of(uri: &str) -> &str {
    uri.strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("")
}

/// Human-readable byte size: `812 B`, `61.4 KB`, `2.9 MB`.
fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

pub fn format_report(report: &CompressionReport) -> Vec<String> {
    let mut lines = vec![report.input.clone()];
    match &report.outcome {
        ReportOutcome::Compressed {
            mime_type,
            output_bytes,
            data_uri,
        } => {
            lines.push(format!(
                "    compressed: {} → {} ({mime_type})",
                format_bytes(report.input_bytes),
                format_bytes(*output_bytes)
            ));
            if let Some(uri) = data_uri {
                lines.push(format!("    {uri}"));
            }
        }
        ReportOutcome::Rejected { kind, message } => {
            let kind = serde_json::to_value(kind)
                .ok()
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_default();
            lines.push(format!("    rejected ({kind}): {message}"));
        }
    }
    lines
}

pub fn format_summary(reports: &[CompressionReport]) -> Vec<String> {
    let ok = reports.iter().filter(|r| !r.is_rejected()).count();
    let noun = if reports.len() == 1 { "input" } else { "inputs" };
    vec![format!("Compressed {ok} of {} {noun}", reports.len())]
}

pub fn print_reports(reports: &[CompressionReport]) {
    for report in reports {
        for line in format_report(report) {
            println!("{line}");
        }
    }
    println!();
    for line in format_summary(reports) {
        println!("{line}");
    }
}

pub fn print_json(reports: &[CompressionReport]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_report(keep_uri: bool) -> CompressionReport {
        CompressionReport::new(
            "portrait.jpg",
            3 * 1024 * 1024,
            Ok("data:image/jpeg;base64,Zm9v".to_string()),
            keep_uri,
        )
    }

    fn rejected_report() -> CompressionReport {
        CompressionReport::new(
            "banner.png",
            2048,
            Err(PipelineError::DimensionsTooLarge {
                width: 20_000,
                height: 15_000,
                max: 10_000,
            }),
            false,
        )
    }

    #[test]
    fn format_bytes_picks_unit() {
        assert_eq!(format_bytes(812), "812 B");
        assert_eq!(format_bytes(62_874), "61.4 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn compressed_report_lines() {
        let lines = format_report(&ok_report(false));
        assert_eq!(lines, vec![
            "portrait.jpg".to_string(),
            "    compressed: 3.0 MB → 27 B (image/jpeg)".to_string(),
        ]);
    }

    #[test]
    fn compressed_report_can_include_uri() {
        let lines = format_report(&ok_report(true));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "    data:image/jpeg;base64,Zm9v");
    }

    #[test]
    fn rejected_report_names_kind() {
        let lines = format_report(&rejected_report());
        assert_eq!(
            lines[1],
            "    rejected (dimensions_too_large): image dimensions too large (20000x15000). Maximum 10000px per side"
        );
    }

    #[test]
    fn summary_counts_successes() {
        let reports = vec![ok_report(false), rejected_report()];
        assert_eq!(format_summary(&reports), vec!["Compressed 1 of 2 inputs"]);
        assert_eq!(format_summary(&reports[..1]), vec!["Compressed 1 of 1 input"]);
    }

    #[test]
    fn json_report_is_flat_and_tagged() {
        let value = serde_json::to_value(rejected_report()).unwrap();
        assert_eq!(value["input"], "banner.png");
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["kind"], "dimensions_too_large");

        let value = serde_json::to_value(ok_report(false)).unwrap();
        assert_eq!(value["status"], "compressed");
        assert_eq!(value["mime_type"], "image/jpeg");
        assert!(value.get("data_uri").is_none());
    }
}
