use anyhow::Result;
use colored::Colorize;
use std::fmt::Write;

use crate::driver::Report;
use tsbc::checker::NodeRecord;
use tsbc::{DiffReasons, DiffRecord};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_json(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// One block per declaration, one line per record, then a summary.
    ///
    /// ```text
    /// Routes
    ///   Removed Signature `(path: '/b'): B;` old.d.ts:4:5
    /// ```
    pub fn render_text(&self, report: &Report) -> String {
        let mut out = String::new();
        for (name, records) in &report.declarations {
            let _ = writeln!(out, "{}", self.paint_name(name));
            for record in records {
                let _ = writeln!(out, "  {}", self.format_record(report, record));
            }
            out.push('\n');
        }
        out.push_str(&self.format_summary(report));
        out.push('\n');
        out
    }

    pub fn format_record(&self, report: &Report, record: &DiffRecord) -> String {
        let node = record.target.as_ref().or(record.source.as_ref());
        let name = node.map_or("", |n| n.name.as_str());
        let mut line = format!(
            "{} {} `{}`",
            self.paint_reasons(record.reasons),
            record.location,
            name
        );
        match (&record.source, &record.target) {
            (Some(source), Some(target)) => {
                let _ = write!(
                    line,
                    " {} -> {}",
                    self.format_location(report, source),
                    self.format_location(report, target)
                );
            }
            (Some(only), None) | (None, Some(only)) => {
                let _ = write!(line, " {}", self.format_location(report, only));
            }
            (None, None) => {}
        }
        line
    }

    fn format_location(&self, report: &Report, node: &NodeRecord) -> String {
        let location = format!(
            "{}:{}:{}",
            report.file_of(node.side).display(),
            node.position.line + 1,
            node.position.character + 1
        );
        if self.color {
            location.dimmed().to_string()
        } else {
            location
        }
    }

    fn format_summary(&self, report: &Report) -> String {
        let total = report.total();
        if total == 0 {
            let label = "No differences found";
            return if self.color { label.green().to_string() } else { label.to_string() };
        }
        let breaking = report.breaking_count();
        let summary = format!(
            "{total} difference(s) in {} declaration(s), {breaking} breaking",
            report.declarations.len()
        );
        if !self.color {
            return summary;
        }
        if breaking > 0 {
            summary.red().bold().to_string()
        } else {
            summary.yellow().to_string()
        }
    }

    fn paint_name(&self, name: &str) -> String {
        if self.color {
            name.bold().to_string()
        } else {
            name.to_string()
        }
    }

    fn paint_reasons(&self, reasons: DiffReasons) -> String {
        let label = reasons.to_string();
        if !self.color {
            return label;
        }
        if reasons == DiffReasons::ADDED {
            label.green().to_string()
        } else if reasons == DiffReasons::REMOVED {
            label.red().to_string()
        } else {
            label.yellow().to_string()
        }
    }
}
