use crate::extensions::ExtensionSet;
use crate::query::ReportLine;
use crate::wrap::{DEFAULT_INDENT, DEFAULT_MAX_WIDTH, word_wrap};

/// Everything one run learned about the display and the context.
///
/// Built once while the context is current, then only printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityReport {
    /// Query lines in print order.
    pub lines: Vec<ReportLine>,
    /// Header printed above the wrapped extension list.
    pub extensions_label: String,
    pub extensions: ExtensionSet,
}

impl CapabilityReport {
    pub fn new(extensions_label: impl Into<String>) -> Self {
        Self {
            extensions_label: extensions_label.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    /// Look up a line by label.
    pub fn line(&self, label: &str) -> Option<&ReportLine> {
        self.lines.iter().find(|line| line.label == label)
    }

    /// Number of lines whose query failed.
    pub fn absent_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.is_present()).count()
    }

    /// Diagnostics for standard error. An empty extension set is reported
    /// here so it cannot be mistaken for a failed query.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.extensions.is_empty() {
            out.push(format!("{}: no extensions found", self.extensions_label));
        }
        out
    }
}

/// Output-agnostic report rendering.
pub trait ReportRenderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, report: &CapabilityReport) -> Self::Output;
}

/// Plain-text renderer for standard output.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub indent: usize,
    pub max_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportRenderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &CapabilityReport) -> String {
        let mut out = String::new();
        for line in &report.lines {
            out.push_str(&format!("{line}\n"));
        }
        out.push_str(&format!("{}:\n", report.extensions_label));
        for line in word_wrap(report.extensions.names(), self.indent, self.max_width) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
