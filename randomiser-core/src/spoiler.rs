use std::fmt::Display;

/// Severity of a spoiler-log line. `Always` lines (section headers and
/// separators) survive every render; `Verbose` lines carry the per-record
/// old -> new detail and are only rendered on request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Always,
    Verbose,
}

/// The ordered change log accumulated during a randomisation run and
/// written out as spoiler_log.txt afterwards.
#[derive(Clone, Debug, Default)]
pub struct SpoilerLog {
    lines: Vec<(LogLevel, String)>,
}

impl SpoilerLog {
    pub fn line(&mut self, level: LogLevel, text: impl Into<String>) {
        self.lines.push((level, text.into()));
    }

    pub fn lines(&self) -> &[(LogLevel, String)] {
        &self.lines
    }

    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        for (level, text) in &self.lines {
            if *level == LogLevel::Verbose && !verbose {
                continue;
            }
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

// Per-record line formats: 28-wide name column, 12-wide field label, then
// old -> new at field-appropriate precision.

pub fn float_line(name: &str, field: &str, old: f32, new: f32) -> String {
    format!("{name:>28} | {field:>12} | {old:.4} -> {new:.4}")
}

pub fn int_line(name: &str, field: &str, old: u32, new: u32) -> String {
    format!("{name:>28} | {field:>12} | {old:>4} -> {new:>4}")
}

pub fn string_line(name: &str, field: &str, old: impl Display, new: impl Display) -> String {
    format!("{name:>28} | {field:>12} | {old:>8} -> {new:>8}")
}
