use crate::suggest::Suggestion;
use crate::validate::ValidationReport;

/// Formatter for simple, machine-readable output: one record per line,
/// tab-separated
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// `key<TAB>remark` for every problem key
    pub fn format_problems(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        for problem in report.problems() {
            output.push_str(&format!("{}\t{}\n", problem.key, escape(&problem.remark)));
        }
        output
    }

    /// `score<TAB>key<TAB>primary text[<TAB>target text]`; exact matches
    /// show `exact` as score
    pub fn format_suggestions(&self, suggestions: &[Suggestion]) -> String {
        let mut output = String::new();
        for s in suggestions {
            let score = if s.is_exact() {
                "exact".to_string()
            } else {
                format!("{:.3}", s.score)
            };
            output.push_str(&format!("{}\t{}\t{}", score, s.key, escape(&s.primary_text)));
            if let Some(target) = &s.target_text {
                output.push('\t');
                output.push_str(&escape(target));
            }
            output.push('\n');
        }
        output
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
}
