use crate::tree::{Dictionary, NodeId};
use crate::validate::ValidationReport;

/// Formatter for rendering the key tree as text
pub struct TreeFormatter {
    max_width: usize,
}

impl TreeFormatter {
    /// Create a new TreeFormatter with default width (80 columns)
    pub fn new() -> Self {
        Self { max_width: 80 }
    }

    /// Create a TreeFormatter with custom width
    pub fn with_width(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Render the whole dictionary. Full keys show their text in `culture`
    /// (the primary culture when `None`); with a report, keys with problems
    /// are marked with `!` and their remark.
    pub fn format(
        &self,
        dict: &Dictionary,
        culture: Option<&str>,
        report: Option<&ValidationReport>,
    ) -> String {
        let culture = culture.or_else(|| dict.comment_culture());
        let mut output = format!("{} keys, {} cultures\n", dict.len(), dict.cultures().len());
        let Some(root) = dict.node(dict.root()) else {
            return output;
        };
        let count = root.children().len();
        for (i, child) in root.children().iter().enumerate() {
            self.format_node(dict, *child, culture, report, &mut output, "", i + 1 == count);
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn format_node(
        &self,
        dict: &Dictionary,
        id: NodeId,
        culture: Option<&str>,
        report: Option<&ValidationReport>,
        output: &mut String,
        prefix: &str,
        is_last: bool,
    ) {
        let Some(node) = dict.node(id) else { return };
        let connector = if is_last { "└─> " } else { "├─> " };
        output.push_str(prefix);
        output.push_str(connector);
        output.push_str(node.segment_name());
        if node.is_namespace() {
            output.push(':');
        }

        if node.is_full_key() {
            if let Some(culture) = culture {
                let used = prefix.chars().count() + 4 + node.segment_name().chars().count() + 3;
                let room = self.max_width.saturating_sub(used).max(10);
                output.push_str(&format!(" = \"{}\"", truncate(node.text(culture), room)));
            }
        }
        if let Some(status) = report.and_then(|r| r.status(id)) {
            if let Some(remark) = &status.remark {
                output.push_str(&format!("  ! {}", remark));
            } else if status.has_problem && !node.is_full_key() {
                output.push_str("  !");
            }
        }
        output.push('\n');

        let child_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });
        let count = node.children().len();
        for (i, child) in node.children().iter().enumerate() {
            self.format_node(dict, *child, culture, report, output, &child_prefix, i + 1 == count);
        }
    }
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorten to at most `max_chars` characters, ending in "..."
fn truncate(s: &str, max_chars: usize) -> String {
    let single_line = s.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let kept: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
