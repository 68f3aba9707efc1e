//! Line-anchored rewrite patches.

use serde::Serialize;

/// A replacement of one line of a source snapshot.
///
/// The replacement may span several lines; an insertion after a line is
/// expressed as the original line, a newline, and the inserted lines.
/// `original_text` is the line as it was when the patch was planned and is
/// checked again before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewritePatch {
    target_line: usize,
    original_text: String,
    replacement_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inserted_style_block: Option<String>,
}

impl RewritePatch {
    /// Replaces zero-based `target_line` with `replacement`.
    #[must_use]
    pub fn replace(
        target_line: usize,
        original_text: impl Into<String>,
        replacement_text: impl Into<String>,
    ) -> Self {
        Self {
            target_line,
            original_text: original_text.into(),
            replacement_text: replacement_text.into(),
            inserted_style_block: None,
        }
    }

    /// Keeps `target_line` and inserts `inserted` after it.
    #[must_use]
    pub fn insert_after(
        target_line: usize,
        original_text: impl Into<String>,
        inserted: &str,
    ) -> Self {
        let original: String = original_text.into();
        let replacement_text = format!("{original}\n{inserted}");
        Self {
            target_line,
            original_text: original,
            replacement_text,
            inserted_style_block: None,
        }
    }

    /// Attaches the style block introduced alongside this patch.
    #[must_use]
    pub fn with_inserted_style_block(mut self, block: impl Into<String>) -> Self {
        self.inserted_style_block = Some(block.into());
        self
    }

    /// Appends further lines to the end of the replacement.
    pub fn append_lines(&mut self, lines: &str) {
        self.replacement_text.push('\n');
        self.replacement_text.push_str(lines);
    }

    /// Zero-based line the patch replaces.
    #[must_use]
    pub const fn target_line(&self) -> usize {
        self.target_line
    }

    /// One-based line for reports.
    #[must_use]
    pub const fn display_line(&self) -> usize {
        self.target_line.saturating_add(1)
    }

    /// Line text recorded at planning time.
    #[must_use]
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Text that replaces the target line.
    #[must_use]
    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    /// Style block introduced by a wrap, if any.
    #[must_use]
    pub fn inserted_style_block(&self) -> Option<&str> {
        self.inserted_style_block.as_deref()
    }

    /// Lines added after the target line when the patch keeps it intact.
    #[must_use]
    pub fn inserted_lines(&self) -> Option<&str> {
        self.replacement_text
            .strip_prefix(self.original_text.as_str())
            .and_then(|rest| rest.strip_prefix('\n'))
    }

    /// Whether the patch keeps its target line and only adds lines after it.
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.inserted_lines().is_some()
    }
}
