//! Text produced by the planner.

use crate::properties::BACKGROUND_KEY;

pub(crate) const INDENT_STEP: &str = "  ";

/// Leading whitespace of `line`.
pub(crate) fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    line.get(..line.len().saturating_sub(trimmed.len()))
        .unwrap_or_default()
}

/// `backgroundColor: '<colour>',` indented one level inside `opening`.
pub(crate) fn background_line(opening: &str, colour: &str) -> String {
    format!("{}{INDENT_STEP}{BACKGROUND_KEY}: '{colour}',", indentation(opening))
}

/// Adds `backgroundColor` right after the opening brace of a single-line
/// block, or `None` when the brace cannot be found.
pub(crate) fn inline_background(line: &str, masked: &str, colour: &str) -> Option<String> {
    let brace = masked.find(':').and_then(|colon| {
        masked
            .get(colon..)
            .and_then(|rest| rest.find('{'))
            .map(|offset| colon.saturating_add(offset))
    })?;
    let head = line.get(..=brace)?;
    let tail = line.get(brace.saturating_add(1)..)?;
    let separator = if tail.starts_with(' ') { "" } else { " " };
    Some(format!("{head} {BACKGROUND_KEY}: '{colour}',{separator}{tail}"))
}

/// Replaces the byte range `span` of `line` with `replacement`.
pub(crate) fn splice(line: &str, span: std::ops::Range<usize>, replacement: &str) -> Option<String> {
    let head = line.get(..span.start)?;
    let tail = line.get(span.end..)?;
    Some(format!("{head}{replacement}{tail}"))
}

/// Nests a single-line element inside an opaque container view.
pub(crate) fn wrap_element(line: &str, container: &str) -> String {
    let indent = indentation(line);
    let element = line.trim();
    [
        format!("{indent}<View style={{styles.{container}}}>"),
        format!("{indent}{INDENT_STEP}{element}"),
        format!("{indent}</View>"),
    ]
    .join("\n")
}

/// A container style block with an opaque background and a small shadow.
pub(crate) fn container_block(name: &str, indent: &str, colour: &str) -> String {
    let inner = format!("{indent}{INDENT_STEP}");
    [
        format!("{indent}{name}: {{"),
        format!("{inner}{BACKGROUND_KEY}: '{colour}',"),
        format!("{inner}shadowColor: '#000',"),
        format!("{inner}shadowOffset: {{ width: 0, height: 1 }},"),
        format!("{inner}shadowOpacity: 0.1,"),
        format!("{inner}shadowRadius: 2,"),
        format!("{inner}elevation: 2,"),
        format!("{indent}}},"),
    ]
    .join("\n")
}

/// Indentation for a block nested one level inside `root`.
pub(crate) fn nested_indent(root: &str) -> String {
    format!("{}{INDENT_STEP}", indentation(root))
}
