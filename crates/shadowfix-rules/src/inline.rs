//! Inline style arrays: `style={[styles.<name>, { backgroundColor: <expr> }]}`.

use shadowfix_syntax::ScannedLine;

use crate::properties::BACKGROUND_KEY;

const STYLE_PROP: &str = "style=";
const STYLES_REFERENCE: &str = "styles.";

/// An inline style array whose background is computed at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DynamicInlineStyle<'a> {
    style_name: &'a str,
}

impl<'a> DynamicInlineStyle<'a> {
    /// Finds the first inline style array on `line` pairing a named style
    /// with a non-literal `backgroundColor`.
    pub(crate) fn find(line: &'a ScannedLine) -> Option<Self> {
        let masked = line.masked();
        let mut search_from = 0;
        while let Some(relative) = masked.get(search_from..).and_then(|rest| rest.find(STYLE_PROP)) {
            let prop_start = search_from.saturating_add(relative);
            search_from = prop_start.saturating_add(STYLE_PROP.len());
            let Some(style_name) = referenced_style(masked.get(search_from..)?) else {
                continue;
            };
            if has_dynamic_background(line, search_from) {
                return Some(Self { style_name });
            }
        }
        None
    }

    /// Name of the referenced stylesheet entry.
    pub(crate) const fn style_name(&self) -> &'a str {
        self.style_name
    }

    /// Name of the wrapping container style.
    pub(crate) fn container_name(&self) -> String {
        container_name(self.style_name)
    }
}

pub(crate) fn container_name(style_name: &str) -> String {
    format!("{style_name}Container")
}

/// Parses `{[ styles.<name>` and returns `<name>`.
fn referenced_style(after_prop: &str) -> Option<&str> {
    let reference = after_prop
        .trim_start()
        .strip_prefix('{')?
        .trim_start()
        .strip_prefix('[')?
        .trim_start()
        .strip_prefix(STYLES_REFERENCE)?;
    let end = reference
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '$'))
        .map_or(reference.len(), |(offset, _)| offset);
    reference.get(..end).filter(|name| !name.is_empty())
}

/// Whether a `backgroundColor` key after `from` takes a non-literal value.
fn has_dynamic_background(line: &ScannedLine, from: usize) -> bool {
    line.keys()
        .into_iter()
        .filter(|key| key.name() == BACKGROUND_KEY && key.value_start() > from)
        .any(|key| {
            let value = line
                .masked()
                .get(key.value_start()..)
                .unwrap_or_default()
                .trim_start();
            if value.is_empty() || value.starts_with('}') || value.starts_with(',') {
                return false;
            }
            line.literal_at(key.value_start())
                .is_none_or(|literal| literal.quote() == '`' && literal.content().contains("${"))
        })
}
