//! Line-oriented block scanner.
//!
//! The scanner is a minimal tokenizer: it tracks brace depth and the
//! boundaries of string literals and comments, nothing more. Each line is
//! reported with a *masked* copy in which string contents and comments are
//! blanked out (quote characters are kept), so structural checks never fire on
//! text that only looks like code. Masking preserves byte offsets, which lets
//! callers map a position in the masked line back onto the original.
//!
//! Single- and double-quoted strings end at the end of a line even when
//! unterminated; template literals and block comments carry over to the next
//! line. A quote directly after an identifier character is plain text, as in
//! JSX prose.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use crate::error::SyntaxError;
use crate::source::SourceFile;

/// A string literal found on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    quote: char,
    content: String,
    span: Range<usize>,
}

impl StringLiteral {
    /// Quote character that opened the literal.
    #[must_use]
    pub const fn quote(&self) -> char {
        self.quote
    }

    /// Literal content without quotes.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte range of the content within the original line.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// A `key:` occurrence in object-literal position on a masked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey<'a> {
    name: &'a str,
    value_start: usize,
}

impl<'a> PropertyKey<'a> {
    /// Property name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Byte offset of the first non-blank character after the colon.
    #[must_use]
    pub const fn value_start(&self) -> usize {
        self.value_start
    }
}

/// Scanner output for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    masked: String,
    depth_before: usize,
    depth_trace: Vec<usize>,
    literals: Vec<StringLiteral>,
}

impl ScannedLine {
    /// The line with string contents and comments blanked.
    #[must_use]
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Brace depth at the start of the line.
    #[must_use]
    pub const fn depth_before(&self) -> usize {
        self.depth_before
    }

    /// Brace depth at the end of the line.
    #[must_use]
    pub fn depth_after(&self) -> usize {
        self.depth_trace
            .last()
            .copied()
            .unwrap_or(self.depth_before)
    }

    /// Depth after each brace on the line, in order.
    #[must_use]
    pub fn depth_trace(&self) -> &[usize] {
        &self.depth_trace
    }

    /// String literals on the line, in order.
    #[must_use]
    pub fn literals(&self) -> &[StringLiteral] {
        &self.literals
    }

    /// Returns the literal whose opening quote sits at byte `offset`.
    #[must_use]
    pub fn literal_at(&self, offset: usize) -> Option<&StringLiteral> {
        self.literals
            .iter()
            .find(|literal| literal.span.start == offset.saturating_add(1))
    }

    /// Whether the line carries a string literal equal to `content`.
    #[must_use]
    pub fn has_literal(&self, content: &str) -> bool {
        self.literals.iter().any(|literal| literal.content == content)
    }

    /// Property keys in object-literal position.
    ///
    /// A key is an identifier followed by `:` and preceded only by the start
    /// of the line, `{` or `,`. This excludes ternaries, member accesses and
    /// parameter annotations.
    #[must_use]
    pub fn keys(&self) -> Vec<PropertyKey<'_>> {
        property_keys(&self.masked)
    }

    /// Returns the first key called `name`.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<PropertyKey<'_>> {
        self.keys().into_iter().find(|key| key.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Template,
    BlockComment,
}

/// Tokenizes every line of `source`.
///
/// # Errors
///
/// Returns [`SyntaxError::UnbalancedClose`] when a closing brace has no
/// matching opening brace.
pub fn scan_lines(source: &SourceFile) -> Result<Vec<ScannedLine>, SyntaxError> {
    let mut scanner = BlockScanner::default();
    source
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| scanner.scan_line(index, line))
        .collect()
}

#[derive(Debug)]
struct BlockScanner {
    depth: usize,
    mode: Mode,
}

impl Default for BlockScanner {
    fn default() -> Self {
        Self {
            depth: 0,
            mode: Mode::Code,
        }
    }
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Output accumulated while scanning one line.
struct LineState {
    masked: String,
    depth_trace: Vec<usize>,
    literals: Vec<StringLiteral>,
    template: Option<(usize, String)>,
}

impl LineState {
    fn new(capacity: usize, continues_template: bool) -> Self {
        Self {
            masked: String::with_capacity(capacity),
            depth_trace: Vec::new(),
            literals: Vec::new(),
            template: continues_template.then(|| (0, String::new())),
        }
    }

    fn finish(mut self, depth_before: usize, line_len: usize) -> ScannedLine {
        if let Some((start, content)) = self.template.take() {
            self.literals.push(StringLiteral {
                quote: '`',
                content,
                span: start..line_len,
            });
        }
        ScannedLine {
            masked: self.masked,
            depth_before,
            depth_trace: self.depth_trace,
            literals: self.literals,
        }
    }
}

impl BlockScanner {
    fn scan_line(&mut self, index: usize, line: &str) -> Result<ScannedLine, SyntaxError> {
        let depth_before = self.depth;
        let mut state = LineState::new(line.len(), self.mode == Mode::Template);
        let mut chars = line.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match self.mode {
                Mode::BlockComment => self.block_comment(ch, &mut chars, &mut state),
                Mode::Template => self.template(offset, ch, &mut chars, &mut state),
                Mode::Code => self.code(index, line, (offset, ch), &mut chars, &mut state)?,
            }
        }

        Ok(state.finish(depth_before, line.len()))
    }

    fn block_comment(&mut self, ch: char, chars: &mut Chars<'_>, state: &mut LineState) {
        if ch == '*' && chars.peek().is_some_and(|(_, next)| *next == '/') {
            chars.next();
            state.masked.push_str("  ");
            self.mode = Mode::Code;
        } else {
            mask(&mut state.masked, ch);
        }
    }

    fn template(&mut self, offset: usize, ch: char, chars: &mut Chars<'_>, state: &mut LineState) {
        if ch == '`' {
            state.masked.push('`');
            if let Some((start, content)) = state.template.take() {
                state.literals.push(StringLiteral {
                    quote: '`',
                    content,
                    span: start..offset,
                });
            }
            self.mode = Mode::Code;
            return;
        }
        let escaped = if ch == '\\' { chars.next() } else { None };
        for masked_char in std::iter::once(ch).chain(escaped.map(|(_, next)| next)) {
            mask(&mut state.masked, masked_char);
            if let Some((_, content)) = state.template.as_mut() {
                content.push(masked_char);
            }
        }
    }

    fn code(
        &mut self,
        index: usize,
        line: &str,
        (offset, ch): (usize, char),
        chars: &mut Chars<'_>,
        state: &mut LineState,
    ) -> Result<(), SyntaxError> {
        let next = chars.peek().map(|(_, next)| *next);
        match (ch, next) {
            ('/', Some('/')) => {
                mask(&mut state.masked, ch);
                for (_, rest) in chars.by_ref() {
                    mask(&mut state.masked, rest);
                }
            }
            ('/', Some('*')) => {
                chars.next();
                state.masked.push_str("  ");
                self.mode = Mode::BlockComment;
            }
            ('\'' | '"', _) if !follows_identifier(line, offset) => {
                quoted(line, (offset, ch), chars, state);
            }
            ('`', _) => {
                state.masked.push('`');
                state.template = Some((offset.saturating_add(1), String::new()));
                self.mode = Mode::Template;
            }
            ('{', _) => {
                self.depth = self.depth.saturating_add(1);
                state.depth_trace.push(self.depth);
                state.masked.push(ch);
            }
            ('}', _) => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| SyntaxError::unbalanced_close(index))?;
                state.depth_trace.push(self.depth);
                state.masked.push(ch);
            }
            _ => state.masked.push(ch),
        }
        Ok(())
    }
}

/// Consumes a single- or double-quoted literal, which ends at the end of the
/// line when unterminated.
fn quoted(line: &str, (offset, quote): (usize, char), chars: &mut Chars<'_>, state: &mut LineState) {
    state.masked.push(quote);
    let start = offset.saturating_add(1);
    let mut content = String::new();
    let mut end = line.len();
    while let Some((inner_offset, inner)) = chars.next() {
        if inner == quote {
            end = inner_offset;
            state.masked.push(quote);
            break;
        }
        mask(&mut state.masked, inner);
        content.push(inner);
        if inner == '\\'
            && let Some((_, escaped)) = chars.next()
        {
            mask(&mut state.masked, escaped);
            content.push(escaped);
        }
    }
    state.literals.push(StringLiteral {
        quote,
        content,
        span: start..end,
    });
}

/// A quote glued to an identifier (`Don't` in JSX text) never opens a
/// string literal.
fn follows_identifier(line: &str, offset: usize) -> bool {
    line.get(..offset)
        .and_then(|before| before.chars().next_back())
        .is_some_and(is_identifier_continue)
}

fn mask(masked: &mut String, ch: char) {
    masked.extend(std::iter::repeat_n(' ', ch.len_utf8()));
}

/// Returns `true` for characters that may start an identifier.
pub(crate) const fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

/// Returns `true` for characters that may continue an identifier.
pub(crate) const fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn property_keys(masked: &str) -> Vec<PropertyKey<'_>> {
    let mut keys = Vec::new();
    let mut previous_significant: Option<char> = None;
    let mut chars = masked.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        if !is_identifier_start(ch) {
            previous_significant = Some(ch);
            continue;
        }

        let mut end = offset.saturating_add(ch.len_utf8());
        while let Some((next_offset, next)) = chars.peek().copied() {
            if !is_identifier_continue(next) {
                break;
            }
            end = next_offset.saturating_add(next.len_utf8());
            chars.next();
        }

        let in_key_position = matches!(previous_significant, None | Some('{' | ','));
        previous_significant = Some('a');
        if !in_key_position {
            continue;
        }

        let rest = masked.get(end..).unwrap_or_default();
        let after_blank = rest.trim_start();
        if !after_blank.starts_with(':') || after_blank.starts_with("::") {
            continue;
        }
        let colon = end.saturating_add(rest.len().saturating_sub(after_blank.len()));
        let after_colon = masked.get(colon.saturating_add(1)..).unwrap_or_default();
        let value_start = colon
            .saturating_add(1)
            .saturating_add(after_colon.len().saturating_sub(after_colon.trim_start().len()));

        if let Some(name) = masked.get(offset..end) {
            keys.push(PropertyKey { name, value_start });
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn scan(text: &str) -> Vec<ScannedLine> {
        scan_lines(&SourceFile::new("f.tsx", text)).expect("scan")
    }

    #[test]
    fn tracks_depth_across_lines() {
        let lines = scan("a: {\n  b: 1,\n},\n");
        let depths: Vec<_> = lines
            .iter()
            .map(|line| (line.depth_before(), line.depth_after()))
            .collect();
        assert_eq!(depths, vec![(0, 1), (1, 1), (1, 0)]);
    }

    #[rstest]
    #[case("const s = '{';")]
    #[case("const s = \"}\";")]
    #[case("// { comment")]
    #[case("/* } */ x")]
    #[case("const t = `{ ${x} }`;")]
    fn ignores_braces_in_strings_and_comments(#[case] text: &str) {
        let lines = scan(text);
        let line = lines.first().expect("line");
        assert!(line.depth_trace().is_empty(), "{:?}", line.masked());
    }

    #[test]
    fn block_comments_span_lines() {
        let lines = scan("/*\n { \n*/\nx: {\n}");
        let depths: Vec<_> = lines.iter().map(ScannedLine::depth_after).collect();
        assert_eq!(depths, vec![0, 0, 0, 1, 0]);
    }

    #[test]
    fn apostrophes_in_jsx_text_do_not_hide_braces() {
        let lines = scan("<Text>\n    Don't miss {\n      count\n    } games\n  </Text>\n");
        let depths: Vec<_> = lines.iter().map(ScannedLine::depth_after).collect();
        assert_eq!(depths, vec![0, 1, 1, 0, 0]);
        assert!(lines.iter().all(|line| line.literals().is_empty()));
    }

    #[rstest]
    #[case("label: 'Today', x: {", 1)]
    #[case("fn('a'){", 1)]
    fn quotes_after_punctuation_still_open_strings(#[case] text: &str, #[case] literals: usize) {
        let lines = scan(text);
        let line = lines.first().expect("line");
        assert_eq!(line.literals().len(), literals);
        assert_eq!(line.depth_after(), 1);
    }

    #[test]
    fn masking_preserves_offsets() {
        let text = "  color: 'héllo', x: 1";
        let lines = scan(text);
        let line = lines.first().expect("line");
        assert_eq!(line.masked().len(), text.len());
        let literal = line.literals().first().expect("literal");
        assert_eq!(text.get(literal.span()), Some("héllo"));
    }

    #[test]
    fn stray_close_is_structural_error() {
        let error = scan_lines(&SourceFile::new("f.tsx", "a\n}\n")).expect_err("unbalanced");
        assert!(matches!(error, SyntaxError::UnbalancedClose { line: 2 }));
    }

    #[rstest]
    #[case("  shadowColor: '#000',", vec!["shadowColor"])]
    #[case("{ backgroundColor: x, elevation: 2 }", vec!["backgroundColor", "elevation"])]
    #[case("a ? b : c", vec![])]
    #[case("foo(bar: number)", vec![])]
    #[case("theme.colors: 1", vec![])]
    #[case("// shadowColor: 1", vec![])]
    #[case("label: 'shadowColor: x'", vec!["label"])]
    fn finds_property_keys(#[case] text: &str, #[case] expected: Vec<&str>) {
        let lines = scan(text);
        let line = lines.first().expect("line");
        let names: Vec<_> = line.keys().iter().map(PropertyKey::name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn value_start_points_at_value() {
        let text = "  backgroundColor:   team.color,";
        let lines = scan(text);
        let key = lines
            .first()
            .and_then(|line| line.key("backgroundColor"))
            .expect("key");
        assert_eq!(text.get(key.value_start()..), Some("team.color,"));
    }

    #[test]
    fn literal_at_finds_quoted_value() {
        let text = "  backgroundColor: 'transparent',";
        let lines = scan(text);
        let line = lines.first().expect("line");
        let key = line.key("backgroundColor").expect("key");
        let literal = line.literal_at(key.value_start()).expect("literal");
        assert_eq!(literal.content(), "transparent");
        assert_eq!(literal.quote(), '\'');
    }
}
