//! Style-block indexing.
//!
//! A style block is a named object literal, `<identifier>: {`, together with
//! every line up to the brace that closes it. Named literals nested inside an
//! open block (`shadowOffset: { … }`) belong to the enclosing block, so the
//! produced blocks never overlap and each line has at most one owner.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::SyntaxError;
use crate::scanner::{ScannedLine, is_identifier_continue, is_identifier_start, scan_lines};
use crate::source::SourceFile;

/// A named style block and its inclusive, zero-based line range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StyleBlock {
    name: String,
    start_line: usize,
    end_line: usize,
}

impl StyleBlock {
    /// Creates a block. `end_line` is clamped so it is never before
    /// `start_line`.
    #[must_use]
    pub fn new(name: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line: end_line.max(start_line),
        }
    }

    /// Name captured at the opening line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based opening line.
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.start_line
    }

    /// Zero-based closing line.
    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.end_line
    }

    /// Inclusive range of lines owned by the block.
    #[must_use]
    pub const fn lines(&self) -> RangeInclusive<usize> {
        self.start_line..=self.end_line
    }

    /// Whether `line` lies inside the block.
    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Ordered, disjoint style blocks plus the scanned lines they came from.
#[derive(Debug, Clone)]
pub struct StyleIndex {
    blocks: Vec<StyleBlock>,
    lines: Vec<ScannedLine>,
}

impl StyleIndex {
    /// Builds an index, checking that blocks are ordered and disjoint.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::OverlappingBlocks`] for the first block that
    /// starts before the previous block ends.
    pub fn new(blocks: Vec<StyleBlock>, lines: Vec<ScannedLine>) -> Result<Self, SyntaxError> {
        for pair in blocks.windows(2) {
            if let [previous, next] = pair
                && next.start_line <= previous.end_line
            {
                return Err(SyntaxError::OverlappingBlocks {
                    name: next.name.clone(),
                    line: next.start_line.saturating_add(1),
                });
            }
        }
        Ok(Self { blocks, lines })
    }

    /// Blocks in source order.
    #[must_use]
    pub fn blocks(&self) -> &[StyleBlock] {
        &self.blocks
    }

    /// Scanned lines, one per source line.
    #[must_use]
    pub fn lines(&self) -> &[ScannedLine] {
        &self.lines
    }

    /// Scanned line at zero-based `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&ScannedLine> {
        self.lines.get(index)
    }

    /// First block called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StyleBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// The block owning zero-based `line`, if any.
    #[must_use]
    pub fn owner_of(&self, line: usize) -> Option<&StyleBlock> {
        let position = self
            .blocks
            .partition_point(|block| block.start_line <= line);
        position
            .checked_sub(1)
            .and_then(|index| self.blocks.get(index))
            .filter(|block| block.contains(line))
    }
}

/// Indexes the style blocks of `source`.
///
/// # Errors
///
/// Returns [`SyntaxError::UnbalancedClose`] for a stray closing brace and
/// [`SyntaxError::UnterminatedBlock`] when a block is still open at the end of
/// the file.
pub fn index_blocks(source: &SourceFile) -> Result<StyleIndex, SyntaxError> {
    let lines = scan_lines(source)?;
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock<'_>> = None;

    for (index, line) in lines.iter().enumerate() {
        let mut segment = Segment::whole(line);
        if let Some(current) = open.as_ref() {
            let Some(close) = line
                .depth_trace()
                .iter()
                .position(|depth| *depth <= current.depth)
            else {
                continue;
            };
            // A line that closes one block and opens the next belongs to the
            // block it opens.
            let tail = Segment::after_brace(line, close)
                .filter(|tail| opening_name(tail.masked).is_some());
            let end = if tail.is_some() {
                index.saturating_sub(1)
            } else {
                index
            };
            blocks.push(StyleBlock::new(current.name, current.start, end));
            open = None;
            let Some(reopened) = tail else {
                continue;
            };
            segment = reopened;
        }

        let Some(name) = opening_name(segment.masked) else {
            continue;
        };
        let closes_here = segment
            .trace
            .iter()
            .skip(1)
            .any(|after| *after <= segment.depth);
        if closes_here {
            blocks.push(StyleBlock::new(name, index, index));
        } else {
            open = Some(OpenBlock {
                name,
                start: index,
                depth: segment.depth,
            });
        }
    }

    if let Some(current) = open {
        return Err(SyntaxError::unterminated(current.name, current.start));
    }

    StyleIndex::new(blocks, lines)
}

struct OpenBlock<'a> {
    name: &'a str,
    start: usize,
    depth: usize,
}

/// The part of a line that may open a block, with its starting depth and the
/// depths after each of its braces.
struct Segment<'a> {
    masked: &'a str,
    depth: usize,
    trace: &'a [usize],
}

impl<'a> Segment<'a> {
    fn whole(line: &'a ScannedLine) -> Self {
        Self {
            masked: line.masked(),
            depth: line.depth_before(),
            trace: line.depth_trace(),
        }
    }

    /// The rest of `line` after its brace number `position`, so `}, card: {`
    /// can close one block and open the next.
    fn after_brace(line: &'a ScannedLine, position: usize) -> Option<Self> {
        let (offset, _) = line.masked().match_indices(['{', '}']).nth(position)?;
        let masked = line
            .masked()
            .get(offset.saturating_add(1)..)?
            .trim_start_matches(|ch: char| ch == ',' || ch.is_whitespace());
        Some(Self {
            masked,
            depth: *line.depth_trace().get(position)?,
            trace: line.depth_trace().get(position.saturating_add(1)..)?,
        })
    }
}

/// Returns the identifier when `masked` opens a named object literal.
pub(crate) fn opening_name(masked: &str) -> Option<&str> {
    let trimmed = masked.trim_start();
    let mut chars = trimmed.char_indices();
    let (_, first) = chars.next()?;
    if !is_identifier_start(first) {
        return None;
    }
    let end = chars
        .find(|(_, ch)| !is_identifier_continue(*ch))
        .map_or(trimmed.len(), |(offset, _)| offset);
    let name = trimmed.get(..end)?;
    let rest = trimmed.get(end..)?.trim_start().strip_prefix(':')?;
    rest.trim_start().starts_with('{').then_some(name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("card: {", Some("card"))]
    #[case("    dotContainer:{", Some("dotContainer"))]
    #[case("  $root : {", Some("$root"))]
    #[case("card: styles.x", None)]
    #[case("style={{", None)]
    #[case("1abc: {", None)]
    fn recognises_opening_lines(#[case] masked: &str, #[case] expected: Option<&str>) {
        assert_eq!(opening_name(masked), expected);
    }

    #[test]
    fn owner_of_finds_enclosing_block() {
        let source = SourceFile::new("s.ts", "a: {\n  x: 1,\n},\nb: {\n},\n");
        let index = index_blocks(&source).expect("index");
        assert_eq!(index.owner_of(1).map(StyleBlock::name), Some("a"));
        assert_eq!(index.owner_of(3).map(StyleBlock::name), Some("b"));
        assert!(index.owner_of(5).is_none());
    }

    #[test]
    fn new_rejects_overlapping_blocks() {
        let blocks = vec![StyleBlock::new("a", 0, 3), StyleBlock::new("b", 2, 4)];
        let error = StyleIndex::new(blocks, Vec::new()).expect_err("overlap");
        assert!(matches!(error, SyntaxError::OverlappingBlocks { line: 3, .. }));
    }
}
