//! The shadow-pattern detector.
//!
//! Rules are applied in priority order and the first match wins for a line
//! or block:
//!
//! 1. a line declaring a shadow or elevation property next to a
//!    `'transparent'` literal, or a shadowed block whose `backgroundColor` is
//!    `'transparent'`
//! 2. a block with `shadow*` properties and no `backgroundColor`
//! 3. an inline style array pairing `styles.<name>` with a computed
//!    `backgroundColor`
//! 4. a block with only `elevation` and no `backgroundColor`
//!
//! Only the owning block's own line range is searched for a background.

use std::collections::BTreeSet;

use shadowfix_syntax::{SourceFile, StyleIndex};
use tracing::debug;

use crate::inline::{DynamicInlineStyle, container_name};
use crate::properties::{BlockFacts, TRANSPARENT, casts_shadow};
use crate::violation::{ShadowViolation, ViolationKind, ViolationLocation};

const DETECTOR_TARGET: &str = "shadowfix_rules::detector";

/// Detects shadow violations in `source`, ordered by line.
#[must_use]
pub fn detect(source: &SourceFile, index: &StyleIndex) -> Vec<ShadowViolation> {
    let mut violations = Vec::new();
    let mut reported_lines = BTreeSet::new();
    let mut settled_blocks = BTreeSet::new();

    for (line_number, line) in index.lines().iter().enumerate() {
        if casts_shadow(line) && line.has_literal(TRANSPARENT) {
            violations.push(ShadowViolation::new(
                ViolationKind::TransparentBackground,
                ViolationLocation::Line(line_number),
                line_number,
                source.line(line_number).unwrap_or_default(),
            ));
            reported_lines.insert(line_number);
            if let Some(owner) = index.owner_of(line_number) {
                settled_blocks.insert(owner.start_line());
            }
        }
    }

    for block in index.blocks() {
        if settled_blocks.contains(&block.start_line()) {
            continue;
        }
        let facts = BlockFacts::collect(index, block);
        if !facts.casts_shadow() {
            continue;
        }
        let (kind, line_number) = if let Some(background_line) = facts.transparent_background {
            (ViolationKind::TransparentBackground, background_line)
        } else if facts.background.is_some() {
            continue;
        } else if facts.shadow {
            (ViolationKind::MissingBackground, block.start_line())
        } else {
            (ViolationKind::MissingBackgroundAndroid, block.start_line())
        };
        violations.push(ShadowViolation::new(
            kind,
            ViolationLocation::Block(block.clone()),
            line_number,
            source.line(line_number).unwrap_or_default(),
        ));
    }

    for (line_number, line) in index.lines().iter().enumerate() {
        if reported_lines.contains(&line_number) {
            continue;
        }
        let Some(inline) = DynamicInlineStyle::find(line) else {
            continue;
        };
        if is_wrapped(source, line_number, inline.style_name()) {
            continue;
        }
        violations.push(ShadowViolation::new(
            ViolationKind::DynamicBackground,
            ViolationLocation::Line(line_number),
            line_number,
            source.line(line_number).unwrap_or_default(),
        ));
    }

    violations.sort_by_key(|violation| (violation.line(), violation.kind()));
    debug!(
        target: DETECTOR_TARGET,
        path = %source.path().display(),
        blocks = index.blocks().len(),
        violations = violations.len(),
        "detection complete"
    );
    violations
}

/// Whether the nearest preceding non-blank line already applies the
/// container style.
fn is_wrapped(source: &SourceFile, line_number: usize, style_name: &str) -> bool {
    let reference = format!("styles.{}", container_name(style_name));
    source
        .lines()
        .get(..line_number)
        .unwrap_or_default()
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.contains(&reference))
}
