//! The rewrite planner.
//!
//! Planning is a pure function of the violations, the set of blocks already
//! patched, and the options. All patches are computed against the original
//! line numbers of one snapshot; the safe writer applies them bottom-up.

mod templates;

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use shadowfix_harness::RewritePatch;
use shadowfix_syntax::{SourceFile, StyleIndex};
use tracing::debug;

use crate::inline::DynamicInlineStyle;
use crate::properties::transparent_background;
use crate::violation::{ShadowViolation, ViolationKind};

const PLANNER_TARGET: &str = "shadowfix_rules::planner";
const SHEET_ROOT: &str = "StyleSheet.create(";

/// Default colour written into backgrounds and containers.
pub const DEFAULT_OPAQUE_COLOR: &str = "white";

/// Planner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    opaque_color: String,
}

impl PlanOptions {
    /// Uses `opaque_color` for inserted backgrounds.
    #[must_use]
    pub fn new(opaque_color: impl Into<String>) -> Self {
        Self {
            opaque_color: opaque_color.into(),
        }
    }

    /// Colour written into inserted backgrounds.
    #[must_use]
    pub fn opaque_color(&self) -> &str {
        &self.opaque_color
    }
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self::new(DEFAULT_OPAQUE_COLOR)
    }
}

/// Names of style blocks that already received a fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatchedBlocks(BTreeSet<String>);

impl PatchedBlocks {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `name` was already patched.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Records `name`, returning `false` when it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Number of recorded blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no block was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PatchedBlocks {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A violation the planner left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "note", rename_all = "snake_case")]
pub enum PlanNote {
    /// The element spans several lines, so it cannot be wrapped in place.
    MultiLineElement {
        /// One-based line of the element.
        line: usize,
    },
    /// No `StyleSheet.create({` root exists to receive the container block.
    MissingStyleSheetRoot {
        /// Container style that still needs declaring.
        container: String,
    },
    /// Another patch already targets the line.
    Conflict {
        /// One-based line targeted twice.
        line: usize,
        /// Kind of the violation that was skipped.
        kind: ViolationKind,
    },
    /// The transparent value is not a background, so it needs a human.
    TransparentShadowProperty {
        /// One-based line of the value.
        line: usize,
    },
}

impl fmt::Display for PlanNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiLineElement { line } => {
                write!(f, "line {line}: element spans several lines; wrap it by hand")
            }
            Self::MissingStyleSheetRoot { container } => write!(
                f,
                "no StyleSheet.create root found; declare '{container}' by hand"
            ),
            Self::Conflict { line, kind } => {
                write!(f, "line {line}: {kind} fix conflicts with another patch")
            }
            Self::TransparentShadowProperty { line } => write!(
                f,
                "line {line}: a shadow property is transparent; review by hand"
            ),
        }
    }
}

/// The patches for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    patches: Vec<RewritePatch>,
    patched: PatchedBlocks,
    notes: Vec<PlanNote>,
}

impl Plan {
    /// Patches sorted by ascending target line.
    #[must_use]
    pub fn patches(&self) -> &[RewritePatch] {
        &self.patches
    }

    /// Blocks patched so far, including those passed in.
    #[must_use]
    pub const fn patched(&self) -> &PatchedBlocks {
        &self.patched
    }

    /// Violations that were not patched.
    #[must_use]
    pub fn notes(&self) -> &[PlanNote] {
        &self.notes
    }

    /// Whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Consumes the plan, returning its patches.
    #[must_use]
    pub fn into_patches(self) -> Vec<RewritePatch> {
        self.patches
    }
}

/// Plans patches resolving `violations`.
#[must_use]
pub fn plan(
    source: &SourceFile,
    index: &StyleIndex,
    violations: &[ShadowViolation],
    patched: &PatchedBlocks,
    options: &PlanOptions,
) -> Plan {
    let mut planner = Planner {
        source,
        index,
        options,
        patched: patched.clone(),
        patches: BTreeMap::new(),
        notes: Vec::new(),
    };
    for violation in violations {
        planner.plan_violation(violation);
    }

    debug!(
        target: PLANNER_TARGET,
        path = %source.path().display(),
        patches = planner.patches.len(),
        notes = planner.notes.len(),
        "plan complete"
    );
    Plan {
        patches: planner.patches.into_values().collect(),
        patched: planner.patched,
        notes: planner.notes,
    }
}

struct Planner<'a> {
    source: &'a SourceFile,
    index: &'a StyleIndex,
    options: &'a PlanOptions,
    patched: PatchedBlocks,
    patches: BTreeMap<usize, RewritePatch>,
    notes: Vec<PlanNote>,
}

impl Planner<'_> {
    fn plan_violation(&mut self, violation: &ShadowViolation) {
        match violation.kind() {
            ViolationKind::MissingBackground | ViolationKind::MissingBackgroundAndroid => {
                self.augment(violation);
            }
            ViolationKind::TransparentBackground => self.replace_transparent(violation),
            ViolationKind::DynamicBackground => self.wrap(violation),
        }
    }

    /// Inserts `backgroundColor` as the first property of the block.
    fn augment(&mut self, violation: &ShadowViolation) {
        let Some(block) = violation.block() else {
            return;
        };
        if self.patched.contains(block.name()) {
            return;
        }
        let start = block.start_line();
        let Some(opening) = self.source.line(start) else {
            return;
        };
        let colour = self.options.opaque_color();

        let patch = if block.start_line() == block.end_line() {
            let masked = self.index.line(start).map_or(opening, |line| line.masked());
            let Some(replacement) = templates::inline_background(opening, masked, colour) else {
                return;
            };
            RewritePatch::replace(start, opening, replacement)
        } else {
            RewritePatch::insert_after(start, opening, &templates::background_line(opening, colour))
        };
        if self.push(patch, violation.kind()) {
            self.patched.insert(block.name());
        }
    }

    /// Swaps the `'transparent'` background literal for the opaque colour.
    fn replace_transparent(&mut self, violation: &ShadowViolation) {
        let line_number = violation.line();
        let literal = self
            .index
            .line(line_number)
            .and_then(transparent_background);
        let (Some(literal), Some(original)) = (literal, self.source.line(line_number)) else {
            self.notes.push(PlanNote::TransparentShadowProperty {
                line: violation.display_line(),
            });
            return;
        };
        let Some(replacement) =
            templates::splice(original, literal.span(), self.options.opaque_color())
        else {
            return;
        };
        let pushed = self.push(
            RewritePatch::replace(line_number, original, replacement),
            violation.kind(),
        );
        if let Some(owner) = self.index.owner_of(line_number).filter(|_| pushed) {
            self.patched.insert(owner.name());
        }
    }

    /// Nests the element in a container view and declares the container.
    fn wrap(&mut self, violation: &ShadowViolation) {
        let line_number = violation.line();
        let (Some(original), Some(scanned)) =
            (self.source.line(line_number), self.index.line(line_number))
        else {
            return;
        };
        let Some(inline) = DynamicInlineStyle::find(scanned) else {
            return;
        };
        let element = original.trim();
        if !(element.starts_with('<') && element.ends_with("/>")) {
            self.notes.push(PlanNote::MultiLineElement {
                line: violation.display_line(),
            });
            return;
        }

        let container = inline.container_name();
        let root = self.sheet_root();
        let indent = root
            .as_ref()
            .map_or(templates::INDENT_STEP, |(_, indent)| indent.as_str());
        let block = templates::container_block(&container, indent, self.options.opaque_color());
        let wrap = RewritePatch::replace(
            line_number,
            original,
            templates::wrap_element(original, &container),
        )
        .with_inserted_style_block(block.clone());
        if !self.push(wrap, violation.kind()) {
            return;
        }

        if self.index.get(&container).is_some() || self.patched.contains(&container) {
            return;
        }
        match root {
            Some((root_line, _)) => {
                let Some(root_text) = self.source.line(root_line) else {
                    return;
                };
                let companion = RewritePatch::insert_after(root_line, root_text, &block);
                if self.push(companion, violation.kind()) {
                    self.patched.insert(container);
                }
            }
            None => {
                let note = PlanNote::MissingStyleSheetRoot { container };
                if !self.notes.contains(&note) {
                    self.notes.push(note);
                }
            }
        }
    }

    /// Zero-based line opening the style sheet, and the indentation of its
    /// entries.
    fn sheet_root(&self) -> Option<(usize, String)> {
        let root_line = self.index.lines().iter().position(|line| {
            let masked = line.masked();
            masked.contains(SHEET_ROOT) && line.depth_after() > line.depth_before()
        })?;
        let root_text = self.source.line(root_line).unwrap_or_default();
        let indent = self
            .index
            .blocks()
            .iter()
            .find(|block| block.start_line() > root_line)
            .and_then(|block| self.source.line(block.start_line()))
            .map_or_else(
                || templates::nested_indent(root_text),
                |opening| templates::indentation(opening).to_owned(),
            );
        Some((root_line, indent))
    }

    /// Records `patch`, merging insertions after a shared anchor. Returns
    /// whether the patch was kept.
    fn push(&mut self, patch: RewritePatch, kind: ViolationKind) -> bool {
        match self.patches.entry(patch.target_line()) {
            Entry::Vacant(entry) => {
                entry.insert(patch);
                true
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                match (existing.is_insertion(), patch.inserted_lines()) {
                    (true, Some(lines)) => {
                        existing.append_lines(lines);
                        true
                    }
                    _ => {
                        self.notes.push(PlanNote::Conflict {
                            line: patch.display_line(),
                            kind,
                        });
                        false
                    }
                }
            }
        }
    }
}
