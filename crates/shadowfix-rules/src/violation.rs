//! Shadow violations: findings, never errors.

use std::fmt;

use serde::Serialize;
use shadowfix_syntax::StyleBlock;

/// The kinds of shadow anti-pattern, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A shadow is declared against a `'transparent'` value.
    TransparentBackground,
    /// A block declares `shadow*` properties without a `backgroundColor`.
    MissingBackground,
    /// An inline style combines a named style with a computed background.
    DynamicBackground,
    /// A block declares only `elevation` without a `backgroundColor`.
    MissingBackgroundAndroid,
}

impl ViolationKind {
    /// Stable identifier used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransparentBackground => "transparent_background",
            Self::MissingBackground => "missing_background",
            Self::DynamicBackground => "dynamic_background",
            Self::MissingBackgroundAndroid => "missing_background_android",
        }
    }

    /// One-line remediation hint.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::TransparentBackground => {
                "shadow can never render on a transparent background; use an opaque colour"
            }
            Self::MissingBackground => {
                "iOS shadows need an opaque backgroundColor in the same style block"
            }
            Self::DynamicBackground => {
                "computed backgrounds cannot be proven opaque; wrap the element in an opaque container"
            }
            Self::MissingBackgroundAndroid => {
                "elevation without a backgroundColor renders artifacts on Android; add one"
            }
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a violation was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationLocation {
    /// A whole named style block.
    Block(StyleBlock),
    /// A single zero-based line.
    Line(usize),
}

/// One offending construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShadowViolation {
    kind: ViolationKind,
    location: ViolationLocation,
    line: usize,
    evidence: String,
}

impl ShadowViolation {
    /// Creates a violation anchored on zero-based `line`. `evidence` is
    /// trimmed.
    #[must_use]
    pub fn new(kind: ViolationKind, location: ViolationLocation, line: usize, evidence: &str) -> Self {
        Self {
            kind,
            location,
            line,
            evidence: evidence.trim().to_owned(),
        }
    }

    /// Violation kind.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Block or line the violation belongs to.
    #[must_use]
    pub const fn location(&self) -> &ViolationLocation {
        &self.location
    }

    /// Owning block, for block-level violations.
    #[must_use]
    pub const fn block(&self) -> Option<&StyleBlock> {
        match &self.location {
            ViolationLocation::Block(block) => Some(block),
            ViolationLocation::Line(_) => None,
        }
    }

    /// Zero-based evidence line.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// One-based evidence line for reports.
    #[must_use]
    pub const fn display_line(&self) -> usize {
        self.line.saturating_add(1)
    }

    /// Trimmed text of the evidence line.
    #[must_use]
    pub fn evidence(&self) -> &str {
        &self.evidence
    }

    /// Whether the violation touches one-based `line`.
    #[must_use]
    pub fn covers_display_line(&self, line: usize) -> bool {
        let zero_based = line.saturating_sub(1);
        match &self.location {
            ViolationLocation::Block(block) => line > 0 && block.contains(zero_based),
            ViolationLocation::Line(_) => self.display_line() == line,
        }
    }
}
