//! Source snapshots and style-block indexing for the shadowfix toolchain.
//!
//! This crate provides the first stage of the shadow-fix pipeline:
//!
//! - [`SourceFile`]: an immutable snapshot of a file and its lines
//! - [`scan_lines`]: a minimal tokenizer tracking brace depth and string
//!   literal boundaries, used instead of per-line regular expressions
//! - [`index_blocks`]: the style-block indexer producing an ordered,
//!   disjoint [`StyleIndex`]
//!
//! # Example
//!
//! ```
//! use shadowfix_syntax::{SourceFile, index_blocks};
//!
//! let source = SourceFile::new(
//!     "Card.tsx",
//!     "card: {\n  shadowColor: '#000',\n  shadowOpacity: 0.1,\n},\n",
//! );
//! let index = index_blocks(&source)?;
//! let block = &index.blocks()[0];
//! assert_eq!(block.name(), "card");
//! assert_eq!((block.start_line(), block.end_line()), (0, 3));
//! # Ok::<(), shadowfix_syntax::SyntaxError>(())
//! ```

mod error;
mod index;
mod scanner;
mod source;

pub use error::SyntaxError;
pub use index::{StyleBlock, StyleIndex, index_blocks};
pub use scanner::{PropertyKey, ScannedLine, StringLiteral, scan_lines};
pub use source::{LineEnding, SourceFile};

#[cfg(test)]
mod tests;
