//! Style property vocabulary and per-block facts.

use shadowfix_syntax::{ScannedLine, StringLiteral, StyleBlock, StyleIndex};

/// Cross-platform shadow properties.
pub const SHADOW_KEYS: [&str; 4] = ["shadowColor", "shadowOffset", "shadowOpacity", "shadowRadius"];

/// The Android shadow analogue.
pub const ELEVATION_KEY: &str = "elevation";

/// The property that makes a shadow renderable.
pub const BACKGROUND_KEY: &str = "backgroundColor";

/// Literal value that defeats a shadow.
pub const TRANSPARENT: &str = "transparent";

pub(crate) fn is_shadow_key(name: &str) -> bool {
    SHADOW_KEYS.contains(&name)
}

/// Whether the line declares any shadow or elevation property.
pub(crate) fn casts_shadow(line: &ScannedLine) -> bool {
    line.keys()
        .iter()
        .any(|key| is_shadow_key(key.name()) || key.name() == ELEVATION_KEY)
}

/// The literal assigned to `backgroundColor` on `line` when it is
/// `'transparent'`.
pub(crate) fn transparent_background(line: &ScannedLine) -> Option<&StringLiteral> {
    let key = line.key(BACKGROUND_KEY)?;
    line.literal_at(key.value_start())
        .filter(|literal| literal.content() == TRANSPARENT)
}

/// What a style block declares, looking only at its own line range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BlockFacts {
    pub(crate) shadow: bool,
    pub(crate) elevation: bool,
    pub(crate) background: Option<usize>,
    pub(crate) transparent_background: Option<usize>,
}

impl BlockFacts {
    pub(crate) fn collect(index: &StyleIndex, block: &StyleBlock) -> Self {
        let mut facts = Self::default();
        for line_number in block.lines() {
            let Some(line) = index.line(line_number) else {
                continue;
            };
            for key in line.keys() {
                match key.name() {
                    name if is_shadow_key(name) => facts.shadow = true,
                    ELEVATION_KEY => facts.elevation = true,
                    BACKGROUND_KEY => {
                        facts.background.get_or_insert(line_number);
                    }
                    _ => {}
                }
            }
            if facts.transparent_background.is_none() && transparent_background(line).is_some() {
                facts.transparent_background = Some(line_number);
            }
        }
        facts
    }

    pub(crate) const fn casts_shadow(&self) -> bool {
        self.shadow || self.elevation
    }
}

#[cfg(test)]
mod tests {
    use shadowfix_syntax::{SourceFile, index_blocks};

    use super::*;

    #[test]
    fn collects_facts_from_nested_lines() {
        let source = SourceFile::new(
            "a.ts",
            "card: {\n  shadowOffset: { width: 0, height: 2 },\n  backgroundColor: 'transparent',\n},\n",
        );
        let index = index_blocks(&source).expect("index");
        let block = index.get("card").expect("card");

        let facts = BlockFacts::collect(&index, block);

        assert!(facts.shadow);
        assert!(!facts.elevation);
        assert_eq!(facts.background, Some(2));
        assert_eq!(facts.transparent_background, Some(2));
    }

    #[test]
    fn ignores_keys_in_comments() {
        let source = SourceFile::new("a.ts", "card: {\n  // elevation: 2,\n  flex: 1,\n},\n");
        let index = index_blocks(&source).expect("index");
        let block = index.get("card").expect("card");

        assert!(!BlockFacts::collect(&index, block).casts_shadow());
    }
}
