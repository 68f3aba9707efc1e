//! Indexer tests over realistic style sheets.

use rstest::{fixture, rstest};

use crate::{SourceFile, StyleBlock, SyntaxError, index_blocks};

#[fixture]
fn style_sheet() -> SourceFile {
    SourceFile::new(
        "TeamCard.tsx",
        r"import { StyleSheet } from 'react-native';

export function TeamCard({ team }) {
  return <View style={[styles.dot, { backgroundColor: team.color }]} />;
}

const styles = StyleSheet.create({
  card: {
    shadowColor: '#000',
    shadowOffset: { width: 0, height: 2 },
    shadowOpacity: 0.1,
  },
  dot: { width: 8, height: 8 },
  badge: {
    elevation: 3,
    transform: [{ scale: 1 }],
  },
});
",
    )
}

#[rstest]
fn blocks_are_ordered_disjoint_and_named(style_sheet: SourceFile) {
    let index = index_blocks(&style_sheet).expect("index");
    let blocks = index.blocks();

    let names: Vec<_> = blocks.iter().map(StyleBlock::name).collect();
    assert_eq!(names, vec!["card", "dot", "badge"]);

    for block in blocks {
        assert!(block.start_line() <= block.end_line());
        let opening = style_sheet.line(block.start_line()).expect("opening line");
        assert!(opening.trim_start().starts_with(block.name()));
    }
    for pair in blocks.windows(2) {
        if let [previous, next] = pair {
            assert!(previous.end_line() < next.start_line());
        }
    }
}

#[rstest]
fn nested_literals_belong_to_outer_block(style_sheet: SourceFile) {
    let index = index_blocks(&style_sheet).expect("index");
    let offset_line = style_sheet
        .lines()
        .iter()
        .position(|line| line.contains("shadowOffset"))
        .expect("shadowOffset line");

    assert_eq!(index.owner_of(offset_line).map(StyleBlock::name), Some("card"));
    assert!(index.get("shadowOffset").is_none());
}

#[rstest]
fn single_line_blocks_start_and_end_together(style_sheet: SourceFile) {
    let index = index_blocks(&style_sheet).expect("index");
    let dot = index.get("dot").expect("dot block");
    assert_eq!(dot.start_line(), dot.end_line());
}

#[test]
fn unterminated_block_is_reported() {
    let source = SourceFile::new("Broken.tsx", "const s = {\n  card: {\n    elevation: 2,\n");
    let error = index_blocks(&source).expect_err("unterminated");
    match error {
        SyntaxError::UnterminatedBlock { name, line } => {
            assert_eq!(name, "card");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn braces_inside_strings_do_not_close_blocks() {
    let source = SourceFile::new(
        "Label.tsx",
        "label: {\n  content: '}',\n  fontSize: 12,\n},\n",
    );
    let index = index_blocks(&source).expect("index");
    let label = index.get("label").expect("label");
    assert_eq!(label.end_line(), 3);
}

#[test]
fn empty_file_has_no_blocks() {
    let index = index_blocks(&SourceFile::new("Empty.tsx", "")).expect("index");
    assert!(index.blocks().is_empty());
    assert!(index.lines().is_empty());
}

#[test]
fn closing_line_may_open_the_next_block() {
    let source = SourceFile::new(
        "Compact.tsx",
        "const styles = StyleSheet.create({\n  a: {\n    flex: 1,\n  }, card: {\n    shadowColor: '#000',\n  },\n});\n",
    );
    let index = index_blocks(&source).expect("index");

    let spans: Vec<_> = index
        .blocks()
        .iter()
        .map(|block| (block.name(), block.start_line(), block.end_line()))
        .collect();
    assert_eq!(spans, vec![("a", 1, 2), ("card", 3, 5)]);
}

#[test]
fn jsx_prose_with_apostrophes_indexes_cleanly() {
    let source = SourceFile::new(
        "Promo.tsx",
        concat!(
            "export const Promo = ({ count }) => (\n",
            "  <Text>\n",
            "    Don't miss {\n",
            "      count\n",
            "    } games\n",
            "  </Text>\n",
            ");\n",
            "const styles = StyleSheet.create({\n",
            "  card: {\n",
            "    elevation: 2,\n",
            "  },\n",
            "});\n",
        ),
    );
    let index = index_blocks(&source).expect("index");
    assert_eq!(index.get("card").map(StyleBlock::start_line), Some(8));
}
