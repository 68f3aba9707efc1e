//! In-memory patch application.
//!
//! Patches are validated against the current snapshot and applied in
//! descending line order, so every patch still sees the line numbers of the
//! snapshot it was planned against.

use shadowfix_syntax::SourceFile;

use crate::edit::RewritePatch;
use crate::error::HarnessError;

/// Renders the text of `current` with `patches` applied.
///
/// # Errors
///
/// Returns [`HarnessError::ConflictingPatches`] when two patches target the
/// same line and [`HarnessError::StalePatch`] when a patch's recorded text no
/// longer matches the corresponding line of `current`.
pub fn apply_patches(
    current: &SourceFile,
    patches: &[RewritePatch],
) -> Result<String, HarnessError> {
    let mut ordered: Vec<&RewritePatch> = patches.iter().collect();
    ordered.sort_by_key(|patch| std::cmp::Reverse(patch.target_line()));

    for pair in ordered.windows(2) {
        if let [later, earlier] = pair
            && later.target_line() == earlier.target_line()
        {
            return Err(HarnessError::ConflictingPatches {
                path: current.path().to_path_buf(),
                line: later.display_line(),
            });
        }
    }

    let mut lines: Vec<String> = current.lines().to_vec();
    for patch in ordered {
        let target = patch.target_line();
        let found = lines.get(target);
        if found.map(String::as_str) != Some(patch.original_text()) {
            return Err(HarnessError::StalePatch {
                path: current.path().to_path_buf(),
                line: patch.display_line(),
                expected: patch.original_text().to_owned(),
                found: found.cloned(),
            });
        }
        let replacement = patch
            .replacement_text()
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned());
        lines.splice(target..=target, replacement);
    }

    Ok(current.render(&lines))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn sheet() -> SourceFile {
        SourceFile::new(
            "Card.tsx",
            "const styles = StyleSheet.create({\n  card: {\n    shadowRadius: 2,\n  },\n});\n",
        )
    }

    #[test]
    fn applies_patches_in_descending_order() {
        let patches = [
            RewritePatch::insert_after(0, "const styles = StyleSheet.create({", "  box: {},"),
            RewritePatch::insert_after(1, "  card: {", "    backgroundColor: 'white',"),
        ];

        let text = apply_patches(&sheet(), &patches).expect("apply");
        assert_eq!(
            text,
            concat!(
                "const styles = StyleSheet.create({\n",
                "  box: {},\n",
                "  card: {\n",
                "    backgroundColor: 'white',\n",
                "    shadowRadius: 2,\n",
                "  },\n",
                "});\n",
            )
        );
    }

    #[test]
    fn preserves_crlf_endings() {
        let source = SourceFile::new("a.ts", "x: {\r\n},\r\n");
        let patch = RewritePatch::insert_after(0, "x: {", "  y: 1,");
        let text = apply_patches(&source, &[patch]).expect("apply");
        assert_eq!(text, "x: {\r\n  y: 1,\r\n},\r\n");
    }

    #[rstest]
    #[case(1, "  cards: {")]
    #[case(9, "  card: {")]
    fn rejects_stale_patches(#[case] line: usize, #[case] original: &str) {
        let patch = RewritePatch::replace(line, original, "anything");
        let error = apply_patches(&sheet(), &[patch]).expect_err("stale");
        assert!(matches!(error, HarnessError::StalePatch { .. }));
    }

    #[test]
    fn rejects_duplicate_targets() {
        let patches = [
            RewritePatch::replace(1, "  card: {", "  card: { "),
            RewritePatch::replace(1, "  card: {", "  card:{"),
        ];
        let error = apply_patches(&sheet(), &patches).expect_err("conflict");
        assert!(matches!(
            error,
            HarnessError::ConflictingPatches { line: 2, .. }
        ));
    }
}
