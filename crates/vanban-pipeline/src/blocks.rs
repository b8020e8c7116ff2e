//! Block building.
//!
//! Converts the ordered boundary list into a lossless partition of the
//! normalized body: block i spans from its boundary to the next
//! boundary, the last block runs to the end, and any text before the
//! first boundary becomes a preamble block. Contents are exact
//! substrings; concatenating them in index order reproduces the body.

use vanban_core::{Boundary, BoundaryKind, ContentBlock};

/// Partition `text` along `boundaries` (ordered by start offset).
pub(crate) fn build_blocks(text: &str, boundaries: &[Boundary]) -> Vec<ContentBlock> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::with_capacity(boundaries.len() + 1);

    let first_start = boundaries.first().map_or(text.len(), |b| b.start_offset);
    if first_start > 0 && !text[..first_start].trim().is_empty() {
        // Header/basis text before the first structural marker.
        blocks.push(ContentBlock {
            index: 0,
            boundary: Boundary {
                kind: BoundaryKind::Basis,
                start_offset: 0,
                label: "Căn cứ".to_string(),
            },
            content: text[..first_start].to_string(),
        });
    }

    for (i, boundary) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(i + 1)
            .map_or(text.len(), |next| next.start_offset);
        let index = blocks.len();
        blocks.push(ContentBlock {
            index,
            boundary: boundary.clone(),
            content: text[boundary.start_offset..end].to_string(),
        });
    }

    // No boundary and a non-empty preamble already covers the whole
    // body; with neither, the document yields zero blocks.
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(kind: BoundaryKind, start_offset: usize, label: &str) -> Boundary {
        Boundary {
            kind,
            start_offset,
            label: label.to_string(),
        }
    }

    #[test]
    fn partition_reconstructs_body_exactly() {
        let text = "phần mở đầu\nĐiều 1. Một\nnội dung\nĐiều 2. Hai\nkết";
        let d1 = text.find("Điều 1").unwrap();
        let d2 = text.find("Điều 2").unwrap();
        let blocks = build_blocks(
            text,
            &[
                boundary(BoundaryKind::Article, d1, "Điều 1"),
                boundary(BoundaryKind::Article, d2, "Điều 2"),
            ],
        );
        assert_eq!(blocks.len(), 3);
        let rebuilt: String = blocks.iter().map(|b| b.content.as_str()).collect();
        assert_eq!(rebuilt, text);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn preamble_block_gets_basis_boundary() {
        let text = "Căn cứ Luật Giáo dục;\nĐiều 1. Một";
        let d1 = text.find("Điều 1").unwrap();
        let blocks = build_blocks(text, &[boundary(BoundaryKind::Article, d1, "Điều 1")]);
        assert_eq!(blocks[0].boundary.kind, BoundaryKind::Basis);
        assert_eq!(blocks[0].boundary.label, "Căn cứ");
        assert_eq!(blocks[0].content, "Căn cứ Luật Giáo dục;\n");
    }

    #[test]
    fn whitespace_only_preamble_is_dropped() {
        let text = "\nĐiều 1. Một";
        let blocks = build_blocks(text, &[boundary(BoundaryKind::Article, 1, "Điều 1")]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].index, 0);
        assert_eq!(blocks[0].boundary.label, "Điều 1");
    }

    #[test]
    fn last_block_runs_to_end() {
        let text = "Điều 1. Một\ncuối cùng";
        let blocks = build_blocks(text, &[boundary(BoundaryKind::Article, 0, "Điều 1")]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, text);
    }

    #[test]
    fn no_boundaries_and_content_yields_single_preamble() {
        let text = "chỉ có văn xuôi, không có cấu trúc";
        let blocks = build_blocks(text, &[]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, text);
    }

    #[test]
    fn empty_text_yields_zero_blocks() {
        assert!(build_blocks("", &[]).is_empty());
    }
}
