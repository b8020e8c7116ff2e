//! Canonical markdown serialization.
//!
//! Each block renders as a `## Metadata` section with fixed field
//! order, then a `## Nội dung` section holding the verbatim content.
//! Blocks are joined by a `---` separator line, strictly in index
//! order; this form feeds both display and persistence.

use vanban_core::MetadataBlock;

/// Render one block.
pub fn render_block(block: &MetadataBlock) -> String {
    format!(
        "## Metadata\n\
         - **doc_id:** {}\n\
         - **department:** {}\n\
         - **type_data:** {}\n\
         - **category:** {}\n\
         - **date:** {}\n\
         - **source:** {}\n\
         \n\
         ## Nội dung\n\
         \n\
         {}",
        block.doc_id,
        block.department,
        block.type_data,
        block.category,
        block.date,
        block.source,
        block.content.trim()
    )
}

/// Render the whole document, blocks in index order.
pub fn render_document(blocks: &[MetadataBlock]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
