//! Annotation extractor: isolates `/** ... */` blocks from a header.

use crate::error::{Error, Result};

const OPEN: &str = "/**";
const CLOSE: &str = "*/";

/// Raw text of one structured comment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Text strictly between the delimiters
    pub text: &'a str,
    /// 1-based header line of the opening delimiter
    pub line: usize,
}

/// Extract every annotation block in source order.
///
/// The first block is dropped when it carries `@<namespace_tag>`: it documents
/// the file, not a function. Fails when the header has no block at all or a
/// block is never closed.
pub fn extract_blocks<'a>(code: &'a str, namespace_tag: &str) -> Result<Vec<Block<'a>>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(found) = code[cursor..].find(OPEN) {
        let start = cursor + found;
        let body_start = start + OPEN.len();
        let line = line_of(code, start);
        let Some(len) = code[body_start..].find(CLOSE) else {
            return Err(Error::malformed(line, "unterminated `/**` block"));
        };
        blocks.push(Block {
            text: &code[body_start..body_start + len],
            line,
        });
        cursor = body_start + len + CLOSE.len();
    }

    if blocks.is_empty() {
        return Err(Error::malformed(1, "no annotation blocks found"));
    }

    let marker = format!("@{namespace_tag}");
    if blocks[0].text.contains(&marker) {
        blocks.remove(0);
    }
    Ok(blocks)
}

fn line_of(code: &str, offset: usize) -> usize {
    code[..offset].matches('\n').count() + 1
}
