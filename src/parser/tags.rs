//! Tag tokenizer for a single annotation block.
//!
//! Strips the comment gutter, then splits the block into `@tag body` tokens.
//! A tag starts only where a comment line begins with a known `@tag` word; its
//! body runs until the next tag, with whitespace (including line breaks)
//! collapsed to single spaces. Any other `@word` (`@ref`, `@p`, `@todo`) is
//! body text.

/// Recognized tag kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Name,
    Brief,
    Priority,
    Category,
    See,
    Return,
    Param,
    Deprecated,
    Namespace,
}

impl TagKind {
    fn from_word(word: &str) -> Option<Self> {
        let kind = match word {
            "name" => TagKind::Name,
            "brief" => TagKind::Brief,
            "priority" => TagKind::Priority,
            "note" | "category" => TagKind::Category,
            "see" | "link" => TagKind::See,
            "return" | "returns" => TagKind::Return,
            "param" => TagKind::Param,
            "deprecated" => TagKind::Deprecated,
            "namespace" => TagKind::Namespace,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub body: String,
    /// 0-based line within the block
    pub line: usize,
}

/// Tokenize a block body into tags. Text before the first tag is dropped.
pub fn tokenize(block: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();

    for (line_no, raw) in block.lines().enumerate() {
        let mut words = strip_gutter(raw).split_whitespace().peekable();
        if let Some(kind) = words.peek().and_then(|w| tag_word(w)) {
            words.next();
            tags.push(Tag {
                kind,
                body: String::new(),
                line: line_no,
            });
        }
        for word in words {
            if let Some(current) = tags.last_mut() {
                if !current.body.is_empty() {
                    current.body.push(' ');
                }
                current.body.push_str(word);
            }
        }
    }

    tags
}

/// `@word` → its kind, when the word is a known tag.
fn tag_word(word: &str) -> Option<TagKind> {
    TagKind::from_word(word.strip_prefix('@')?)
}

/// Remove leading whitespace and the `*` gutter of a comment line.
fn strip_gutter(line: &str) -> &str {
    line.trim_start().trim_start_matches('*').trim()
}
