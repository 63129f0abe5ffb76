//! Language-agnostic description of documented kernel functions.

use serde::Serialize;

/// Default token meaning "optional, defaults to absence of value".
pub const NONE_SENTINEL: &str = "None";

/// One tier header, parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub index: u32,
    pub functions: Vec<FunctionDesc>,
}

/// A single documented function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionDesc {
    /// @name
    pub name: String,
    /// @priority (empty when absent)
    pub priority: String,
    /// @note / @category (empty when absent)
    pub category: String,
    /// @see / @link entries, in source order
    pub see: Vec<String>,
    /// @return (empty for void-like functions)
    pub return_type: String,
    /// @param entries, in source order
    pub params: Vec<ParamDesc>,
    /// @brief
    pub brief: String,
    /// @deprecated, with its message (possibly empty)
    pub deprecation: Option<String>,
}

impl FunctionDesc {
    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    /// Brief split into sentences, one per documentation line.
    pub fn brief_sentences(&self) -> Vec<&str> {
        split_sentences(&self.brief)
    }
}

/// Parsed @param entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamDesc {
    pub name: String,
    /// Source type, qualifiers included (e.g. `const Array::Pointer &`)
    #[serde(rename = "type")]
    pub ty: String,
    /// Empty when required
    pub default_value: String,
    pub description: String,
}

impl ParamDesc {
    pub fn is_required(&self) -> bool {
        self.default_value.is_empty()
    }

    /// Defaults to absence of value.
    pub fn is_optional(&self) -> bool {
        self.default_value == NONE_SENTINEL
    }
}

/// Split text after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        let ends = matches!(b, b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_some_and(|n| n.is_ascii_whitespace());
        if ends {
            let sentence = text[start..=i].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = i + 1;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}
