//! Indentation-aware document tree used by every emitter.
//!
//! Emitters describe output as lines and nested blocks; indentation is applied
//! once, at render time, so no template carries hard-coded leading spaces.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// One or more lines at the current level
    Text(String),
    Blank,
    Nest(Doc),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
    nodes: Vec<Node>,
}

impl Doc {
    pub fn new() -> Self {
        Doc::default()
    }

    /// Append text; embedded newlines become separate lines at this level.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.push_line(text);
        self
    }

    pub fn push_line(&mut self, text: impl Into<String>) {
        self.nodes.push(Node::Text(text.into()));
    }

    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    pub fn push_blank(&mut self) {
        self.nodes.push(Node::Blank);
    }

    /// Append `inner` one indentation level deeper.
    pub fn nest(mut self, inner: Doc) -> Self {
        self.push_nest(inner);
        self
    }

    pub fn push_nest(&mut self, inner: Doc) {
        self.nodes.push(Node::Nest(inner));
    }

    /// Append `other` at the same level.
    pub fn append(mut self, other: Doc) -> Self {
        self.push_doc(other);
        self
    }

    pub fn push_doc(&mut self, other: Doc) {
        self.nodes.extend(other.nodes);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render with `unit` as one indentation step. Every line ends with `\n`;
    /// blank lines carry no trailing whitespace.
    pub fn render(&self, unit: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, unit, 0);
        out
    }

    fn render_into(&self, out: &mut String, unit: &str, depth: usize) {
        for node in &self.nodes {
            match node {
                Node::Text(text) => {
                    for line in text.split('\n') {
                        if !line.trim().is_empty() {
                            out.push_str(&unit.repeat(depth));
                            out.push_str(line);
                        }
                        out.push('\n');
                    }
                }
                Node::Blank => out.push('\n'),
                Node::Nest(inner) => inner.render_into(out, unit, depth + 1),
            }
        }
    }
}
