//! Identifier casing, role renames and small text helpers.

use crate::config::Rename;
use regex::Regex;
use std::sync::LazyLock;

static RE_UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z])").unwrap());

/// `gaussian_blur` → `gaussianBlur`. Later components are title-cased, so
/// `mean_3D` becomes `mean3d`.
pub fn snake_to_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// `gaussianBlur` → `gaussian_blur`: every capital becomes `_` + lowercase.
pub fn camel_to_snake(name: &str) -> String {
    RE_UPPER.replace_all(name, "_$1").to_lowercase()
}

/// Apply the first matching prefix rename (`src0` → `input0`).
pub fn rename_param(name: &str, renames: &[Rename]) -> String {
    renames
        .iter()
        .find_map(|r| name.strip_prefix(r.from.as_str()).map(|rest| format!("{}{rest}", r.to)))
        .unwrap_or_else(|| name.to_string())
}

/// Substitute `{key}` placeholders.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Substitute `{tier}`.
pub fn fill_tier(template: &str, tier: u32) -> String {
    fill(template, &[("tier", tier.to_string().as_str())])
}

/// Substitute `{tier}` and `{name}`.
pub fn fill_call(template: &str, tier: u32, name: &str) -> String {
    fill(template, &[("tier", tier.to_string().as_str()), ("name", name)])
}

/// Greedy word wrap; words longer than `width` are never broken.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
