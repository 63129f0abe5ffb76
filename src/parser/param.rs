//! `@param` body grammar.
//!
//! ```text
//! param   := NAME DESCRIPTION? bracket?
//! bracket := '[' TYPE group? ']'
//! group   := '(' MARKER MARKER DEFAULT ... ')'
//! ```
//!
//! `DEFAULT` is positional: the third whitespace token of the group, counting
//! the opening parenthesis when it stands alone (`( = None )`) and stripping
//! the closing one when it is glued on (`(default is 1.0)`).

use crate::model::ParamDesc;

/// Grammar failure inside a parameter body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    MissingName,
    UnclosedBracket(String),
    UnclosedGroup(String),
    ShortGroup(String),
}

impl ParamError {
    pub fn reason(&self) -> String {
        match self {
            ParamError::MissingName => "@param without a name".to_string(),
            ParamError::UnclosedBracket(name) => format!("@param {name}: unclosed `[`"),
            ParamError::UnclosedGroup(name) => format!("@param {name}: unclosed `(`"),
            ParamError::ShortGroup(name) => {
                format!("@param {name}: default group needs a marker and a value")
            }
        }
    }
}

/// Parse one `@param` body (the text after the tag).
pub fn parse_param(body: &str) -> Result<ParamDesc, ParamError> {
    let body = body.trim();
    let name = body
        .split_whitespace()
        .next()
        .ok_or(ParamError::MissingName)?
        .to_string();
    let rest = &body[name.len()..];

    let Some(open) = rest.find('[') else {
        return Ok(ParamDesc {
            description: rest.trim().to_string(),
            name,
            ..Default::default()
        });
    };
    let description = rest[..open].trim().to_string();
    let inner_start = open + 1;
    let close = rest[inner_start..]
        .find(']')
        .ok_or_else(|| ParamError::UnclosedBracket(name.clone()))?;
    let inner = &rest[inner_start..inner_start + close];

    let (ty, default_value) = match inner.find('(') {
        None => (inner.trim().to_string(), String::new()),
        Some(paren) => {
            let group_end = inner
                .rfind(')')
                .filter(|end| *end > paren)
                .ok_or_else(|| ParamError::UnclosedGroup(name.clone()))?;
            let group = &inner[paren..=group_end];
            let token = group
                .split_whitespace()
                .nth(2)
                .ok_or_else(|| ParamError::ShortGroup(name.clone()))?;
            let value = token.strip_suffix(')').unwrap_or(token);
            (inner[..paren].trim().to_string(), value.to_string())
        }
    };

    Ok(ParamDesc {
        name,
        ty,
        default_value,
        description,
    })
}
