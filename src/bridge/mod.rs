//! Legacy bridge: snake_case delegating methods spliced into an existing
//! class between two marker comments.
//!
//! Methods are built from descriptors (the managed signatures they delegate
//! to) or, for classes generated elsewhere, scanned from managed source text.
//! Both paths produce the same [`BridgeMethod`] list.

pub mod scan;

use crate::config::{BridgeConfig, SurfaceConfig};
use crate::error::{Error, Result};
use crate::mapping::TypeMapper;
use crate::model::FunctionDesc;
use crate::render::doc::Doc;
use crate::render::naming::{camel_to_snake, fill_tier, snake_to_camel};
use crate::render::signature::Signature;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeParam {
    pub ty: String,
    pub name: String,
}

/// A managed method the bridge delegates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeMethod {
    pub tier: u32,
    /// camelCase managed method name
    pub method: String,
    pub return_type: String,
    /// Managed parameters, context argument included
    pub params: Vec<BridgeParam>,
}

/// Managed signatures of `funcs`, as the managed surface declares them.
pub fn from_descriptors(
    tier: u32,
    funcs: &[FunctionDesc],
    managed: &SurfaceConfig,
) -> Vec<BridgeMethod> {
    let mapper = TypeMapper::new(managed.mapper.clone());
    let mut warnings = Vec::new();
    funcs
        .iter()
        .map(|func| {
            let sig = Signature::build(func, managed, &mapper, "managed", &mut warnings);
            BridgeMethod {
                tier,
                method: snake_to_camel(&sig.name),
                return_type: sig.ret.target.clone(),
                params: sig
                    .declared()
                    .map(|a| BridgeParam {
                        ty: a.mapping.target.clone(),
                        name: a.ident.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Render the delegating methods, one indentation level deep.
pub fn render(methods: &[BridgeMethod], config: &BridgeConfig) -> String {
    let mut body = Doc::new();
    for (i, m) in methods.iter().enumerate() {
        if i > 0 {
            body.push_blank();
        }
        body.push_doc(render_method(m, config));
    }
    Doc::new().nest(body).render(&config.indent)
}

fn render_method(m: &BridgeMethod, config: &BridgeConfig) -> Doc {
    let mut definitions = Vec::new();
    let mut values = vec![config.context_arg.clone()];
    // the first managed parameter is the context the legacy class supplies
    for p in m.params.iter().skip(1) {
        if p.ty == config.handle_type {
            definitions.push(format!("{} {}", config.object_type, p.name));
            values.push(format!("{}({})", config.stage_helper, p.name));
        } else {
            definitions.push(format!("{} {}", p.ty, p.name));
            values.push(p.name.clone());
        }
    }

    let class = fill_tier(&config.tier_class, m.tier);
    let call = format!("{class}.{}({})", m.method, values.join(", "));
    let statement = if m.return_type == "void" {
        format!("{call};")
    } else {
        format!("return {call};")
    };

    Doc::new()
        .line(format!(
            "public {} {}({}) {{",
            m.return_type,
            camel_to_snake(&m.method),
            definitions.join(", ")
        ))
        .nest(Doc::new().line(statement))
        .line("}")
}

/// Replace everything between the markers with `block`.
///
/// The begin marker's line is kept up to the marker, the end marker's line is
/// kept whole. Splicing the same block twice gives the same text.
pub fn splice(content: &str, block: &str, config: &BridgeConfig) -> Result<String> {
    let missing = |marker: &str| Error::SpliceMarker {
        marker: marker.to_string(),
    };
    let begin = content
        .find(&config.begin_marker)
        .ok_or_else(|| missing(&config.begin_marker))?;
    let after_begin = begin + config.begin_marker.len();
    let end = content[after_begin..]
        .find(&config.end_marker)
        .map(|i| after_begin + i)
        .ok_or_else(|| missing(&config.end_marker))?;
    let end_line = content[after_begin..end]
        .rfind('\n')
        .map(|i| after_begin + i + 1)
        .unwrap_or(end);

    let block = block.trim_matches('\n');
    let mut out = String::with_capacity(content.len() + block.len());
    out.push_str(&content[..after_begin]);
    out.push('\n');
    if !block.is_empty() {
        out.push_str(block);
        out.push('\n');
    }
    out.push_str(&content[end_line..]);
    Ok(out)
}
