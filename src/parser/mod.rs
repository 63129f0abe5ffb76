//! Annotation parser: header text to function descriptors.

pub mod extract;
pub mod param;
pub mod tags;

use crate::config::{EmptyTierPolicy, ParseConfig};
use crate::error::{Error, Result, Warning};
use crate::model::{FunctionDesc, ParamDesc};
use tags::{Tag, TagKind};

/// Parse every documented function of a tier header.
///
/// Fails on the first block that breaks the grammar, so a broken tier never
/// yields a partial function list.
pub fn parse_header(
    code: &str,
    config: &ParseConfig,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<FunctionDesc>> {
    let blocks = extract::extract_blocks(code, &config.namespace_tag)?;
    if blocks.is_empty() && config.empty_tier == EmptyTierPolicy::Reject {
        return Err(Error::malformed(1, "header documents no functions"));
    }

    blocks
        .iter()
        .map(|block| parse_block(block.text, warnings).map_err(|e| e.at_line(block.line)))
        .collect()
}

/// Parse one block body into a descriptor.
pub fn parse_block(block: &str, warnings: &mut Vec<Warning>) -> Result<FunctionDesc> {
    let tags = tags::tokenize(block);
    let name = single_name(&tags)?;

    let mut func = FunctionDesc {
        name,
        ..Default::default()
    };
    let mut brief: Option<String> = None;

    for tag in &tags {
        match tag.kind {
            TagKind::Name | TagKind::Namespace => {}
            TagKind::Brief => set_once(&mut brief, tag, &func.name),
            TagKind::Priority => set_first(&mut func.priority, tag, &func.name),
            TagKind::Category => set_first(&mut func.category, tag, &func.name),
            TagKind::Return => set_first(&mut func.return_type, tag, &func.name),
            TagKind::See => func.see.push(tag.body.clone()),
            TagKind::Deprecated => {
                if func.deprecation.is_none() {
                    func.deprecation = Some(tag.body.clone());
                }
            }
            TagKind::Param => func.params.push(parse_param_tag(tag)?),
        }
    }

    match brief {
        Some(text) if !text.is_empty() => func.brief = text,
        _ => {
            tracing::warn!(function = %func.name, "no brief found");
            warnings.push(Warning::MissingBrief {
                function: func.name.clone(),
            });
        }
    }

    Ok(func)
}

fn single_name(tags: &[Tag]) -> Result<String> {
    let mut names = tags.iter().filter(|t| t.kind == TagKind::Name);
    let first = names.next().ok_or(Error::MissingTag { tag: "name", line: 0 })?;
    if let Some(dup) = names.next() {
        return Err(Error::malformed(
            dup.line,
            format!("second @name `{}` after `{}`", dup.body, first.body),
        ));
    }
    if first.body.is_empty() {
        return Err(Error::MissingTag {
            tag: "name",
            line: first.line,
        });
    }
    Ok(first.body.clone())
}

fn parse_param_tag(tag: &Tag) -> Result<ParamDesc> {
    param::parse_param(&tag.body).map_err(|e| Error::malformed(tag.line, e.reason()))
}

fn set_first(slot: &mut String, tag: &Tag, function: &str) {
    if slot.is_empty() {
        *slot = tag.body.clone();
    } else {
        tracing::debug!(function, tag = ?tag.kind, "ignoring repeated tag");
    }
}

fn set_once(slot: &mut Option<String>, tag: &Tag, function: &str) {
    if slot.is_none() {
        *slot = Some(tag.body.clone());
    } else {
        tracing::debug!(function, tag = ?tag.kind, "ignoring repeated tag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSOLUTE: &str = r#"
 * @name absolute
 * @priority 1
 * @brief Computes the absolute value of every individual pixel x in a given
 *        image.
 *
 * @param device Device to perform the operation on. [const Device::Pointer &]
 * @param src The input image to be processed. [const Array::Pointer &]
 * @param dst The output image where results are written into. [Array::Pointer ( = None )]
 * @return Array::Pointer
 *
 * @note 'filter', 'in assistant'
 * @see https://clij.github.io/clij2-docs/reference_absolute
 "#;

    #[test]
    fn parse_full_block() {
        let mut warnings = Vec::new();
        let func = parse_block(ABSOLUTE, &mut warnings).unwrap();
        assert_eq!(func.name, "absolute");
        assert_eq!(func.priority, "1");
        assert_eq!(func.category, "'filter', 'in assistant'");
        assert_eq!(func.return_type, "Array::Pointer");
        assert_eq!(
            func.brief,
            "Computes the absolute value of every individual pixel x in a given image."
        );
        assert_eq!(func.see, vec!["https://clij.github.io/clij2-docs/reference_absolute"]);
        let names: Vec<_> = func.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["device", "src", "dst"]);
        assert_eq!(func.params[2].default_value, "None");
        assert!(func.deprecation.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn synthetic_round_trip() {
        let block = "@name foo\n@brief Does X.\n@param src the input [Array::Pointer]\n\
                     @param value scale [float (default is 1.0)]\n@return Array::Pointer";
        let func = parse_block(block, &mut Vec::new()).unwrap();
        assert_eq!(func.name, "foo");
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[0].name, "src");
        assert_eq!(func.params[0].ty, "Array::Pointer");
        assert_eq!(func.params[0].default_value, "");
        assert_eq!(func.params[1].name, "value");
        assert_eq!(func.params[1].ty, "float");
        assert_eq!(func.params[1].default_value, "1.0");
    }

    #[test]
    fn inline_at_words_do_not_cut_brief_or_param() {
        let func = parse_block(
            "@name a\n@brief Registers via @plugin_function and keeps the rest.\n@param x d [int]",
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(func.brief, "Registers via @plugin_function and keeps the rest.");
        assert_eq!(func.params[0].ty, "int");

        let func = parse_block(
            "@name a\n@brief B.\n@param src Image, see @ref blur. [const Array::Pointer &]",
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(func.params[0].name, "src");
        assert_eq!(func.params[0].description, "Image, see @ref blur.");
        assert_eq!(func.params[0].ty, "const Array::Pointer &");
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_block(ABSOLUTE, &mut Vec::new()).unwrap();
        let b = parse_block(ABSOLUTE, &mut Vec::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_name_is_fatal() {
        let err = parse_block("@brief nameless", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MissingTag { tag: "name", .. }));
    }

    #[test]
    fn duplicate_name_is_malformed() {
        let err = parse_block("@name a\n@name b", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn missing_brief_is_a_warning() {
        let mut warnings = Vec::new();
        let func = parse_block("@name quiet\n@return float", &mut warnings).unwrap();
        assert_eq!(func.brief, "");
        assert_eq!(
            warnings,
            vec![Warning::MissingBrief {
                function: "quiet".to_string()
            }]
        );
    }

    #[test]
    fn deprecation_with_and_without_message() {
        let func =
            parse_block("@name a\n@brief b.\n@deprecated use c instead", &mut Vec::new()).unwrap();
        assert_eq!(func.deprecation.as_deref(), Some("use c instead"));
        let func = parse_block("@name a\n@brief b.\n@deprecated", &mut Vec::new()).unwrap();
        assert_eq!(func.deprecation.as_deref(), Some(""));
    }

    #[test]
    fn header_errors_point_at_header_lines() {
        let code = "/** @namespace x */\n\n/**\n * @name a\n * @param x d [float\n */\n";
        let err = parse_header(code, &ParseConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 5, .. }), "{err:?}");
    }

    #[test]
    fn empty_tier_policy() {
        let code = "/** @namespace cle::tier9 */\n";
        let accept = ParseConfig::default();
        assert!(parse_header(code, &accept, &mut Vec::new()).unwrap().is_empty());

        let reject = ParseConfig {
            empty_tier: EmptyTierPolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            parse_header(code, &reject, &mut Vec::new()),
            Err(Error::MalformedInput { .. })
        ));
    }
}
