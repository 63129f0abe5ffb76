//! Recover bridge methods from managed class source text.

use super::{BridgeMethod, BridgeParam};
use regex::Regex;
use std::sync::LazyLock;

static RE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^public\s+static\s+(?P<ret>.+?)\s+(?P<name>\w+)\s*\((?P<params>.*)\)").unwrap()
});

/// Every `public static` method of a managed tier class, in file order.
pub fn scan_managed(tier: u32, text: &str) -> Vec<BridgeMethod> {
    text.lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("public static "))
        .filter_map(|line| {
            let Some(caps) = RE_METHOD.captures(line) else {
                tracing::debug!(line, "skipping unparsable method line");
                return None;
            };
            Some(BridgeMethod {
                tier,
                method: caps["name"].to_string(),
                return_type: caps["ret"].trim().to_string(),
                params: split_params(&caps["params"]),
            })
        })
        .collect()
}

/// Split on commas outside angle brackets; each piece splits at its last space.
fn split_params(list: &str) -> Vec<BridgeParam> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&list[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.rsplit_once(char::is_whitespace) {
            Some((ty, name)) => BridgeParam {
                ty: ty.trim().to_string(),
                name: name.to_string(),
            },
            None => BridgeParam {
                ty: String::new(),
                name: p.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_public_static_methods() {
        let text = "public class Tier1 {\n\
            \x20   public static ArrayJ absolute(DeviceJ device, ArrayJ input, ArrayJ output) {\n\
            \x20   }\n\
            \x20   public static HashMap<String, ArrayList<Float>> statistics(DeviceJ device, ArrayJ label) {\n\
            \x20   private static void helper(int x) {\n}\n";
        let methods = scan_managed(1, text);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].method, "absolute");
        assert_eq!(methods[0].return_type, "ArrayJ");
        assert_eq!(methods[0].params.len(), 3);
        assert_eq!(methods[1].return_type, "HashMap<String, ArrayList<Float>>");
        assert_eq!(
            methods[1].params[1],
            BridgeParam {
                ty: "ArrayJ".to_string(),
                name: "label".to_string()
            }
        );
    }

    #[test]
    fn generic_parameters_stay_whole() {
        let params = split_params("DeviceJ device, HashMap<String, Float> map, float x");
        let types: Vec<_> = params.iter().map(|p| p.ty.as_str()).collect();
        assert_eq!(types, vec!["DeviceJ", "HashMap<String, Float>", "float"]);
    }

    #[test]
    fn empty_parameter_list() {
        let methods = scan_managed(0, "public static void flush() {");
        assert!(methods[0].params.is_empty());
    }
}
