//! Type/ownership mapping: source C++ types to one surface's types.
//!
//! Each surface owns a [`TypeMapper`] built from its configuration. Rules are
//! matched by substring against the qualifier-free base type, most specific
//! (longest pattern) first, so `std::vector<Array::Pointer>` can never be
//! half-rewritten by the bare `Array::Pointer` rule.

pub mod defaults;

use crate::model::NONE_SENTINEL;
use serde::Deserialize;

/// How a value crosses the surface boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    #[default]
    ByValue,
    /// Handle-like: presence is checked and the value is unwrapped.
    ByReferenceChecked,
}

/// One substitution rule. Templates use `{value}` for the argument or call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingRule {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub ownership: Ownership,
    /// Call-site expression, e.g. `{value}.getRaw()`
    #[serde(default)]
    pub call: Option<String>,
    /// Wrapping of a returned value, e.g. `new ArrayJ({value})`
    #[serde(default)]
    pub wrap_return: Option<String>,
}

impl MappingRule {
    pub fn new(source: &str, target: &str) -> Self {
        MappingRule {
            source: source.to_string(),
            target: target.to_string(),
            ownership: Ownership::ByValue,
            call: None,
            wrap_return: None,
        }
    }

    pub fn checked(mut self, call: &str) -> Self {
        self.ownership = Ownership::ByReferenceChecked;
        self.call = Some(call.to_string());
        self
    }

    pub fn returns(mut self, wrap: &str) -> Self {
        self.wrap_return = Some(wrap.to_string());
        self
    }
}

/// Rules in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// Sorts rules longest-pattern first; equal lengths keep their order.
    pub fn new(mut rules: Vec<MappingRule>) -> Self {
        rules.sort_by_key(|r| std::cmp::Reverse(r.source.len()));
        MappingTable { rules }
    }

    /// First rule whose pattern occurs in `base_type` on identifier
    /// boundaries (`int` does not match inside `Pointer`).
    pub fn lookup(&self, base_type: &str) -> Option<&MappingRule> {
        self.rules
            .iter()
            .find(|r| contains_on_boundary(base_type, &r.source))
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }
}

/// A source type split into its qualifiers and base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    pub base: String,
    /// `const` qualifier: read-only
    pub read_only: bool,
    /// `&` qualifier
    pub reference: bool,
}

impl SourceType {
    pub fn parse(ty: &str) -> Self {
        let reference = ty.trim_end().ends_with('&');
        let stripped = ty.trim().trim_end_matches('&');
        let mut read_only = false;
        let words: Vec<&str> = stripped
            .split_whitespace()
            .filter(|w| {
                let is_const = *w == "const";
                read_only |= is_const;
                !is_const
            })
            .collect();
        SourceType {
            base: words.join(" "),
            read_only,
            reference,
        }
    }
}

/// Null check a parameter needs at the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullGuard {
    None,
    /// Required handle: precondition raising a descriptive error.
    RequireNonNull,
    /// Optional handle: unwrap only when present.
    Coalesce,
}

/// Result of mapping one parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub target: String,
    /// Call template with `{value}`
    pub call: String,
    pub ownership: Ownership,
    pub guard: NullGuard,
    /// False when no rule matched and the type was passed through.
    pub mapped: bool,
}

/// Result of mapping a return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnMapping {
    pub target: String,
    /// Wrap template with `{value}`
    pub wrap: String,
    pub is_void: bool,
    pub mapped: bool,
}

/// Per-surface mapper settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    pub table: MappingTable,
    /// Literal for "no value": `nullptr`, `None`, `null`
    pub null_literal: String,
    /// Re-apply `const` and by-value `&` to mapped types.
    pub keep_qualifiers: bool,
    /// Declaration wrapper for sentinel-defaulted parameters, e.g. `Optional[{value}]`
    pub optional_wrapper: Option<String>,
    /// Scalars re-coerced at the call site when they carry a concrete default.
    pub coerce: Vec<String>,
    /// Conditional unwrap, with `{value}`, `{null}` and `{call}`
    pub coalesce: String,
    pub void_type: String,
}

#[derive(Debug, Clone)]
pub struct TypeMapper {
    config: MapperConfig,
}

impl TypeMapper {
    pub fn new(config: MapperConfig) -> Self {
        TypeMapper { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn null_literal(&self) -> &str {
        &self.config.null_literal
    }

    /// Map a parameter type. Unmatched types come back unchanged with
    /// `mapped == false`.
    pub fn map_param(&self, source_type: &str, default_value: &str) -> TypeMapping {
        let src = SourceType::parse(source_type);
        let rule = self.config.table.lookup(&src.base);

        let (mut target, mut call, ownership) = match rule {
            Some(rule) => (
                self.qualify(&rule.target, &src, rule.ownership),
                rule.call.clone().unwrap_or_else(|| "{value}".to_string()),
                rule.ownership,
            ),
            None => (
                self.passthrough(source_type, &src),
                "{value}".to_string(),
                Ownership::ByValue,
            ),
        };

        let optional = default_value == NONE_SENTINEL;
        let guard = match ownership {
            Ownership::ByReferenceChecked if optional => NullGuard::Coalesce,
            Ownership::ByReferenceChecked if default_value.is_empty() => NullGuard::RequireNonNull,
            _ => NullGuard::None,
        };

        if !default_value.is_empty() && !optional && self.config.coerce.contains(&target) {
            call = format!("{target}({{value}})");
        }
        if optional {
            if let Some(wrapper) = &self.config.optional_wrapper {
                target = fill_value(wrapper, &target);
            }
        }

        TypeMapping {
            target,
            call,
            ownership,
            guard,
            mapped: rule.is_some(),
        }
    }

    /// Map a return type; an empty source type is void.
    pub fn map_return(&self, source_type: &str) -> ReturnMapping {
        let src = SourceType::parse(source_type);
        if src.base.is_empty() || src.base == "void" {
            return ReturnMapping {
                target: self.config.void_type.clone(),
                wrap: "{value}".to_string(),
                is_void: true,
                mapped: true,
            };
        }
        match self.config.table.lookup(&src.base) {
            Some(rule) => ReturnMapping {
                target: rule
                    .target
                    .trim_end_matches(|c: char| c == '*' || c == ' ')
                    .to_string(),
                wrap: rule
                    .wrap_return
                    .clone()
                    .unwrap_or_else(|| "{value}".to_string()),
                is_void: false,
                mapped: true,
            },
            None => ReturnMapping {
                target: src.base,
                wrap: "{value}".to_string(),
                is_void: false,
                mapped: false,
            },
        }
    }

    /// Render the argument expression for `ident` according to `mapping`.
    pub fn call_expr(&self, mapping: &TypeMapping, ident: &str) -> String {
        let call = fill_value(&mapping.call, ident);
        if mapping.guard == NullGuard::Coalesce && call != ident {
            return self
                .config
                .coalesce
                .replace("{value}", ident)
                .replace("{null}", &self.config.null_literal)
                .replace("{call}", &call);
        }
        call
    }

    fn qualify(&self, target: &str, src: &SourceType, ownership: Ownership) -> String {
        if !self.config.keep_qualifiers {
            return target.to_string();
        }
        let mut out = String::new();
        if src.read_only {
            out.push_str("const ");
        }
        out.push_str(target);
        if src.reference && ownership == Ownership::ByValue {
            out.push_str(" &");
        }
        out
    }

    fn passthrough(&self, source_type: &str, src: &SourceType) -> String {
        if self.config.keep_qualifiers {
            source_type.trim().to_string()
        } else {
            src.base.clone()
        }
    }
}

fn contains_on_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Substitute `{value}` in a template.
pub fn fill_value(template: &str, value: &str) -> String {
    template.replace("{value}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::defaults;

    #[test]
    fn source_type_qualifiers() {
        let t = SourceType::parse("const Array::Pointer &");
        assert_eq!(t.base, "Array::Pointer");
        assert!(t.read_only);
        assert!(t.reference);

        let t = SourceType::parse("std::vector<float>");
        assert_eq!(t.base, "std::vector<float>");
        assert!(!t.read_only && !t.reference);
    }

    #[test]
    fn table_orders_most_specific_first() {
        let table = MappingTable::new(vec![
            MappingRule::new("Array::Pointer", "Image"),
            MappingRule::new("std::vector<Array::Pointer>", "List[Image]"),
        ]);
        assert_eq!(table.lookup("std::vector<Array::Pointer>").unwrap().target, "List[Image]");
        assert_eq!(table.lookup("Array::Pointer").unwrap().target, "Image");
        assert!(table.lookup("float").is_none());
    }

    #[test]
    fn patterns_match_on_identifier_boundaries() {
        let table = MappingTable::new(vec![MappingRule::new("int", "int")]);
        assert!(table.lookup("Buffer::Pointer").is_none());
        assert!(table.lookup("std::vector<int>").is_some());
        assert!(table.lookup("unsigned int").is_some());
    }

    #[test]
    fn managed_guards() {
        let mapper = TypeMapper::new(defaults::managed());
        let required = mapper.map_param("const Array::Pointer &", "");
        assert_eq!(required.target, "ArrayJ");
        assert_eq!(required.guard, NullGuard::RequireNonNull);
        assert_eq!(mapper.call_expr(&required, "input"), "input.getRaw()");

        let optional = mapper.map_param("Array::Pointer", "None");
        assert_eq!(optional.guard, NullGuard::Coalesce);
        assert_eq!(
            mapper.call_expr(&optional, "output"),
            "output == null ? null : output.getRaw()"
        );

        let scalar = mapper.map_param("float", "1");
        assert_eq!(scalar.guard, NullGuard::None);
        assert_eq!(mapper.call_expr(&scalar, "sigma"), "sigma");
    }

    #[test]
    fn managed_containers_and_returns() {
        let mapper = TypeMapper::new(defaults::managed());
        assert_eq!(
            mapper.map_param("const std::vector<Array::Pointer> &", "").target,
            "ArrayList<ArrayJ>"
        );
        assert_eq!(mapper.map_param("std::vector<float>", "").target, "ArrayList<Float>");
        assert_eq!(mapper.map_param("bool", "false").target, "boolean");

        let ret = mapper.map_return("std::vector<float>");
        assert_eq!(ret.target, "ArrayList<Float>");
        assert_eq!(fill_value(&ret.wrap, "x"), "Utils.toArrayList(x)");
        let ret = mapper.map_return("StatisticsMap");
        assert_eq!(fill_value(&ret.wrap, "x"), "Utils.toHashMap(x)");
        assert!(mapper.map_return("").is_void);
    }

    #[test]
    fn native_handles_pass_by_address() {
        let mapper = TypeMapper::new(defaults::native());
        let m = mapper.map_param("const Array::Pointer &", "");
        assert_eq!(m.target, "const ArrayJ *");
        assert_eq!(mapper.call_expr(&m, "src"), "src->get()");

        let m = mapper.map_param("Array::Pointer", "None");
        assert_eq!(mapper.call_expr(&m, "dst"), "dst == nullptr ? nullptr : dst->get()");

        let m = mapper.map_param("const std::vector<float> &", "");
        assert_eq!(m.target, "const std::vector<float> &");
        assert_eq!(mapper.map_return("Array::Pointer").target, "ArrayJ");
    }

    #[test]
    fn scripting_optional_and_coercion() {
        let mapper = TypeMapper::new(defaults::scripting());
        let m = mapper.map_param("Array::Pointer", "None");
        assert_eq!(m.target, "Optional[Image]");
        assert_eq!(mapper.call_expr(&m, "output"), "output");

        let m = mapper.map_param("float", "1.0");
        assert_eq!(mapper.call_expr(&m, "sigma"), "float(sigma)");
        let m = mapper.map_param("float", "");
        assert_eq!(mapper.call_expr(&m, "sigma"), "sigma");

        assert_eq!(mapper.map_param("std::vector<Array::Pointer>", "").target, "List[Image]");
        assert_eq!(mapper.map_param("std::vector<float>", "").target, "List");
    }

    #[test]
    fn unmapped_types_pass_through() {
        let mapper = TypeMapper::new(defaults::managed());
        let m = mapper.map_param("const cle::Mystery &", "");
        assert!(!m.mapped);
        assert_eq!(m.target, "cle::Mystery");

        let native = TypeMapper::new(defaults::native());
        let m = native.map_param("const cle::Mystery &", "");
        assert_eq!(m.target, "const cle::Mystery &");
    }
}
