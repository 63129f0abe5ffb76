//! Built-in mapping tables for the CLIc source vocabulary.
//!
//! Widening the source vocabulary means adding rules here (or `extra_rules` in
//! `gencle.toml`); nothing is inferred.

use super::{MapperConfig, MappingRule, MappingTable};

const SCALARS: &[&str] = &["float", "int", "bool", "std::string"];

/// JNI-side C++ glue: handles travel as wrapper pointers.
pub fn native() -> MapperConfig {
    let mut rules = vec![
        MappingRule::new("Device::Pointer", "DeviceJ *").checked("{value}->get()"),
        MappingRule::new("Array::Pointer", "ArrayJ *")
            .checked("{value}->get()")
            .returns("ArrayJ{ {value} }"),
        MappingRule::new("std::vector<Array::Pointer>", "std::vector<ArrayJ>")
            .checked("ArrayJ::unwrap({value})")
            .returns("ArrayJ::wrap({value})"),
        MappingRule::new("std::unordered_map", "StatisticsMap"),
        MappingRule::new("StatisticsMap", "StatisticsMap"),
        MappingRule::new("std::vector<float>", "std::vector<float>"),
        MappingRule::new("std::vector<int>", "std::vector<int>"),
    ];
    rules.extend(SCALARS.iter().map(|s| MappingRule::new(s, s)));

    MapperConfig {
        table: MappingTable::new(rules),
        null_literal: "nullptr".to_string(),
        keep_qualifiers: true,
        optional_wrapper: None,
        coerce: Vec::new(),
        coalesce: "{value} == {null} ? {null} : {call}".to_string(),
        void_type: "void".to_string(),
    }
}

/// Python wrapper: named object types, `Optional[...]` for absent defaults.
pub fn scripting() -> MapperConfig {
    let rules = vec![
        MappingRule::new("Device::Pointer", "Device").checked("{value}"),
        MappingRule::new("Array::Pointer", "Image").checked("{value}"),
        MappingRule::new("std::vector<Array::Pointer>", "List[Image]").checked("{value}"),
        MappingRule::new("std::vector", "List"),
        MappingRule::new("std::string", "str"),
        MappingRule::new("StatisticsMap", "dict"),
        MappingRule::new("std::unordered_map", "dict"),
        MappingRule::new("float", "float"),
        MappingRule::new("int", "int"),
        MappingRule::new("bool", "bool"),
    ];

    MapperConfig {
        table: MappingTable::new(rules),
        null_literal: "None".to_string(),
        keep_qualifiers: false,
        optional_wrapper: Some("Optional[{value}]".to_string()),
        coerce: vec!["int".to_string(), "float".to_string()],
        coalesce: "{call} if {value} is not {null} else {null}".to_string(),
        void_type: "None".to_string(),
    }
}

/// Java class: manager-owned handles, generic collections.
pub fn managed() -> MapperConfig {
    let rules = vec![
        MappingRule::new("Device::Pointer", "DeviceJ").checked("{value}.getRaw()"),
        MappingRule::new("Array::Pointer", "ArrayJ")
            .checked("{value}.getRaw()")
            .returns("new ArrayJ({value})"),
        MappingRule::new("std::vector<Array::Pointer>", "ArrayList<ArrayJ>")
            .checked("ArrayJ.toRawList({value})")
            .returns("ArrayJ.fromRawList({value})"),
        MappingRule::new("std::unordered_map", "HashMap<String, ArrayList<Float>>")
            .returns("Utils.toHashMap({value})"),
        MappingRule::new("StatisticsMap", "HashMap<String, ArrayList<Float>>")
            .returns("Utils.toHashMap({value})"),
        MappingRule::new("std::vector<float>", "ArrayList<Float>")
            .returns("Utils.toArrayList({value})"),
        MappingRule::new("std::vector<int>", "ArrayList<Integer>")
            .returns("Utils.toArrayList({value})"),
        MappingRule::new("std::string", "String"),
        MappingRule::new("bool", "boolean"),
        MappingRule::new("float", "float"),
        MappingRule::new("int", "int"),
    ];

    MapperConfig {
        table: MappingTable::new(rules),
        null_literal: "null".to_string(),
        keep_qualifiers: false,
        optional_wrapper: None,
        coerce: Vec::new(),
        coalesce: "{value} == {null} ? {null} : {call}".to_string(),
        void_type: "void".to_string(),
    }
}
