//! `gencle.toml` configuration.
//!
//! Every field is optional. Surface sections overlay the built-in defaults:
//! `rules` replaces a surface's table, `extra_rules` extends it, scalars
//! override one setting each.

use crate::error::{Error, Result};
use crate::mapping::{defaults, MapperConfig, MappingRule, MappingTable};
use serde::Deserialize;
use std::path::Path;

/// What to do with a header whose only block documents the namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTierPolicy {
    /// Emit an empty tier.
    #[default]
    Accept,
    /// Treat it as malformed input.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    pub empty_tier: EmptyTierPolicy,
    /// Tag marking the file-level block
    pub namespace_tag: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            empty_tier: EmptyTierPolicy::Accept,
            namespace_tag: "namespace".to_string(),
        }
    }
}

/// Prefix rename of a conventional parameter role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    fn new(from: &str, to: &str) -> Self {
        Rename {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Settings for one target surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub mapper: MapperConfig,
    /// Underlying call, with `{tier}` and `{name}`
    pub call_target: String,
    /// Destination of a tier unit, with `{tier}`
    pub unit_path: String,
    pub umbrella_path: Option<String>,
    /// Present the first declared parameter last.
    pub move_first_last: bool,
    /// Parameters forced to default to absence of value
    pub optional_params: Vec<String>,
    pub renames: Vec<Rename>,
    pub indent: String,
}

impl SurfaceConfig {
    pub fn native() -> Self {
        SurfaceConfig {
            mapper: defaults::native(),
            call_target: "cle::tier{tier}::{name}_func".to_string(),
            unit_path: "native/clesperantoj/src/tier{tier}j.cpp".to_string(),
            umbrella_path: Some("native/clesperantoj/include/kernelj.hpp".to_string()),
            move_first_last: false,
            optional_params: Vec::new(),
            renames: default_renames(),
            indent: "    ".to_string(),
        }
    }

    pub fn binding() -> Self {
        SurfaceConfig {
            mapper: defaults::scripting(),
            call_target: "cle::tier{tier}::{name}_func".to_string(),
            unit_path: "src/wrapper/tier{tier}_.cpp".to_string(),
            umbrella_path: Some("src/wrapper/pycle_tiers.hpp".to_string()),
            move_first_last: false,
            optional_params: Vec::new(),
            renames: Vec::new(),
            indent: "    ".to_string(),
        }
    }

    pub fn scripting() -> Self {
        SurfaceConfig {
            mapper: defaults::scripting(),
            call_target: "clic._{name}".to_string(),
            unit_path: "pyclesperanto/_tier{tier}.py".to_string(),
            umbrella_path: Some("pyclesperanto/_tiers.py".to_string()),
            move_first_last: true,
            optional_params: vec!["device".to_string()],
            renames: default_renames(),
            indent: "    ".to_string(),
        }
    }

    pub fn managed() -> Self {
        SurfaceConfig {
            mapper: defaults::managed(),
            call_target: "net.clesperanto._internals.kernelj.Tier{tier}.{name}".to_string(),
            unit_path: "src/main/java/net/clesperanto/kernels/Tier{tier}.java".to_string(),
            umbrella_path: None,
            move_first_last: false,
            optional_params: Vec::new(),
            renames: default_renames(),
            indent: "    ".to_string(),
        }
    }

    fn apply(&mut self, patch: SurfacePatch) {
        // extra rules win over base rules of the same specificity
        let mut rules: Vec<MappingRule> = patch.extra_rules;
        match patch.rules {
            Some(base) => rules.extend(base),
            None => rules.extend_from_slice(self.mapper.table.rules()),
        }
        self.mapper.table = MappingTable::new(rules);

        let m = &mut self.mapper;
        override_with(&mut m.null_literal, patch.null_literal);
        override_with(&mut m.keep_qualifiers, patch.keep_qualifiers);
        override_with(&mut m.coerce, patch.coerce);
        override_with(&mut m.coalesce, patch.coalesce);
        override_with(&mut m.void_type, patch.void_type);
        if patch.optional_wrapper.is_some() {
            m.optional_wrapper = patch.optional_wrapper;
        }
        override_with(&mut self.call_target, patch.call_target);
        override_with(&mut self.unit_path, patch.unit_path);
        if patch.umbrella_path.is_some() {
            self.umbrella_path = patch.umbrella_path;
        }
        override_with(&mut self.move_first_last, patch.move_first_last);
        override_with(&mut self.optional_params, patch.optional_params);
        override_with(&mut self.renames, patch.renames);
        override_with(&mut self.indent, patch.indent);
    }
}

fn default_renames() -> Vec<Rename> {
    vec![Rename::new("src", "input"), Rename::new("dst", "output")]
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Legacy bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub begin_marker: String,
    pub end_marker: String,
    /// Implicit first argument supplied by the legacy surface
    pub context_arg: String,
    /// Helper staging images into the legacy memory space
    pub stage_helper: String,
    /// Managed handle type that gets staged
    pub handle_type: String,
    /// Declared type of staged parameters
    pub object_type: String,
    /// Delegation target class, with `{tier}`
    pub tier_class: String,
    pub indent: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            begin_marker: "/* BEGIN AUTO-GENERATED FUNCTIONS */".to_string(),
            end_marker: "/* END AUTO-GENERATED FUNCTIONS */".to_string(),
            context_arg: "device".to_string(),
            stage_helper: "push".to_string(),
            handle_type: "ArrayJ".to_string(),
            object_type: "Object".to_string(),
            tier_class: "Tier{tier}".to_string(),
            indent: "    ".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub parse: ParseConfig,
    pub native: SurfaceConfig,
    pub binding: SurfaceConfig,
    pub scripting: SurfaceConfig,
    pub managed: SurfaceConfig,
    pub bridge: BridgeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            parse: ParseConfig::default(),
            native: SurfaceConfig::native(),
            binding: SurfaceConfig::binding(),
            scripting: SurfaceConfig::scripting(),
            managed: SurfaceConfig::managed(),
            bridge: BridgeConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut config = Config {
            parse: raw.parse,
            bridge: raw.bridge,
            ..Config::default()
        };
        config.native.apply(raw.surfaces.native);
        config.binding.apply(raw.surfaces.binding);
        config.scripting.apply(raw.surfaces.scripting);
        config.managed.apply(raw.surfaces.managed);
        Ok(config)
    }
}

/// Load a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml(&text).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    parse: ParseConfig,
    surfaces: RawSurfaces,
    bridge: BridgeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSurfaces {
    native: SurfacePatch,
    binding: SurfacePatch,
    scripting: SurfacePatch,
    managed: SurfacePatch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SurfacePatch {
    rules: Option<Vec<MappingRule>>,
    extra_rules: Vec<MappingRule>,
    null_literal: Option<String>,
    keep_qualifiers: Option<bool>,
    optional_wrapper: Option<String>,
    coerce: Option<Vec<String>>,
    coalesce: Option<String>,
    void_type: Option<String>,
    call_target: Option<String>,
    unit_path: Option<String>,
    umbrella_path: Option<String>,
    move_first_last: Option<bool>,
    optional_params: Option<Vec<String>>,
    renames: Option<Vec<Rename>>,
    indent: Option<String>,
}
