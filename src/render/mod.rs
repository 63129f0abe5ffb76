//! Emitters: one `Surface` per consumer ecosystem.

pub mod binding;
pub mod doc;
pub mod managed;
pub mod naming;
pub mod native;
pub mod scripting;
pub mod signature;

use crate::config::Config;
use crate::error::Warning;
use crate::model::{FunctionDesc, Tier};
use doc::Doc;
use std::fmt;
use std::str::FromStr;

/// Header line of every generated unit.
pub const GENERATED_NOTICE: &str = "this code is auto-generated by gencle, do not edit manually";

/// Final text for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    /// Destination relative to the output root
    pub path: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceKind {
    Native,
    Binding,
    Scripting,
    Managed,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Native,
        SurfaceKind::Binding,
        SurfaceKind::Scripting,
        SurfaceKind::Managed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Native => "native",
            SurfaceKind::Binding => "binding",
            SurfaceKind::Scripting => "scripting",
            SurfaceKind::Managed => "managed",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" | "cpp" => Ok(SurfaceKind::Native),
            "binding" | "pybind" => Ok(SurfaceKind::Binding),
            "scripting" | "python" | "py" => Ok(SurfaceKind::Scripting),
            "managed" | "java" => Ok(SurfaceKind::Managed),
            _ => Err(format!(
                "unknown surface: {s}. Use native, binding, scripting, or managed"
            )),
        }
    }
}

/// Rendering rules of one consumer ecosystem.
pub trait Surface {
    fn kind(&self) -> SurfaceKind;

    /// Indentation step of this surface.
    fn indent(&self) -> &str;

    /// One function, as a document fragment.
    fn render_function(&self, func: &FunctionDesc, tier: u32, warnings: &mut Vec<Warning>) -> Doc;

    /// The tier's compilation unit: boilerplate around every function.
    fn render_tier(&self, tier: &Tier, warnings: &mut Vec<Warning>) -> RenderedUnit;

    /// One unit referencing every given tier, if the surface has one.
    fn render_umbrella(&self, tiers: &[Tier]) -> Option<RenderedUnit>;

    fn function_text(&self, func: &FunctionDesc, tier: u32, warnings: &mut Vec<Warning>) -> String {
        self.render_function(func, tier, warnings).render(self.indent())
    }
}

/// Create the surface for `kind` from its configuration.
pub fn create_surface(kind: SurfaceKind, config: &Config) -> Box<dyn Surface> {
    match kind {
        SurfaceKind::Native => Box::new(native::NativeSurface::new(config.native.clone())),
        SurfaceKind::Binding => Box::new(binding::BindingSurface::new(config.binding.clone())),
        SurfaceKind::Scripting => {
            Box::new(scripting::ScriptingSurface::new(config.scripting.clone()))
        }
        SurfaceKind::Managed => Box::new(managed::ManagedSurface::new(config.managed.clone())),
    }
}

/// Join function fragments with one blank line between them.
pub(crate) fn join_functions(docs: Vec<Doc>) -> Doc {
    let mut out = Doc::new();
    for (i, d) in docs.into_iter().enumerate() {
        if i > 0 {
            out.push_blank();
        }
        out.push_doc(d);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_names_round_trip() {
        for kind in SurfaceKind::ALL {
            assert_eq!(kind.name().parse::<SurfaceKind>().unwrap(), kind);
        }
        assert_eq!("java".parse::<SurfaceKind>().unwrap(), SurfaceKind::Managed);
        assert!("xml".parse::<SurfaceKind>().unwrap_err().contains("unknown surface"));
    }
}
