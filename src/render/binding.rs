//! pybind11 registration units exposing the CLIc kernels as `_name` functions.
//!
//! Arguments are registered under their source names; the Python wrapper
//! calls them by keyword.

use crate::config::SurfaceConfig;
use crate::error::Warning;
use crate::model::{FunctionDesc, Tier};
use crate::render::doc::Doc;
use crate::render::naming::{fill_call, fill_tier};
use crate::render::{join_functions, RenderedUnit, Surface, SurfaceKind, GENERATED_NOTICE};

pub struct BindingSurface {
    config: SurfaceConfig,
}

impl BindingSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        BindingSurface { config }
    }

    fn registrar(tier: u32) -> String {
        format!("tier{tier}_")
    }
}

impl Surface for BindingSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Binding
    }

    fn indent(&self) -> &str {
        &self.config.indent
    }

    fn render_function(&self, func: &FunctionDesc, tier: u32, _warnings: &mut Vec<Warning>) -> Doc {
        let target = fill_call(&self.config.call_target, tier, &func.name);
        let mut args = vec![
            format!("\"_{}\"", func.name),
            format!("&{target}"),
            format!("\"Call {target} from C++ CLIc.\""),
            "py::return_value_policy::automatic_reference".to_string(),
        ];
        args.extend(func.params.iter().map(|p| format!("py::arg(\"{}\")", p.name)));

        Doc::new().line(format!("m.def({});", args.join(", ")))
    }

    fn render_tier(&self, tier: &Tier, warnings: &mut Vec<Warning>) -> RenderedUnit {
        let functions = tier
            .functions
            .iter()
            .map(|f| self.render_function(f, tier.index, warnings))
            .collect();

        let doc = Doc::new()
            .line(format!("// {GENERATED_NOTICE}"))
            .blank()
            .line("#include \"pycle_wrapper.hpp\"")
            .line(format!("#include \"tier{}.hpp\"", tier.index))
            .blank()
            .line("namespace py = pybind11;")
            .blank()
            .line(format!("auto {}(py::module &m) -> void {{", Self::registrar(tier.index)))
            .nest(join_functions(functions))
            .line("}");

        RenderedUnit {
            path: fill_tier(&self.config.unit_path, tier.index),
            text: doc.render(self.indent()),
        }
    }

    fn render_umbrella(&self, tiers: &[Tier]) -> Option<RenderedUnit> {
        let path = self.config.umbrella_path.as_ref()?;
        let mut doc = Doc::new()
            .line(format!("// {GENERATED_NOTICE}"))
            .blank()
            .line("#pragma once")
            .blank()
            .line("#include <pybind11/pybind11.h>")
            .blank()
            .line("namespace py = pybind11;")
            .blank();
        for tier in tiers {
            doc.push_line(format!(
                "auto {}(py::module &m) -> void;",
                Self::registrar(tier.index)
            ));
        }
        Some(RenderedUnit {
            path: path.clone(),
            text: doc.render(self.indent()),
        })
    }
}
