//! Python wrapper modules: typed, documented functions over the pybind layer.

use crate::config::SurfaceConfig;
use crate::error::Warning;
use crate::mapping::TypeMapper;
use crate::model::{FunctionDesc, Tier};
use crate::render::doc::Doc;
use crate::render::naming::{fill_call, fill_tier, wrap_words};
use crate::render::signature::{Arg, Signature};
use crate::render::{join_functions, RenderedUnit, Surface, SurfaceKind, GENERATED_NOTICE};
use std::path::Path;

const WRAP_WIDTH: usize = 80;

pub struct ScriptingSurface {
    config: SurfaceConfig,
    mapper: TypeMapper,
}

impl ScriptingSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let mapper = TypeMapper::new(config.mapper.clone());
        ScriptingSurface { config, mapper }
    }

    /// Top-level package of the generated modules (`pyclesperanto`).
    fn package(&self) -> &str {
        self.config
            .unit_path
            .split('/')
            .find(|c| !c.is_empty() && !c.contains('{'))
            .filter(|c| !c.ends_with(".py"))
            .unwrap_or("clesperanto")
    }

    /// Module name of a tier unit (`_tier1`).
    fn module_name(&self, tier: u32) -> String {
        let path = fill_tier(&self.config.unit_path, tier);
        Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("_tier{tier}"))
    }

    fn docstring(&self, func: &FunctionDesc, sig: &Signature) -> Doc {
        let brief = wrap_words(&func.brief, WRAP_WIDTH);
        let mut doc = Doc::new().line(format!(
            "\"\"\"{}",
            brief.first().map(String::as_str).unwrap_or_default()
        ));
        for line in brief.iter().skip(1) {
            doc.push_line(line.as_str());
        }

        doc.push_blank();
        doc.push_line("Parameters\n----------");
        for arg in sig.declared() {
            let default = shown_default(arg)
                .map(|d| format!(" (= {d})"))
                .unwrap_or_default();
            doc.push_line(format!("{}: {}{default}", arg.ident, arg.mapping.target));
            doc.push_nest(Doc::new().line(arg.param.description.as_str()));
        }

        doc.push_blank();
        doc.push_line("Returns\n-------");
        doc.push_line(sig.ret.target.as_str());

        if !func.see.is_empty() {
            doc.push_blank();
            doc.push_line("References\n----------");
            for (i, link) in func.see.iter().enumerate() {
                doc.push_line(format!("[{}] {link}", i + 1));
            }
        }
        doc.line("\"\"\"")
    }

    fn deprecation_warning(&self, func: &FunctionDesc) -> Option<String> {
        let message = func.deprecation.as_deref()?;
        let message = if message.is_empty() {
            "this function is deprecated"
        } else {
            message
        };
        Some(format!(
            "warnings.warn(\"{}.{}: {}\", DeprecationWarning)",
            self.package(),
            func.name,
            message.replace('"', "'")
        ))
    }
}

impl Surface for ScriptingSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Scripting
    }

    fn indent(&self) -> &str {
        &self.config.indent
    }

    fn render_function(&self, func: &FunctionDesc, tier: u32, warnings: &mut Vec<Warning>) -> Doc {
        let sig = Signature::build(func, &self.config, &self.mapper, "scripting", warnings);
        let target = fill_call(&self.config.call_target, tier, &sig.name);

        let params = sig
            .declared()
            .map(|arg| match shown_default(arg) {
                Some(d) => format!("{}: {} = {d},", arg.ident, arg.mapping.target),
                None => format!("{}: {},", arg.ident, arg.mapping.target),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let call_args = sig
            .call_args()
            .map(|arg| format!("{}={}", arg.source_name(), arg.call))
            .collect::<Vec<_>>()
            .join(", ");

        let mut body = self.docstring(func, &sig);
        if let Some(warning) = self.deprecation_warning(func) {
            body.push_line(warning);
        }
        body.push_line(format!("return {target}({call_args})"));

        let mut doc = Doc::new()
            .line(decorator(func))
            .line(format!("def {}(", sig.name));
        if !params.is_empty() {
            doc.push_nest(Doc::new().line(params));
        }
        doc.line(format!(") -> {}:", sig.ret.target)).nest(body)
    }

    fn render_tier(&self, tier: &Tier, warnings: &mut Vec<Warning>) -> RenderedUnit {
        let functions = tier
            .functions
            .iter()
            .map(|f| self.render_function(f, tier.index, warnings))
            .collect();

        let mut doc = Doc::new()
            .line(format!("# {GENERATED_NOTICE}"))
            .line(format!("# source: cle::tier{}", tier.index))
            .blank()
            .line("import importlib")
            .line("import warnings")
            .line("from typing import Optional, List")
            .blank()
            .line("from ._array import Image")
            .line("from ._core import Device")
            .line("from ._decorators import plugin_function")
            .blank()
            .line(format!(
                "clic = importlib.import_module(\"._{0}\", package=\"{0}\")",
                self.package()
            ));
        if !tier.functions.is_empty() {
            doc.push_blank();
            doc.push_blank();
            doc.push_doc(join_functions(functions));
        }

        RenderedUnit {
            path: fill_tier(&self.config.unit_path, tier.index),
            text: doc.render(self.indent()),
        }
    }

    fn render_umbrella(&self, tiers: &[Tier]) -> Option<RenderedUnit> {
        let path = self.config.umbrella_path.as_ref()?;
        let mut doc = Doc::new().line(format!("# {GENERATED_NOTICE}")).blank();
        for tier in tiers {
            doc.push_line(format!("from .{} import *", self.module_name(tier.index)));
        }
        Some(RenderedUnit {
            path: path.clone(),
            text: doc.render(self.indent()),
        })
    }
}

/// `@plugin_function(categories=[...], priority=...)`, bare when neither is set.
fn decorator(func: &FunctionDesc) -> String {
    let mut defines = Vec::new();
    if !func.category.is_empty() {
        defines.push(format!("categories=[{}]", func.category.replace('\'', "\"")));
    }
    if !func.priority.is_empty() {
        defines.push(format!("priority={}", func.priority.replace('\'', "\"")));
    }
    if defines.is_empty() {
        "@plugin_function".to_string()
    } else {
        format!("@plugin_function({})", defines.join(", "))
    }
}

/// Default as written in Python, if any.
fn shown_default(arg: &Arg) -> Option<&str> {
    match arg.default_value.as_str() {
        "" => None,
        "true" => Some("True"),
        "false" => Some("False"),
        d => Some(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_block;

    const ABSOLUTE: &str = "@name absolute\n@priority 1\n\
        @brief Computes the absolute value of every individual pixel x in a given image.\n\
        @param device Device to perform the operation on. [const Device::Pointer &]\n\
        @param src The input image to be processed. [const Array::Pointer &]\n\
        @param dst The output image where results are written into. [Array::Pointer ( = None )]\n\
        @return Array::Pointer\n\
        @note 'filter', 'in assistant'\n\
        @see https://clij.github.io/clij2-docs/reference_absolute";

    fn surface() -> ScriptingSurface {
        ScriptingSurface::new(SurfaceConfig::scripting())
    }

    fn render(block: &str) -> String {
        let func = parse_block(block, &mut Vec::new()).unwrap();
        surface().function_text(&func, 1, &mut Vec::new())
    }

    #[test]
    fn full_function() {
        let expected = r#"@plugin_function(categories=["filter", "in assistant"], priority=1)
def absolute(
    input: Image,
    output: Optional[Image] = None,
    device: Optional[Device] = None,
) -> Image:
    """Computes the absolute value of every individual pixel x in a given image.

    Parameters
    ----------
    input: Image
        The input image to be processed.
    output: Optional[Image] (= None)
        The output image where results are written into.
    device: Optional[Device] (= None)
        Device to perform the operation on.

    Returns
    -------
    Image

    References
    ----------
    [1] https://clij.github.io/clij2-docs/reference_absolute
    """
    return clic._absolute(device=device, src=input, dst=output)
"#;
        assert_eq!(render(ABSOLUTE), expected);
    }

    #[test]
    fn reordering_moves_device_last_but_call_keeps_source_order() {
        let text = render(ABSOLUTE);
        let input = text.find("    input: Image,").unwrap();
        let device = text.find("    device: Optional[Device] = None,").unwrap();
        assert!(input < device);
        assert!(text.contains("(device=device, src=input, dst=output)"));
    }

    #[test]
    fn concrete_scalar_defaults_are_coerced() {
        let text = render(
            "@name blur\n@brief B.\n@param src I. [const Array::Pointer &]\n\
             @param sigma S. [float ( = 1.5 )]\n@param fast F. [bool ( = false )]",
        );
        assert!(text.contains("    sigma: float = 1.5,"));
        assert!(text.contains("    fast: bool = False,"));
        assert!(text.contains("src=input, sigma=float(sigma), fast=fast"));
    }

    #[test]
    fn deprecated_functions_warn() {
        let text = render("@name old\n@brief Old.\n@deprecated use new instead");
        assert!(text.contains(
            "    warnings.warn(\"pyclesperanto.old: use new instead\", DeprecationWarning)\n    return clic._old()"
        ));
        assert!(text.starts_with("@plugin_function\ndef old(\n) -> None:"));
    }

    #[test]
    fn long_briefs_wrap() {
        let brief = "word ".repeat(30);
        let text = render(&format!("@name w\n@brief {brief}"));
        for line in text.lines() {
            assert!(line.len() <= 4 + 3 + WRAP_WIDTH, "{line}");
        }
    }

    #[test]
    fn umbrella_imports_each_tier() {
        let tiers = [
            Tier {
                index: 1,
                functions: Vec::new(),
            },
            Tier {
                index: 2,
                functions: Vec::new(),
            },
        ];
        let unit = surface().render_umbrella(&tiers).unwrap();
        assert_eq!(unit.path, "pyclesperanto/_tiers.py");
        assert!(unit.text.ends_with("from ._tier1 import *\nfrom ._tier2 import *\n"));
    }
}
