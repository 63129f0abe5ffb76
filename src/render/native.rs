//! JNI-side C++ glue: one static class per tier wrapping the CLIc kernels.

use crate::config::SurfaceConfig;
use crate::error::Warning;
use crate::mapping::{fill_value, TypeMapper};
use crate::model::{FunctionDesc, Tier};
use crate::render::doc::Doc;
use crate::render::naming::{fill_call, fill_tier};
use crate::render::signature::{Arg, Signature};
use crate::render::{join_functions, RenderedUnit, Surface, SurfaceKind, GENERATED_NOTICE};

pub struct NativeSurface {
    config: SurfaceConfig,
    mapper: TypeMapper,
}

impl NativeSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let mapper = TypeMapper::new(config.mapper.clone());
        NativeSurface { config, mapper }
    }

    fn signature(&self, func: &FunctionDesc, warnings: &mut Vec<Warning>) -> Signature {
        Signature::build(func, &self.config, &self.mapper, "native", warnings)
    }

    /// `static ArrayJ absolute(const DeviceJ * device, ...);`
    ///
    /// Unmapped types were reported when the tier unit was rendered.
    pub fn declare_function(&self, func: &FunctionDesc) -> String {
        let sig = Signature::rebuild(func, &self.config, &self.mapper);
        format!("static {} {}({});", sig.ret.target, sig.name, parameter_list(&sig))
    }

    fn declare_class(&self, tier: &Tier) -> Doc {
        let decls = tier
            .functions
            .iter()
            .map(|f| self.declare_function(f))
            .collect::<Vec<_>>()
            .join("\n");
        let mut body = Doc::new();
        if !decls.is_empty() {
            body.push_line(decls);
        }
        Doc::new()
            .line(format!("class Tier{}", tier.index))
            .line("{")
            .line("public:")
            .nest(body)
            .line("};")
    }
}

impl Surface for NativeSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Native
    }

    fn indent(&self) -> &str {
        &self.config.indent
    }

    fn render_function(&self, func: &FunctionDesc, tier: u32, warnings: &mut Vec<Warning>) -> Doc {
        let sig = self.signature(func, warnings);
        let target = fill_call(&self.config.call_target, tier, &sig.name);
        let args: Vec<String> = sig.call_args().map(call_arg).collect();
        let call = format!("{target}({})", args.join(", "));

        let statement = if sig.ret.is_void {
            format!("{call};")
        } else {
            format!("return {};", fill_value(&sig.ret.wrap, &call))
        };

        Doc::new()
            .line(format!(
                "{} Tier{tier}::{}({})",
                sig.ret.target,
                sig.name,
                parameter_list(&sig)
            ))
            .line("{")
            .nest(Doc::new().line(statement))
            .line("}")
    }

    fn render_tier(&self, tier: &Tier, warnings: &mut Vec<Warning>) -> RenderedUnit {
        let functions = tier
            .functions
            .iter()
            .map(|f| self.render_function(f, tier.index, warnings))
            .collect();

        let mut doc = Doc::new()
            .line(format!("// {GENERATED_NOTICE}"))
            .blank()
            .line("#include \"kernelj.hpp\"")
            .line(format!("#include \"tier{}.hpp\"", tier.index));
        if !tier.functions.is_empty() {
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
        let mut doc = Doc::new()
            .line(format!("// {GENERATED_NOTICE}"))
            .blank()
            .line("#ifndef __INCLUDE_KERNELJ_HPP")
            .line("#define __INCLUDE_KERNELJ_HPP")
            .blank()
            .line("#include \"clesperantoj.hpp\"")
            .blank();
        for tier in tiers {
            doc.push_doc(self.declare_class(tier));
            doc.push_blank();
        }
        doc.push_line("#endif // __INCLUDE_KERNELJ_HPP");

        Some(RenderedUnit {
            path: path.clone(),
            text: doc.render(self.indent()),
        })
    }
}

fn parameter_list(sig: &Signature) -> String {
    sig.declared()
        .map(|a| format!("{} {}", a.mapping.target, a.ident))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renamed parameters carry a checked argument comment naming the callee's
/// parameter.
fn call_arg(arg: &Arg) -> String {
    if arg.is_renamed() {
        format!("/*{}=*/{}", arg.source_name(), arg.call)
    } else {
        arg.call.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_block;

    const ABSOLUTE: &str = "@name absolute\n@brief Absolute value.\n\
        @param device Device to use. [const Device::Pointer &]\n\
        @param src Input image. [const Array::Pointer &]\n\
        @param dst Output image. [Array::Pointer ( = None )]\n\
        @return Array::Pointer";

    fn surface() -> NativeSurface {
        NativeSurface::new(SurfaceConfig::native())
    }

    #[test]
    fn function_definition() {
        let func = parse_block(ABSOLUTE, &mut Vec::new()).unwrap();
        let text = surface().function_text(&func, 1, &mut Vec::new());
        assert_eq!(
            text,
            "ArrayJ Tier1::absolute(const DeviceJ * device, const ArrayJ * input, ArrayJ * output)\n\
             {\n    return ArrayJ{ cle::tier1::absolute_func(device->get(), /*src=*/input->get(), \
             /*dst=*/output == nullptr ? nullptr : output->get()) };\n}\n"
        );
    }

    #[test]
    fn declaration() {
        let func = parse_block(ABSOLUTE, &mut Vec::new()).unwrap();
        assert_eq!(
            surface().declare_function(&func),
            "static ArrayJ absolute(const DeviceJ * device, const ArrayJ * input, ArrayJ * output);"
        );
    }

    #[test]
    fn void_and_scalar_returns() {
        let func = parse_block(
            "@name flush\n@brief Flush.\n@param device D. [const Device::Pointer &]",
            &mut Vec::new(),
        )
        .unwrap();
        let text = surface().function_text(&func, 0, &mut Vec::new());
        assert!(text.contains("void Tier0::flush(const DeviceJ * device)"));
        assert!(text.contains("    cle::tier0::flush_func(device->get());"));

        let func = parse_block(
            "@name sum\n@brief Sum.\n@param src I. [const Array::Pointer &]\n@return float",
            &mut Vec::new(),
        )
        .unwrap();
        let text = surface().function_text(&func, 3, &mut Vec::new());
        assert!(text.contains("return cle::tier3::sum_func(/*src=*/input->get());"));
    }

    #[test]
    fn umbrella_has_one_guard_and_every_tier() {
        let func = parse_block(ABSOLUTE, &mut Vec::new()).unwrap();
        let tiers = vec![
            Tier {
                index: 1,
                functions: vec![func.clone()],
            },
            Tier {
                index: 2,
                functions: vec![func],
            },
        ];
        let unit = surface().render_umbrella(&tiers).unwrap();
        assert_eq!(unit.path, "native/clesperantoj/include/kernelj.hpp");
        assert_eq!(unit.text.matches("#ifndef").count(), 1);
        let t1 = unit.text.find("class Tier1").unwrap();
        let t2 = unit.text.find("class Tier2").unwrap();
        assert!(t1 < t2);
        assert!(unit.text.contains("public:\n    static ArrayJ absolute("));
    }
}
