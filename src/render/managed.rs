//! Java classes over the JNI layer, one `TierN` class per tier.

use crate::config::SurfaceConfig;
use crate::error::Warning;
use crate::mapping::{fill_value, NullGuard, TypeMapper};
use crate::model::{FunctionDesc, Tier, NONE_SENTINEL};
use crate::render::doc::Doc;
use crate::render::naming::{fill_call, fill_tier, snake_to_camel};
use crate::render::signature::{Arg, Signature};
use crate::render::{join_functions, RenderedUnit, Surface, SurfaceKind, GENERATED_NOTICE};

const PACKAGE: &str = "net.clesperanto.kernels";

pub struct ManagedSurface {
    config: SurfaceConfig,
    mapper: TypeMapper,
}

impl ManagedSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let mapper = TypeMapper::new(config.mapper.clone());
        ManagedSurface { config, mapper }
    }

    pub(crate) fn signature(&self, func: &FunctionDesc, warnings: &mut Vec<Warning>) -> Signature {
        Signature::build(func, &self.config, &self.mapper, "managed", warnings)
    }

    fn javadoc(&self, func: &FunctionDesc, sig: &Signature) -> Doc {
        let mut lines: Vec<String> = func
            .brief_sentences()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }

        for arg in sig.declared() {
            let mut line = format!("@param {} ({{@code {}}})", arg.ident, arg.mapping.target);
            if !arg.param.description.is_empty() {
                line.push_str(" - ");
                line.push_str(&arg.param.description);
            }
            if let Some(default) = self.shown_default(arg) {
                line.push_str(&format!(" (default: {default})"));
            }
            lines.push(line);
        }
        if !sig.ret.is_void {
            lines.push(format!("@return ({{@code {}}})", sig.ret.target));
        }
        for reference in &func.see {
            if reference.starts_with("http://") || reference.starts_with("https://") {
                lines.push(format!("@see <a href=\"{reference}\">{reference}</a>"));
            } else {
                lines.push(format!("@see {reference}"));
            }
        }
        if sig.args.iter().any(|a| a.mapping.guard == NullGuard::RequireNonNull) {
            lines.push("@throws NullPointerException if any required argument is null".to_string());
        }
        if let Some(message) = &func.deprecation {
            lines.push(format!("@deprecated {message}").trim_end().to_string());
        }

        let mut doc = Doc::new().line("/**");
        for line in lines {
            if line.is_empty() {
                doc.push_line(" *");
            } else {
                doc.push_line(format!(" * {line}"));
            }
        }
        doc.line(" */")
    }

    fn shown_default<'a>(&'a self, arg: &'a Arg) -> Option<&'a str> {
        match arg.default_value.as_str() {
            "" => None,
            NONE_SENTINEL => Some(self.mapper.null_literal()),
            d => Some(d),
        }
    }
}

impl Surface for ManagedSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Managed
    }

    fn indent(&self) -> &str {
        &self.config.indent
    }

    fn render_function(&self, func: &FunctionDesc, tier: u32, warnings: &mut Vec<Warning>) -> Doc {
        let sig = self.signature(func, warnings);
        let target = fill_call(&self.config.call_target, tier, &sig.name);
        let params = sig
            .declared()
            .map(|a| format!("{} {}", a.mapping.target, a.ident))
            .collect::<Vec<_>>()
            .join(", ");
        let call_args = sig.call_args().map(call_arg).collect::<Vec<_>>().join(", ");
        let call = format!("{target}({call_args})");

        let mut body = Doc::new();
        for arg in sig.args.iter().filter(|a| a.mapping.guard == NullGuard::RequireNonNull) {
            body.push_line(format!(
                "Objects.requireNonNull({0}, \"{0} cannot be null\");",
                arg.ident
            ));
        }
        if sig.ret.is_void {
            body.push_line(format!("{call};"));
        } else {
            body.push_line(format!("return {};", fill_value(&sig.ret.wrap, &call)));
        }

        let mut doc = self.javadoc(func, &sig);
        if func.is_deprecated() {
            doc.push_line("@Deprecated");
        }
        doc.line(format!(
            "public static {} {}({params}) {{",
            sig.ret.target,
            snake_to_camel(&sig.name)
        ))
        .nest(body)
        .line("}")
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
            .line(format!("package {PACKAGE};"))
            .blank()
            .line("import java.util.ArrayList;")
            .line("import java.util.HashMap;")
            .line("import java.util.Objects;")
            .blank()
            .line("import net.clesperanto.core.ArrayJ;")
            .line("import net.clesperanto.core.DeviceJ;")
            .line("import net.clesperanto.core.Utils;")
            .blank()
            .line("/**")
            .line(format!(" * Class containing all functions of tier {} category", tier.index))
            .line(" */")
            .line(format!("public class Tier{} {{", tier.index))
            .nest(join_functions(functions))
            .line("}");

        RenderedUnit {
            path: fill_tier(&self.config.unit_path, tier.index),
            text: doc.render(self.indent()),
        }
    }

    fn render_umbrella(&self, _tiers: &[Tier]) -> Option<RenderedUnit> {
        None
    }
}

/// Renamed parameters carry an Error Prone style parameter comment.
fn call_arg(arg: &Arg) -> String {
    if arg.is_renamed() {
        format!("/* {}= */ {}", arg.source_name(), arg.call)
    } else {
        arg.call.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_block;

    const ABSOLUTE: &str = "@name absolute\n\
        @brief Computes the absolute value of every individual pixel x in a given image. Works in 2D and 3D.\n\
        @param device Device to perform the operation on. [const Device::Pointer &]\n\
        @param src The input image to be processed. [const Array::Pointer &]\n\
        @param dst The output image where results are written into. [Array::Pointer ( = None )]\n\
        @return Array::Pointer\n\
        @see https://clij.github.io/clij2-docs/reference_absolute";

    fn surface() -> ManagedSurface {
        ManagedSurface::new(SurfaceConfig::managed())
    }

    fn render(block: &str, tier: u32) -> String {
        let func = parse_block(block, &mut Vec::new()).unwrap();
        surface().function_text(&func, tier, &mut Vec::new())
    }

    #[test]
    fn full_method() {
        let expected = r#"/**
 * Computes the absolute value of every individual pixel x in a given image.
 * Works in 2D and 3D.
 *
 * @param device ({@code DeviceJ}) - Device to perform the operation on.
 * @param input ({@code ArrayJ}) - The input image to be processed.
 * @param output ({@code ArrayJ}) - The output image where results are written into. (default: null)
 * @return ({@code ArrayJ})
 * @see <a href="https://clij.github.io/clij2-docs/reference_absolute">https://clij.github.io/clij2-docs/reference_absolute</a>
 * @throws NullPointerException if any required argument is null
 */
public static ArrayJ absolute(DeviceJ device, ArrayJ input, ArrayJ output) {
    Objects.requireNonNull(device, "device cannot be null");
    Objects.requireNonNull(input, "input cannot be null");
    return new ArrayJ(net.clesperanto._internals.kernelj.Tier1.absolute(device.getRaw(), /* src= */ input.getRaw(), /* dst= */ output == null ? null : output.getRaw()));
}
"#;
        assert_eq!(render(ABSOLUTE, 1), expected);
    }

    #[test]
    fn optional_handle_is_guarded_exactly_once() {
        let text = render(ABSOLUTE, 1);
        assert_eq!(text.matches("output == null ? null : output.getRaw()").count(), 1);
        assert!(!text.contains("requireNonNull(output"));
    }

    #[test]
    fn renamed_in_docs_but_not_in_call() {
        let text = render(ABSOLUTE, 1);
        assert!(!text.contains("@param dst"));
        assert!(text.contains("@param output"));
        assert!(text.contains("/* dst= */ output"));
    }

    #[test]
    fn camel_case_method_and_containers() {
        let text = render(
            "@name sum_reduction\n@brief Sums.\n@param src I. [const Array::Pointer &]\n\
             @param sigma S. [float ( = 1 )]\n@return std::vector<float>",
            3,
        );
        assert!(
            text.contains("public static ArrayList<Float> sumReduction(ArrayJ input, float sigma) {")
        );
        assert!(text.contains("@param sigma ({@code float}) - S. (default: 1)"));
        assert!(text.contains(
            "return Utils.toArrayList(net.clesperanto._internals.kernelj.Tier3.sum_reduction(/* src= */ input.getRaw(), sigma));"
        ));
    }

    #[test]
    fn deprecated_methods_are_annotated() {
        let text = render("@name old\n@brief Old.\n@deprecated use new instead", 2);
        assert!(text
            .contains(" * @deprecated use new instead\n */\n@Deprecated\npublic static void old() {"));
        assert!(text.contains("    net.clesperanto._internals.kernelj.Tier2.old();\n"));
        assert!(!text.contains("@throws"));
    }

    #[test]
    fn tier_class_wraps_methods_in_source_order() {
        let a = parse_block("@name b_first\n@brief B.", &mut Vec::new()).unwrap();
        let b = parse_block("@name a_second\n@brief A.", &mut Vec::new()).unwrap();
        let tier = Tier {
            index: 4,
            functions: vec![a, b],
        };
        let unit = surface().render_tier(&tier, &mut Vec::new());
        assert_eq!(unit.path, "src/main/java/net/clesperanto/kernels/Tier4.java");
        assert_eq!(unit.text.matches("public class Tier4 {").count(), 1);
        assert!(unit.text.find("bFirst").unwrap() < unit.text.find("aSecond").unwrap());
        assert!(unit.text.contains("    public static void bFirst() {\n        net.clesperanto"));
        assert!(unit.text.ends_with("    }\n}\n"));
        assert!(surface().render_umbrella(&[tier]).is_none());
    }
}
