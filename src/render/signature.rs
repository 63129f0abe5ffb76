//! Signature preparation shared by the emitters.
//!
//! Maps every parameter and the return type once, applies role renames and
//! the optional "first parameter last" reordering. Declaration order and call
//! order are kept apart: the call always follows source order and source
//! names.

use crate::config::SurfaceConfig;
use crate::error::Warning;
use crate::mapping::{ReturnMapping, TypeMapper, TypeMapping};
use crate::model::{FunctionDesc, ParamDesc, NONE_SENTINEL};
use crate::render::naming::rename_param;

/// One mapped parameter.
#[derive(Debug, Clone)]
pub struct Arg {
    pub param: ParamDesc,
    /// Consumer-facing identifier
    pub ident: String,
    /// Effective default (may be forced to the sentinel)
    pub default_value: String,
    pub mapping: TypeMapping,
    /// Argument expression in the underlying call
    pub call: String,
}

impl Arg {
    /// Name in the underlying call.
    pub fn source_name(&self) -> &str {
        &self.param.name
    }

    pub fn is_renamed(&self) -> bool {
        self.ident != self.param.name
    }
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    /// Source order
    pub args: Vec<Arg>,
    /// Indices into `args`, declaration order
    order: Vec<usize>,
    pub ret: ReturnMapping,
}

impl Signature {
    pub fn build(
        func: &FunctionDesc,
        surface: &SurfaceConfig,
        mapper: &TypeMapper,
        surface_name: &'static str,
        warnings: &mut Vec<Warning>,
    ) -> Self {
        Self::build_with(func, surface, mapper, |ty| {
            tracing::warn!(
                surface = surface_name,
                function = %func.name,
                ty,
                "no mapping rule, passing type through"
            );
            warnings.push(Warning::UnmappedType {
                surface: surface_name,
                function: func.name.clone(),
                ty: ty.to_string(),
            });
        })
    }

    /// Build a signature already reported by [`Signature::build`], without
    /// warning about unmapped types again.
    pub fn rebuild(func: &FunctionDesc, surface: &SurfaceConfig, mapper: &TypeMapper) -> Self {
        Self::build_with(func, surface, mapper, |_| {})
    }

    fn build_with(
        func: &FunctionDesc,
        surface: &SurfaceConfig,
        mapper: &TypeMapper,
        mut unmapped: impl FnMut(&str),
    ) -> Self {
        let args: Vec<Arg> = func
            .params
            .iter()
            .map(|param| {
                let default_value = if surface.optional_params.contains(&param.name) {
                    NONE_SENTINEL.to_string()
                } else {
                    param.default_value.clone()
                };
                let mapping = mapper.map_param(&param.ty, &default_value);
                if !mapping.mapped && !param.ty.is_empty() {
                    unmapped(&param.ty);
                }
                let ident = rename_param(&param.name, &surface.renames);
                let call = mapper.call_expr(&mapping, &ident);
                Arg {
                    param: param.clone(),
                    ident,
                    default_value,
                    mapping,
                    call,
                }
            })
            .collect();

        let ret = mapper.map_return(&func.return_type);
        if !ret.mapped {
            unmapped(&func.return_type);
        }

        let mut order: Vec<usize> = (0..args.len()).collect();
        if surface.move_first_last && !order.is_empty() {
            order.rotate_left(1);
        }

        Signature {
            name: func.name.clone(),
            args,
            order,
            ret,
        }
    }

    /// Parameters in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = &Arg> {
        self.order.iter().map(|&i| &self.args[i])
    }

    /// Parameters in call order.
    pub fn call_args(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }
}
