use vitte_core::config::LoweringOptions;
use vitte_core::diagnostics::{Diagnostic, DiagnosticEngine};
use vitte_core::hir::{
    HirContext, HirDecl, HirDeclKind, HirExpr, HirExprId, HirExprKind, HirFnDecl, HirModule,
    HirModuleId,
};
use vitte_core::mir::{
    MirConst, MirEnumDecl, MirField, MirFunction, MirGlobal, MirModule, MirPickCase, MirPickDecl,
    MirStructDecl, MirTerminator, MirType,
};
use vitte_core::span::Span;
use vitte_core::Result;

use super::IrTransform;

mod builder;
mod expr;
mod pattern;
mod stmt;
mod tables;
pub mod types;

pub use builder::Builder;
pub use pattern::{PatternBinding, PatternMatch};
pub use tables::ModuleTables;

const DIAGNOSTIC_CONTEXT: &str = "hir→mir";

/// Lowers a HIR module into a [`MirModule`].
///
/// Module-wide tables are collected first, then declarations are emitted in
/// source order: forms become structs, picks become tagged unions (plus a
/// plain enum when every case is nullary), consts and globals become
/// globals, and every function gets its own [`Builder`].
pub struct MirLowering<'a> {
    hir: &'a HirContext,
    diagnostics: &'a mut DiagnosticEngine,
    options: LoweringOptions,
}

impl<'a> MirLowering<'a> {
    pub fn new(hir: &'a HirContext, diagnostics: &'a mut DiagnosticEngine) -> Self {
        Self {
            hir,
            diagnostics,
            options: LoweringOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoweringOptions) -> Self {
        self.options = options;
        self
    }

    /// An invalid module id yields an empty module.
    pub fn lower_module(&mut self, module: HirModuleId) -> MirModule {
        let hir = self.hir;
        let Some(module) = hir.try_get::<HirModule>(module) else {
            return MirModule::default();
        };
        let tables = ModuleTables::collect(hir, module, self.diagnostics);
        let mut mir = MirModule::new(module.name.clone(), module.span);

        for decl_id in &module.decls {
            let decl = hir.get::<HirDecl>(*decl_id);
            match &decl.kind {
                HirDeclKind::Fn(func) => {
                    let function = self.lower_function(&tables, func, decl.span);
                    mir.functions.push(function);
                }
                HirDeclKind::Form { name, fields } => mir.structs.push(MirStructDecl {
                    name: name.clone(),
                    fields: fields
                        .iter()
                        .map(|field| MirField {
                            name: field.name.clone(),
                            ty: types::signature_type(hir, field.ty),
                        })
                        .collect(),
                }),
                HirDeclKind::Pick { name, cases } => {
                    let cases: Vec<MirPickCase> = cases
                        .iter()
                        .map(|case| MirPickCase {
                            name: case.name.clone(),
                            tag: tables.pick_tag(name, &case.name).unwrap_or_default(),
                            fields: tables
                                .case_fields(name, &case.name)
                                .map(<[MirField]>::to_vec)
                                .unwrap_or_default(),
                        })
                        .collect();
                    let enum_like = tables.enum_like.contains(name);
                    if enum_like {
                        mir.enums.push(MirEnumDecl {
                            name: name.clone(),
                            items: cases.iter().map(|case| case.name.clone()).collect(),
                        });
                    }
                    mir.picks.push(MirPickDecl {
                        name: name.clone(),
                        cases,
                        enum_like,
                    });
                }
                HirDeclKind::Const { name, ty, .. } => {
                    let init = tables.consts.get(name).cloned();
                    let ty = if ty.is_valid() {
                        types::lower_type(hir, *ty)
                    } else {
                        init.as_ref()
                            .map_or_else(MirType::unknown, |c| MirType::named(c.kind.type_name()))
                    };
                    mir.globals.push(MirGlobal {
                        name: name.clone(),
                        ty,
                        is_mut: false,
                        init,
                    });
                }
                HirDeclKind::Global {
                    name,
                    ty,
                    value,
                    is_mut,
                } => {
                    let init = self.global_init(*value, decl.span);
                    let ty = if ty.is_valid() {
                        types::lower_type(hir, *ty)
                    } else {
                        init.as_ref()
                            .map_or_else(MirType::unknown, |c| MirType::named(c.kind.type_name()))
                    };
                    mir.globals.push(MirGlobal {
                        name: name.clone(),
                        ty,
                        is_mut: *is_mut,
                        init,
                    });
                }
            }
        }

        tracing::debug!(
            "lowered module `{}`: {} function(s), {} struct(s), {} pick(s), {} global(s)",
            mir.name,
            mir.functions.len(),
            mir.structs.len(),
            mir.picks.len(),
            mir.globals.len()
        );
        mir
    }

    /// Literal initializer of a global; globals without one are
    /// zero-initialised by the backend.
    fn global_init(&mut self, value: HirExprId, span: Span) -> Option<MirConst> {
        let hir = self.hir;
        let expr = hir.try_get::<HirExpr>(value)?;
        match &expr.kind {
            HirExprKind::Literal { kind, value } => Some(MirConst::new(
                types::const_kind(*kind),
                value.clone(),
                expr.span,
            )),
            _ => {
                self.diagnostics.add_diagnostic(
                    Diagnostic::error("global initializer must be a literal")
                        .with_span(span)
                        .with_source_context(DIAGNOSTIC_CONTEXT),
                );
                None
            }
        }
    }

    /// Lowers one function. Functions without a body keep a single empty,
    /// unterminated entry block, which marks them as declarations.
    pub fn lower_function(
        &mut self,
        tables: &ModuleTables,
        func: &HirFnDecl,
        span: Span,
    ) -> MirFunction {
        tracing::debug!("lowering function `{}` to MIR", func.name);
        let hir = self.hir;
        let function = MirFunction::new(
            func.name.clone(),
            types::return_type(hir, func.return_type),
            span,
        );

        let mut builder = Builder::new(hir, tables, &self.options, self.diagnostics, function);
        for param in &func.params {
            let ty = if param.ty.is_valid() {
                types::signature_type(hir, param.ty)
            } else {
                MirType::unknown()
            };
            builder.declare_param(&param.name, ty);
        }

        let entry = builder.new_block(span);
        builder.set_current(entry);
        if func.body.is_valid() {
            builder.lower_block(func.body);
            builder.terminate(MirTerminator::Return { value: None, span });
        }
        builder.finish()
    }
}

impl IrTransform<HirModuleId, MirModule> for MirLowering<'_> {
    fn transform(&mut self, module: HirModuleId) -> Result<MirModule> {
        Ok(self.lower_module(module))
    }
}

/// Lowers `module` with default options.
pub fn build_mir_module(
    hir: &HirContext,
    module: HirModuleId,
    diagnostics: &mut DiagnosticEngine,
) -> MirModule {
    MirLowering::new(hir, diagnostics).lower_module(module)
}
