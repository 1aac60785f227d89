#![allow(dead_code)]

pub mod assertions;
pub mod ast;

use vitte_core::ast::ModuleId;
use vitte_core::diagnostics::DiagnosticEngine;
use vitte_core::hir::{HirContext, HirModuleId};
use vitte_core::mir::MirModule;
use vitte_lowering::transformations::{lower_to_hir, MirLowering};

/// HIR and MIR for one module, lowered without the validation passes so
/// tests see exactly the diagnostics of the two transformations.
pub struct Lowered {
    pub hir: HirContext,
    pub hir_module: HirModuleId,
    pub mir: MirModule,
    pub diagnostics: DiagnosticEngine,
}

pub fn lower(builder: &ast::AstBuilder, module: ModuleId) -> Lowered {
    let mut hir = HirContext::new();
    let mut diagnostics = DiagnosticEngine::new();
    let hir_module = lower_to_hir(&builder.ctx, module, &mut hir, &mut diagnostics);
    let mir = MirLowering::new(&hir, &mut diagnostics).lower_module(hir_module);
    Lowered {
        hir,
        hir_module,
        mir,
        diagnostics,
    }
}
