use crate::passes::validate_hir;
use crate::transformations::{lower_to_hir, MirLowering};
use vitte_core::ast::{AstContext, ModuleId};
use vitte_core::config::LoweringOptions;
use vitte_core::diagnostics::{Diagnostic, DiagnosticEngine};
use vitte_core::error::Error;
use vitte_core::hir::{HirContext, HirModuleId};
use vitte_core::mir::verify::verify_module;
use vitte_core::mir::MirModule;
use vitte_core::Result;

/// Everything produced for one module.
#[derive(Debug)]
pub struct LoweredModule {
    pub hir: HirContext,
    pub hir_module: HirModuleId,
    pub mir: MirModule,
    /// Warnings, and errors when running lossy.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs AST→HIR, HIR validation, HIR→MIR and MIR verification over one
/// module. User errors from every stage are collected before the pipeline
/// decides whether the module failed.
#[derive(Debug, Clone, Default)]
pub struct LoweringPipeline {
    options: LoweringOptions,
}

impl LoweringPipeline {
    pub fn new(options: LoweringOptions) -> Self {
        Self { options }
    }

    pub fn from_env() -> Self {
        Self::new(LoweringOptions::from_env())
    }

    pub fn options(&self) -> &LoweringOptions {
        &self.options
    }

    pub fn run(&self, ast: &AstContext, module: ModuleId) -> Result<LoweredModule> {
        let mut diagnostics = DiagnosticEngine::new();
        let mut hir = HirContext::new();

        let hir_module = lower_to_hir(ast, module, &mut hir, &mut diagnostics);
        if self.options.validate_hir {
            validate_hir(&hir, hir_module, &mut diagnostics);
        }

        let mir = MirLowering::new(&hir, &mut diagnostics)
            .with_options(self.options.clone())
            .lower_module(hir_module);

        if self.options.verify_mir {
            if let Err(err) = verify_module(&mir) {
                if !self.options.lossy {
                    return Err(Error::MalformedMir(err));
                }
                tracing::warn!("keeping malformed MIR in lossy mode: {}", err);
            }
        }

        if diagnostics.has_errors() && !self.options.lossy {
            return Err(Error::LoweringFailed {
                error_count: diagnostics.error_count(),
                diagnostics: diagnostics.take(),
            });
        }

        Ok(LoweredModule {
            hir,
            hir_module,
            mir,
            diagnostics: diagnostics.take(),
        })
    }
}
