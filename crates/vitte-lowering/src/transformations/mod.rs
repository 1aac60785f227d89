use vitte_core::Result;

pub mod ast_to_hir;
pub mod hir_to_mir;

pub use ast_to_hir::{lower_to_hir, HirGenerator};
pub use hir_to_mir::{build_mir_module, Builder, MirLowering, ModuleTables};

/// A lowering step from one IR level to the next.
///
/// User errors never surface as `Err`: they are reported to the
/// transformation's diagnostic sink and lowering continues with
/// placeholders. `Err` is reserved for failures of the transformation itself.
pub trait IrTransform<Input, Output> {
    fn transform(&mut self, input: Input) -> Result<Output>;
}
