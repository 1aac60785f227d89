// vitte-lowering: the middle-end passes between the resolved AST and the
// C backend.
//
// Architecture:
// - transformations: AST→HIR desugaring and HIR→MIR control-flow lowering
// - passes: read-only checks run between transformations
// - pipeline: drives the passes over one module and collects diagnostics

pub mod passes;
pub mod pipeline;
pub mod transformations;

pub use pipeline::{LoweredModule, LoweringPipeline};
pub use transformations::{lower_to_hir, HirGenerator, IrTransform, MirLowering};
