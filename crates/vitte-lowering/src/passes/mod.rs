pub mod validate_hir;

pub use validate_hir::validate_hir;
