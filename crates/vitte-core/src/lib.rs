//! Data models shared by the Vitte middle-end: the resolved AST, HIR and
//! MIR, plus diagnostics and lowering options.

#[macro_use]
pub mod arena;

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hir;
pub mod mir;
pub mod pretty;
pub mod span;

pub use tracing;

pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
