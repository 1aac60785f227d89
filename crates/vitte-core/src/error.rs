use crate::diagnostics::Diagnostic;
use crate::mir::verify::MirVerifyError;
use std::result;
use thiserror::Error;

#[derive(Error, Debug, miette::Diagnostic)]
pub enum Error {
    #[error("lowering failed with {error_count} error(s)")]
    #[diagnostic(code(vitte::lowering_failed))]
    LoweringFailed {
        error_count: usize,
        diagnostics: Vec<Diagnostic>,
    },
    #[error("malformed MIR: {0}")]
    #[diagnostic(code(vitte::malformed_mir), help("this is a compiler bug"))]
    MalformedMir(#[from] MirVerifyError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Diagnostics attached to a failed lowering, empty for other errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::LoweringFailed { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}
