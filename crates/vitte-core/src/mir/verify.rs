//! Structural checks on lowered MIR.
//!
//! These catch lowering bugs, not user errors: a well-formed function has
//! dense block ids starting at its entry, every block terminated, and every
//! branch target in range.

use super::{MirBlockId, MirFunction, MirModule};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirVerifyError {
    #[error("function `{function}` has no blocks")]
    NoBlocks { function: String },
    #[error("function `{function}` enters at bb{entry}, expected bb0")]
    BadEntry { function: String, entry: MirBlockId },
    #[error("function `{function}`: block at index {index} carries id bb{id}")]
    BlockIdMismatch {
        function: String,
        index: usize,
        id: MirBlockId,
    },
    #[error("function `{function}`: bb{block} has no terminator")]
    Unterminated { function: String, block: MirBlockId },
    #[error("function `{function}`: bb{block} jumps to missing bb{target}")]
    DanglingTarget {
        function: String,
        block: MirBlockId,
        target: MirBlockId,
    },
}

impl MirVerifyError {
    pub fn function(&self) -> &str {
        match self {
            MirVerifyError::NoBlocks { function }
            | MirVerifyError::BadEntry { function, .. }
            | MirVerifyError::BlockIdMismatch { function, .. }
            | MirVerifyError::Unterminated { function, .. }
            | MirVerifyError::DanglingTarget { function, .. } => function,
        }
    }
}

pub fn verify_function(func: &MirFunction) -> Result<(), MirVerifyError> {
    let function = || func.name.clone();

    if func.blocks.is_empty() {
        return Err(MirVerifyError::NoBlocks {
            function: function(),
        });
    }
    if func.entry != 0 {
        return Err(MirVerifyError::BadEntry {
            function: function(),
            entry: func.entry,
        });
    }
    if func.is_declaration() {
        return Ok(());
    }

    for (index, block) in func.blocks.iter().enumerate() {
        if block.id != index {
            return Err(MirVerifyError::BlockIdMismatch {
                function: function(),
                index,
                id: block.id,
            });
        }
        let Some(terminator) = &block.terminator else {
            return Err(MirVerifyError::Unterminated {
                function: function(),
                block: block.id,
            });
        };
        if let Some(target) = terminator
            .successors()
            .into_iter()
            .find(|target| *target >= func.blocks.len())
        {
            return Err(MirVerifyError::DanglingTarget {
                function: function(),
                block: block.id,
                target,
            });
        }
    }
    Ok(())
}

pub fn verify_module(module: &MirModule) -> Result<(), MirVerifyError> {
    module.functions.iter().try_for_each(verify_function)
}
