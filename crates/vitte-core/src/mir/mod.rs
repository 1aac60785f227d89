//! Mid-level IR: per-function control-flow graphs of basic blocks plus the
//! module-level declarations a C-like backend needs.
//!
//! Block ids are dense and equal to the block's index in
//! [`MirFunction::blocks`]. A block is terminated at most once; a function
//! with a single empty, unterminated entry block is a declaration only.

use crate::span::Span;
use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod pretty;
pub mod verify;

pub type MirBlockId = usize;

/// Type name recorded for values whose type could not be determined.
pub const UNKNOWN_TYPE: &str = "unknown";
/// Type name used for type parameters and other erased types.
pub const ANY_TYPE: &str = "VitteAny";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirType {
    Named(String),
    Proc {
        params: Vec<MirType>,
        ret: Box<MirType>,
    },
}

impl MirType {
    pub fn named(name: impl Into<String>) -> Self {
        MirType::Named(name.into())
    }

    pub fn unknown() -> Self {
        MirType::Named(UNKNOWN_TYPE.to_string())
    }

    /// The spelling used in local-type tracking and by the backend.
    pub fn name(&self) -> &str {
        match self {
            MirType::Named(name) => name,
            MirType::Proc { .. } => "proc",
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name() == UNKNOWN_TYPE
    }

    pub fn is_pointer(&self) -> bool {
        self.name().starts_with('*')
    }

    /// Whether calls returning this type produce no value.
    pub fn is_unit(&self) -> bool {
        is_unit_type_name(self.name())
    }
}

impl fmt::Display for MirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirType::Named(name) => write!(f, "{name}"),
            MirType::Proc { params, ret } => {
                write!(f, "proc(")?;
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
        }
    }
}

/// `Unit`, `unit`, `void`, or any qualified spelling ending in `Unit`.
pub fn is_unit_type_name(name: &str) -> bool {
    matches!(name, "Unit" | "unit" | "void") || name.ends_with("Unit")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirConstKind {
    Int,
    Bool,
    String,
}

impl MirConstKind {
    pub fn type_name(self) -> &'static str {
        match self {
            MirConstKind::Int => "i32",
            MirConstKind::Bool => "bool",
            MirConstKind::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirConst {
    pub kind: MirConstKind,
    pub value: String,
    pub span: Span,
}

impl MirConst {
    pub fn new(kind: MirConstKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(MirConstKind::Int, value.to_string(), span)
    }

    pub fn bool(value: bool, span: Span) -> Self {
        Self::new(MirConstKind::Bool, if value { "true" } else { "false" }, span)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirLocal {
    pub name: String,
    pub ty: MirType,
    pub span: Span,
}

impl MirLocal {
    pub fn new(name: impl Into<String>, ty: MirType, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirMember {
    pub base: Box<MirValue>,
    pub member: String,
    /// Access goes through a pointer (`->` rather than `.`).
    pub pointer: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, From)]
pub enum MirValue {
    Const(MirConst),
    Local(MirLocal),
    Member(MirMember),
}

impl MirValue {
    pub fn span(&self) -> Span {
        match self {
            MirValue::Const(c) => c.span,
            MirValue::Local(local) => local.span,
            MirValue::Member(member) => member.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirBinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl MirBinOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            MirBinOp::Eq | MirBinOp::Ne | MirBinOp::Lt | MirBinOp::Le | MirBinOp::Gt | MirBinOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, MirBinOp::And | MirBinOp::Or)
    }

    /// Result type of the operation: comparisons and logic yield `bool`.
    pub fn result_type(self) -> MirType {
        if self.is_comparison() || self.is_logical() {
            MirType::named("bool")
        } else {
            MirType::named("i32")
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MirBinOp::Add => "+",
            MirBinOp::Sub => "-",
            MirBinOp::Mul => "*",
            MirBinOp::Div => "/",
            MirBinOp::Mod => "%",
            MirBinOp::Eq => "==",
            MirBinOp::Ne => "!=",
            MirBinOp::Lt => "<",
            MirBinOp::Le => "<=",
            MirBinOp::Gt => ">",
            MirBinOp::Ge => ">=",
            MirBinOp::And => "&&",
            MirBinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirInstr {
    Assign {
        dest: MirLocal,
        value: MirValue,
        span: Span,
    },
    BinaryOp {
        op: MirBinOp,
        dest: MirLocal,
        lhs: MirValue,
        rhs: MirValue,
        span: Span,
    },
    /// Direct call; `dest` is `None` for calls returning unit.
    Call {
        callee: String,
        args: Vec<MirValue>,
        dest: Option<MirLocal>,
        span: Span,
    },
    CallIndirect {
        callee: MirValue,
        args: Vec<MirValue>,
        dest: Option<MirLocal>,
        span: Span,
    },
    Asm {
        code: String,
        is_volatile: bool,
        span: Span,
    },
    UnsafeBegin {
        span: Span,
    },
    UnsafeEnd {
        span: Span,
    },
}

impl MirInstr {
    pub fn span(&self) -> Span {
        match self {
            MirInstr::Assign { span, .. }
            | MirInstr::BinaryOp { span, .. }
            | MirInstr::Call { span, .. }
            | MirInstr::CallIndirect { span, .. }
            | MirInstr::Asm { span, .. }
            | MirInstr::UnsafeBegin { span }
            | MirInstr::UnsafeEnd { span } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirTerminator {
    Goto {
        target: MirBlockId,
        span: Span,
    },
    CondGoto {
        cond: MirValue,
        then_block: MirBlockId,
        else_block: MirBlockId,
        span: Span,
    },
    Return {
        value: Option<MirValue>,
        span: Span,
    },
}

impl MirTerminator {
    pub fn successors(&self) -> Vec<MirBlockId> {
        match self {
            MirTerminator::Goto { target, .. } => vec![*target],
            MirTerminator::CondGoto {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            MirTerminator::Return { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirBasicBlock {
    pub id: MirBlockId,
    pub instructions: Vec<MirInstr>,
    pub terminator: Option<MirTerminator>,
    pub span: Span,
}

impl MirBasicBlock {
    pub fn new(id: MirBlockId, span: Span) -> Self {
        Self {
            id,
            instructions: Vec::new(),
            terminator: None,
            span,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirParam {
    pub name: String,
    pub ty: MirType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirFunction {
    pub name: String,
    pub params: Vec<MirParam>,
    pub locals: Vec<MirLocal>,
    pub blocks: Vec<MirBasicBlock>,
    pub entry: MirBlockId,
    pub return_type: MirType,
    pub span: Span,
}

impl MirFunction {
    pub fn new(name: impl Into<String>, return_type: MirType, span: Span) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            locals: Vec::new(),
            blocks: Vec::new(),
            entry: 0,
            return_type,
            span,
        }
    }

    /// A function without a body: all blocks empty and unterminated.
    pub fn is_declaration(&self) -> bool {
        self.blocks
            .iter()
            .all(|block| block.instructions.is_empty() && block.terminator.is_none())
    }

    pub fn block(&self, id: MirBlockId) -> Option<&MirBasicBlock> {
        self.blocks.get(id)
    }

    pub fn local(&self, name: &str) -> Option<&MirLocal> {
        self.locals.iter().find(|local| local.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirField {
    pub name: String,
    pub ty: MirType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirStructDecl {
    pub name: String,
    pub fields: Vec<MirField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirPickCase {
    pub name: String,
    /// Dense 0-based discriminant in declaration order.
    pub tag: u32,
    pub fields: Vec<MirField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirPickDecl {
    pub name: String,
    pub cases: Vec<MirPickCase>,
    /// All cases are nullary.
    pub enum_like: bool,
}

impl MirPickDecl {
    pub fn case(&self, name: &str) -> Option<&MirPickCase> {
        self.cases.iter().find(|case| case.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirEnumDecl {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirGlobal {
    pub name: String,
    pub ty: MirType,
    pub is_mut: bool,
    pub init: Option<MirConst>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirModule {
    pub name: String,
    pub structs: Vec<MirStructDecl>,
    pub enums: Vec<MirEnumDecl>,
    pub picks: Vec<MirPickDecl>,
    pub globals: Vec<MirGlobal>,
    pub functions: Vec<MirFunction>,
    pub span: Span,
}

impl MirModule {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            ..Self::default()
        }
    }

    pub fn function(&self, name: &str) -> Option<&MirFunction> {
        self.functions.iter().find(|func| func.name == name)
    }

    pub fn pick(&self, name: &str) -> Option<&MirPickDecl> {
        self.picks.iter().find(|pick| pick.name == name)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
