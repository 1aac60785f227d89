//! High-level IR: the desugared, closed-kind tree the MIR builder consumes.
//!
//! Surface sugar is gone at this level: `give` is `return`, `make` is `let`,
//! `set`/`emit`/list literals are calls, and `unsafe`/`asm` blocks are
//! intrinsic calls. Every node remembers the span of the AST node it came
//! from.

use crate::arena::Arena;
use crate::span::Span;
use derive_more::From;

define_id! {
    /// Handle to a node in a [`HirContext`].
    pub struct HirId;
}

pub type HirExprId = HirId;
pub type HirStmtId = HirId;
pub type HirDeclId = HirId;
pub type HirTypeId = HirId;
pub type HirPatternId = HirId;
pub type HirModuleId = HirId;

pub type HirContext = Arena<HirId, HirNode>;

#[derive(Debug, Clone, From)]
pub enum HirNode {
    Type(HirType),
    Expr(HirExpr),
    Stmt(HirStmt),
    Pattern(HirPattern),
    Decl(HirDecl),
    Module(HirModule),
}

impl_arena_node!(HirNode, Type, HirType, "HIR type");
impl_arena_node!(HirNode, Expr, HirExpr, "HIR expression");
impl_arena_node!(HirNode, Stmt, HirStmt, "HIR statement");
impl_arena_node!(HirNode, Pattern, HirPattern, "HIR pattern");
impl_arena_node!(HirNode, Decl, HirDecl, "HIR declaration");
impl_arena_node!(HirNode, Module, HirModule, "HIR module");

impl HirNode {
    /// Category name used by the validator when a slot holds the wrong kind.
    pub fn category(&self) -> &'static str {
        match self {
            HirNode::Type(_) => "type",
            HirNode::Expr(_) => "expr",
            HirNode::Stmt(_) => "stmt",
            HirNode::Pattern(_) => "pattern",
            HirNode::Decl(_) => "decl",
            HirNode::Module(_) => "module",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HirType {
    pub kind: HirTypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum HirTypeKind {
    Named { name: String },
    Generic { base_name: String, args: Vec<HirTypeId> },
    Pointer { pointee: HirTypeId },
    Slice { elem: HirTypeId },
    Proc { params: Vec<HirTypeId>, ret: HirTypeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HirLiteralKind {
    Bool,
    Int,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HirUnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HirBinaryOp {
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

#[derive(Debug, Clone)]
pub struct HirExpr {
    pub kind: HirExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum HirExprKind {
    Literal {
        kind: HirLiteralKind,
        value: String,
    },
    Var {
        name: String,
    },
    Unary {
        op: HirUnaryOp,
        expr: HirExprId,
    },
    Binary {
        op: HirBinaryOp,
        lhs: HirExprId,
        rhs: HirExprId,
    },
    Call {
        callee: HirExprId,
        args: Vec<HirExprId>,
    },
    Member {
        base: HirExprId,
        member: String,
        base_is_type: bool,
    },
}

#[derive(Debug, Clone)]
pub struct HirStmt {
    pub kind: HirStmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum HirStmtKind {
    Let {
        name: String,
        ty: HirTypeId,
        init: HirExprId,
    },
    Expr {
        expr: HirExprId,
    },
    Return {
        expr: HirExprId,
    },
    Block {
        stmts: Vec<HirStmtId>,
    },
    If {
        cond: HirExprId,
        then_block: HirStmtId,
        else_block: HirStmtId,
    },
    Loop {
        body: HirStmtId,
    },
    Select {
        expr: HirExprId,
        whens: Vec<HirStmtId>,
        otherwise: HirStmtId,
    },
    When {
        pattern: HirPatternId,
        block: HirStmtId,
    },
    Break,
    Continue,
}

#[derive(Debug, Clone)]
pub struct HirPattern {
    pub kind: HirPatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum HirPatternKind {
    Ident { name: String },
    Ctor { type_name: String, args: Vec<HirPatternId> },
}

#[derive(Debug, Clone)]
pub struct HirParam {
    pub name: String,
    /// Invalid for untyped (macro) parameters.
    pub ty: HirTypeId,
}

#[derive(Debug, Clone)]
pub struct HirField {
    pub name: String,
    pub ty: HirTypeId,
}

#[derive(Debug, Clone)]
pub struct HirPickCase {
    pub name: String,
    pub fields: Vec<HirField>,
}

#[derive(Debug, Clone)]
pub struct HirFnDecl {
    pub name: String,
    pub params: Vec<HirParam>,
    pub return_type: HirTypeId,
    /// Invalid for declaration-only functions.
    pub body: HirStmtId,
}

#[derive(Debug, Clone)]
pub struct HirDecl {
    pub kind: HirDeclKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum HirDeclKind {
    Fn(HirFnDecl),
    Const {
        name: String,
        ty: HirTypeId,
        value: HirExprId,
    },
    Global {
        name: String,
        ty: HirTypeId,
        value: HirExprId,
        is_mut: bool,
    },
    Form {
        name: String,
        fields: Vec<HirField>,
    },
    Pick {
        name: String,
        cases: Vec<HirPickCase>,
    },
}

impl HirDeclKind {
    pub fn name(&self) -> &str {
        match self {
            HirDeclKind::Fn(func) => &func.name,
            HirDeclKind::Const { name, .. }
            | HirDeclKind::Global { name, .. }
            | HirDeclKind::Form { name, .. }
            | HirDeclKind::Pick { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HirModule {
    pub name: String,
    pub decls: Vec<HirDeclId>,
    pub span: Span,
}
