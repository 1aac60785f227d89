//! Resolved AST handed over by the front-end.
//!
//! The tree is stored flat in an [`AstContext`]; children are referenced by
//! [`AstId`] and may be [`AstId::INVALID`] when absent. Name resolution has
//! already run, so member accesses on type names carry `base_is_type`.

use crate::arena::Arena;
use crate::span::Span;
use derive_more::From;

define_id! {
    /// Handle to a node in an [`AstContext`].
    pub struct AstId;
}

pub type ExprId = AstId;
pub type StmtId = AstId;
pub type DeclId = AstId;
pub type TypeId = AstId;
pub type PatternId = AstId;
pub type ModuleId = AstId;

pub type AstContext = Arena<AstId, AstNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, From)]
pub enum AstNode {
    Expr(Expr),
    Stmt(Stmt),
    Decl(Decl),
    Type(TypeNode),
    Pattern(Pattern),
    Module(Module),
}

impl_arena_node!(AstNode, Expr, Expr, "expression");
impl_arena_node!(AstNode, Stmt, Stmt, "statement");
impl_arena_node!(AstNode, Decl, Decl, "declaration");
impl_arena_node!(AstNode, Type, TypeNode, "type");
impl_arena_node!(AstNode, Pattern, Pattern, "pattern");
impl_arena_node!(AstNode, Module, Module, "module");

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Bool,
    Int,
    Float,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
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
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal {
        kind: LiteralKind,
        value: String,
    },
    Ident(Ident),
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `callee(args)`; exactly one of `callee_expr` / `callee_type` is
    /// normally valid, the latter for constructor-style invocations.
    Invoke {
        callee_expr: ExprId,
        callee_type: TypeId,
        args: Vec<ExprId>,
    },
    /// `callee arg`
    CallNoParen {
        callee: Ident,
        arg: ExprId,
    },
    List {
        items: Vec<ExprId>,
    },
    Member {
        base: ExprId,
        member: Ident,
        base_is_type: bool,
    },
    Index {
        base: ExprId,
        index: ExprId,
    },
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Block {
        stmts: Vec<StmtId>,
    },
    Unsafe {
        body: StmtId,
    },
    Asm {
        code: String,
    },
    Let {
        ident: Ident,
        ty: TypeId,
        initializer: ExprId,
    },
    Make {
        ident: Ident,
        ty: TypeId,
        value: ExprId,
    },
    Set {
        ident: Ident,
        value: ExprId,
    },
    Give {
        value: ExprId,
    },
    Emit {
        value: ExprId,
    },
    Expr {
        expr: ExprId,
    },
    Return {
        expr: ExprId,
    },
    If {
        cond: ExprId,
        then_block: StmtId,
        else_block: StmtId,
    },
    Loop {
        body: StmtId,
    },
    For {
        ident: Ident,
        iterable: ExprId,
        body: StmtId,
    },
    Select {
        expr: ExprId,
        whens: Vec<StmtId>,
        otherwise_block: StmtId,
    },
    When {
        pattern: PatternId,
        block: StmtId,
    },
    Break,
    Continue,
}

// ---------------------------------------------------------------------------
// Types & patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Builtin { name: String },
    Named { ident: Ident },
    Generic { base: Ident, args: Vec<TypeId> },
    Pointer { pointee: TypeId },
    Slice { elem: TypeId },
    Proc { params: Vec<TypeId>, ret: TypeId },
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Ident { ident: Ident },
    Ctor { ty: TypeId, args: Vec<PatternId> },
    Wildcard,
    Literal { kind: LiteralKind, value: String },
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcKeyword {
    Proc,
    Fn,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ident: Ident,
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub ident: Ident,
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct PickCase {
    pub ident: Ident,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
pub struct ProcDecl {
    pub keyword: ProcKeyword,
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: TypeId,
    /// Invalid for declaration-only (extern) procs.
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Proc(ProcDecl),
    Entry {
        name: Ident,
        body: StmtId,
    },
    Macro {
        name: Ident,
        params: Vec<Ident>,
        body: StmtId,
    },
    Const {
        name: Ident,
        ty: TypeId,
        value: ExprId,
    },
    Global {
        name: Ident,
        ty: TypeId,
        value: ExprId,
        is_mut: bool,
    },
    Form {
        name: Ident,
        fields: Vec<FieldDecl>,
    },
    Pick {
        name: Ident,
        cases: Vec<PickCase>,
    },
    Use {
        path: Vec<Ident>,
    },
    TypeAlias {
        name: Ident,
        ty: TypeId,
    },
}

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub decls: Vec<DeclId>,
    pub span: Span,
}
