use vitte_core::ast::{
    AstContext, AstId, BinaryOp, Decl, DeclKind, Expr, ExprKind, FieldDecl, Ident, LiteralKind,
    Module, ModuleId, Param, Pattern, PatternKind, PickCase, ProcDecl, ProcKeyword, Stmt,
    StmtKind, TypeKind, TypeNode, UnaryOp,
};
use vitte_core::span::Span;

/// Builds resolved AST fixtures. Every node gets a distinct span so span
/// propagation can be checked.
pub struct AstBuilder {
    pub ctx: AstContext,
    next_lo: u32,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            ctx: AstContext::new(),
            next_lo: 0,
        }
    }

    pub fn span(&mut self) -> Span {
        let lo = self.next_lo;
        self.next_lo += 2;
        Span::new(1, lo, lo + 1)
    }

    fn ident(&mut self, name: &str) -> Ident {
        let span = self.span();
        Ident::new(name, span)
    }

    pub fn span_of(&self, id: AstId) -> Span {
        match self.ctx.node(id) {
            vitte_core::ast::AstNode::Expr(e) => e.span,
            vitte_core::ast::AstNode::Stmt(s) => s.span,
            vitte_core::ast::AstNode::Decl(d) => d.span,
            vitte_core::ast::AstNode::Type(t) => t.span,
            vitte_core::ast::AstNode::Pattern(p) => p.span,
            vitte_core::ast::AstNode::Module(m) => m.span,
        }
    }

    // -- expressions ------------------------------------------------------

    pub fn expr(&mut self, kind: ExprKind) -> AstId {
        let span = self.span();
        self.ctx.make(Expr { kind, span })
    }

    fn literal(&mut self, kind: LiteralKind, value: impl Into<String>) -> AstId {
        self.expr(ExprKind::Literal {
            kind,
            value: value.into(),
        })
    }

    pub fn int(&mut self, value: i64) -> AstId {
        self.literal(LiteralKind::Int, value.to_string())
    }

    pub fn bool(&mut self, value: bool) -> AstId {
        self.literal(LiteralKind::Bool, value.to_string())
    }

    pub fn string(&mut self, value: &str) -> AstId {
        self.literal(LiteralKind::String, value)
    }

    pub fn var(&mut self, name: &str) -> AstId {
        let ident = self.ident(name);
        self.expr(ExprKind::Ident(ident))
    }

    pub fn unary(&mut self, op: UnaryOp, expr: AstId) -> AstId {
        self.expr(ExprKind::Unary { op, expr })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: AstId, rhs: AstId) -> AstId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn call(&mut self, callee: AstId, args: Vec<AstId>) -> AstId {
        self.expr(ExprKind::Invoke {
            callee_expr: callee,
            callee_type: AstId::INVALID,
            args,
        })
    }

    pub fn call_named(&mut self, name: &str, args: Vec<AstId>) -> AstId {
        let callee = self.var(name);
        self.call(callee, args)
    }

    pub fn member(&mut self, base: AstId, member: &str) -> AstId {
        let member = self.ident(member);
        self.expr(ExprKind::Member {
            base,
            member,
            base_is_type: false,
        })
    }

    /// `Type.member` where resolution marked the base as a type.
    pub fn static_member(&mut self, type_name: &str, member: &str) -> AstId {
        let base = self.var(type_name);
        let member = self.ident(member);
        self.expr(ExprKind::Member {
            base,
            member,
            base_is_type: true,
        })
    }

    // -- types ------------------------------------------------------------

    pub fn ty(&mut self, kind: TypeKind) -> AstId {
        let span = self.span();
        self.ctx.make(TypeNode { kind, span })
    }

    pub fn builtin_type(&mut self, name: &str) -> AstId {
        self.ty(TypeKind::Builtin {
            name: name.to_string(),
        })
    }

    pub fn named_type(&mut self, name: &str) -> AstId {
        let ident = self.ident(name);
        self.ty(TypeKind::Named { ident })
    }

    pub fn proc_type(&mut self, params: Vec<AstId>, ret: AstId) -> AstId {
        self.ty(TypeKind::Proc { params, ret })
    }

    // -- statements -------------------------------------------------------

    pub fn stmt(&mut self, kind: StmtKind) -> AstId {
        let span = self.span();
        self.ctx.make(Stmt { kind, span })
    }

    pub fn block(&mut self, stmts: Vec<AstId>) -> AstId {
        self.stmt(StmtKind::Block { stmts })
    }

    pub fn let_(&mut self, name: &str, ty: AstId, initializer: AstId) -> AstId {
        let ident = self.ident(name);
        self.stmt(StmtKind::Let {
            ident,
            ty,
            initializer,
        })
    }

    pub fn ret(&mut self, expr: AstId) -> AstId {
        self.stmt(StmtKind::Return { expr })
    }

    pub fn expr_stmt(&mut self, expr: AstId) -> AstId {
        self.stmt(StmtKind::Expr { expr })
    }

    pub fn if_(&mut self, cond: AstId, then_block: AstId, else_block: AstId) -> AstId {
        self.stmt(StmtKind::If {
            cond,
            then_block,
            else_block,
        })
    }

    pub fn loop_(&mut self, body: AstId) -> AstId {
        self.stmt(StmtKind::Loop { body })
    }

    pub fn select(&mut self, expr: AstId, whens: Vec<AstId>, otherwise_block: AstId) -> AstId {
        self.stmt(StmtKind::Select {
            expr,
            whens,
            otherwise_block,
        })
    }

    pub fn when(&mut self, pattern: AstId, block: AstId) -> AstId {
        self.stmt(StmtKind::When { pattern, block })
    }

    // -- patterns ---------------------------------------------------------

    pub fn pat_ident(&mut self, name: &str) -> AstId {
        let ident = self.ident(name);
        let span = self.span();
        self.ctx.make(Pattern {
            kind: PatternKind::Ident { ident },
            span,
        })
    }

    pub fn pat_ctor(&mut self, type_name: &str, args: Vec<AstId>) -> AstId {
        let ty = self.named_type(type_name);
        let span = self.span();
        self.ctx.make(Pattern {
            kind: PatternKind::Ctor { ty, args },
            span,
        })
    }

    pub fn pattern(&mut self, kind: PatternKind) -> AstId {
        let span = self.span();
        self.ctx.make(Pattern { kind, span })
    }

    // -- declarations -----------------------------------------------------

    pub fn decl(&mut self, kind: DeclKind) -> AstId {
        let span = self.span();
        self.ctx.make(Decl { kind, span })
    }

    pub fn proc_(&mut self, name: &str, params: Vec<(&str, AstId)>, return_type: AstId, body: AstId) -> AstId {
        let name = self.ident(name);
        let params = params
            .into_iter()
            .map(|(param, ty)| Param {
                ident: self.ident(param),
                ty,
            })
            .collect();
        self.decl(DeclKind::Proc(ProcDecl {
            keyword: ProcKeyword::Proc,
            name,
            params,
            return_type,
            body,
        }))
    }

    /// Declaration-only proc.
    pub fn extern_proc(&mut self, name: &str, params: Vec<(&str, AstId)>, return_type: AstId) -> AstId {
        self.proc_(name, params, return_type, AstId::INVALID)
    }

    fn fields(&mut self, fields: Vec<(&str, AstId)>) -> Vec<FieldDecl> {
        fields
            .into_iter()
            .map(|(name, ty)| FieldDecl {
                ident: self.ident(name),
                ty,
            })
            .collect()
    }

    pub fn form(&mut self, name: &str, fields: Vec<(&str, AstId)>) -> AstId {
        let name = self.ident(name);
        let fields = self.fields(fields);
        self.decl(DeclKind::Form { name, fields })
    }

    pub fn pick(&mut self, name: &str, cases: Vec<(&str, Vec<(&str, AstId)>)>) -> AstId {
        let name = self.ident(name);
        let cases = cases
            .into_iter()
            .map(|(case, fields)| PickCase {
                ident: self.ident(case),
                fields: self.fields(fields),
            })
            .collect();
        self.decl(DeclKind::Pick { name, cases })
    }

    pub fn const_(&mut self, name: &str, ty: AstId, value: AstId) -> AstId {
        let name = self.ident(name);
        self.decl(DeclKind::Const { name, ty, value })
    }

    pub fn global(&mut self, name: &str, ty: AstId, value: AstId, is_mut: bool) -> AstId {
        let name = self.ident(name);
        self.decl(DeclKind::Global {
            name,
            ty,
            value,
            is_mut,
        })
    }

    pub fn module(&mut self, name: &str, decls: Vec<AstId>) -> ModuleId {
        let span = self.span();
        self.ctx.make(Module {
            name: name.to_string(),
            decls,
            span,
        })
    }
}
