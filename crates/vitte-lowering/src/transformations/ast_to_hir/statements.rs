use super::HirGenerator;
use vitte_core::ast::{Stmt, StmtId, StmtKind};
use vitte_core::diagnostics::DiagId;
use vitte_core::hir::{HirExprKind, HirId, HirLiteralKind, HirStmt, HirStmtKind};

impl HirGenerator<'_> {
    /// Lowers a block, dropping statements whose lowering failed. A
    /// non-block statement is lowered as a one-statement block.
    pub fn lower_block(&mut self, id: StmtId) -> HirId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let stmt = ast.get::<Stmt>(id);
        let stmts = match &stmt.kind {
            StmtKind::Block { stmts } => stmts
                .iter()
                .map(|stmt| self.lower_stmt(*stmt))
                .filter(|stmt| stmt.is_valid())
                .collect(),
            _ => {
                let lowered = self.lower_stmt(id);
                if lowered.is_valid() {
                    vec![lowered]
                } else {
                    Vec::new()
                }
            }
        };
        self.make_stmt(HirStmtKind::Block { stmts }, stmt.span)
    }

    pub fn lower_stmt(&mut self, id: StmtId) -> HirId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let stmt = ast.get::<Stmt>(id);
        let span = stmt.span;

        let kind = match &stmt.kind {
            StmtKind::Block { .. } => return self.lower_block(id),
            StmtKind::Unsafe { body } => {
                let mut stmts = vec![self.make_call_stmt("unsafe_begin", Vec::new(), span)];
                let inner = self.lower_block(*body);
                if let Some(HirStmt {
                    kind: HirStmtKind::Block { stmts: inner },
                    ..
                }) = self.hir.try_get::<HirStmt>(inner)
                {
                    stmts.extend(inner.iter().copied());
                }
                stmts.push(self.make_call_stmt("unsafe_end", Vec::new(), span));
                HirStmtKind::Block { stmts }
            }
            StmtKind::Asm { code } => {
                let code = self.make_expr(
                    HirExprKind::Literal {
                        kind: HirLiteralKind::String,
                        value: code.clone(),
                    },
                    span,
                );
                return self.make_call_stmt("asm", vec![code], span);
            }
            StmtKind::Let {
                ident,
                ty,
                initializer: value,
            }
            | StmtKind::Make { ident, ty, value } => HirStmtKind::Let {
                name: ident.name.clone(),
                ty: self.lower_type(*ty),
                init: self.lower_expr(*value),
            },
            StmtKind::Set { ident, value } => {
                let target = self.make_var(ident.name.clone(), ident.span);
                let value = self.lower_expr(*value);
                return self.make_call_stmt("set", vec![target, value], span);
            }
            StmtKind::Emit { value } => {
                let value = self.lower_expr(*value);
                return self.make_call_stmt("emit", vec![value], span);
            }
            StmtKind::Give { value: expr } | StmtKind::Return { expr } => HirStmtKind::Return {
                expr: self.lower_expr(*expr),
            },
            StmtKind::Expr { expr } => {
                let expr = self.lower_expr(*expr);
                if !expr.is_valid() {
                    return HirId::INVALID;
                }
                HirStmtKind::Expr { expr }
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => HirStmtKind::If {
                cond: self.lower_expr(*cond),
                then_block: self.lower_block(*then_block),
                // `else if` chains arrive as a nested if statement.
                else_block: self.lower_stmt(*else_block),
            },
            StmtKind::Loop { body } => HirStmtKind::Loop {
                body: self.lower_block(*body),
            },
            StmtKind::Select {
                expr,
                whens,
                otherwise_block,
            } => {
                let expr = self.lower_expr(*expr);
                let whens = whens
                    .iter()
                    .map(|when| self.lower_stmt(*when))
                    .filter(|when| when.is_valid())
                    .collect();
                HirStmtKind::Select {
                    expr,
                    whens,
                    otherwise: self.lower_block(*otherwise_block),
                }
            }
            StmtKind::When { pattern, block } => HirStmtKind::When {
                pattern: self.lower_pattern(*pattern),
                block: self.lower_block(*block),
            },
            StmtKind::Break => HirStmtKind::Break,
            StmtKind::Continue => HirStmtKind::Continue,
            StmtKind::For { .. } => {
                self.report(DiagId::UnsupportedStatementInHir, span);
                return HirId::INVALID;
            }
        };
        self.make_stmt(kind, span)
    }
}
