use super::builder::{Builder, LoopTargets};
use super::types::lower_type;
use vitte_core::hir::{HirExprId, HirStmt, HirStmtId, HirStmtKind, HirTypeId};
use vitte_core::mir::{MirConst, MirInstr, MirTerminator, MirType};
use vitte_core::span::Span;

impl Builder<'_> {
    /// Lowers the statements of a block in order. Statements after the
    /// current block has been terminated are unreachable and dropped.
    pub fn lower_block(&mut self, id: HirStmtId) {
        if !id.is_valid() {
            return;
        }
        let hir = self.hir;
        let stmt = hir.get::<HirStmt>(id);
        let HirStmtKind::Block { stmts } = &stmt.kind else {
            self.lower_stmt(id);
            return;
        };

        for (index, child) in stmts.iter().enumerate() {
            if self.is_terminated() {
                if self.options.warn_unreachable {
                    let span = hir.get::<HirStmt>(*child).span;
                    self.warning("unreachable statement", span);
                }
                tracing::debug!(
                    "dropping {} unreachable statement(s) in `{}`",
                    stmts.len() - index,
                    self.function().name
                );
                break;
            }
            self.lower_stmt(*child);
        }
    }

    pub fn lower_stmt(&mut self, id: HirStmtId) {
        if !id.is_valid() {
            return;
        }
        let hir = self.hir;
        let stmt = hir.get::<HirStmt>(id);
        let span = stmt.span;

        match &stmt.kind {
            HirStmtKind::Let { name, ty, init } => self.lower_let(name, *ty, *init, span),
            HirStmtKind::Expr { expr } => {
                self.lower_expr(*expr);
            }
            HirStmtKind::Return { expr } => self.lower_return(*expr, span),
            HirStmtKind::Block { .. } => self.lower_block(id),
            HirStmtKind::If {
                cond,
                then_block,
                else_block,
            } => self.lower_if(*cond, *then_block, *else_block, span),
            HirStmtKind::Loop { body } => self.lower_loop(*body, span),
            HirStmtKind::Select {
                expr,
                whens,
                otherwise,
            } => self.lower_select(*expr, whens, *otherwise, span),
            HirStmtKind::Break => match self.loop_stack.last() {
                Some(targets) => {
                    let target = targets.break_to;
                    self.terminate(MirTerminator::Goto { target, span });
                }
                None => self.error("`break` used outside of a loop", span),
            },
            HirStmtKind::Continue => match self.loop_stack.last() {
                Some(targets) => {
                    let target = targets.continue_to;
                    self.terminate(MirTerminator::Goto { target, span });
                }
                None => self.error("`continue` used outside of a loop", span),
            },
            HirStmtKind::When { .. } => {
                self.error("unsupported HIR statement in MIR lowering", span)
            }
        }
    }

    fn lower_let(&mut self, name: &str, ty: HirTypeId, init: HirExprId, span: Span) {
        let declared = lower_type(self.hir, ty);
        let value = match self.lower_expr(init) {
            Some(value) => value,
            None => {
                self.error("invalid initializer for let (void expression)", span);
                Self::zero(span)
            }
        };

        let ty = if declared.is_unknown() {
            self.value_type(&value).unwrap_or(declared)
        } else {
            declared
        };
        let dest = self.declare_local(name, ty, span);
        self.emit(MirInstr::Assign { dest, value, span });
    }

    fn lower_return(&mut self, expr: HirExprId, span: Span) {
        let value = if expr.is_valid() {
            match self.lower_expr(expr) {
                Some(value) => Some(value),
                None => {
                    self.error("return value must be a value expression", span);
                    Some(Self::zero(span))
                }
            }
        } else {
            None
        };
        self.terminate(MirTerminator::Return { value, span });
    }

    fn lower_if(
        &mut self,
        cond: HirExprId,
        then_block: HirStmtId,
        else_block: HirStmtId,
        span: Span,
    ) {
        let then_bb = self.new_block(span);
        let else_bb = self.new_block(span);
        let cont_bb = self.new_block(span);

        let cond = match self.lower_expr(cond) {
            Some(value) => value,
            None => {
                self.error("if condition must be a value expression", span);
                MirConst::bool(false, span).into()
            }
        };
        self.terminate(MirTerminator::CondGoto {
            cond,
            then_block: then_bb,
            else_block: else_bb,
            span,
        });

        self.set_current(then_bb);
        self.lower_block(then_block);
        self.terminate(MirTerminator::Goto {
            target: cont_bb,
            span,
        });

        self.set_current(else_bb);
        self.lower_stmt(else_block);
        self.terminate(MirTerminator::Goto {
            target: cont_bb,
            span,
        });

        self.set_current(cont_bb);
    }

    fn lower_loop(&mut self, body: HirStmtId, span: Span) {
        let body_bb = self.new_block(span);
        let cont_bb = self.new_block(span);
        self.terminate(MirTerminator::Goto {
            target: body_bb,
            span,
        });

        self.set_current(body_bb);
        self.loop_stack.push(LoopTargets {
            continue_to: body_bb,
            break_to: cont_bb,
        });
        self.lower_block(body);
        self.loop_stack.pop();
        self.terminate(MirTerminator::Goto {
            target: body_bb,
            span,
        });

        self.set_current(cont_bb);
    }

    /// Lowers `select` into a chain of tests: each `when` arm owns a test
    /// block that falls through to the next arm's test, and the last test
    /// falls through to `otherwise`. Every arm body jumps to a shared merge
    /// block.
    fn lower_select(
        &mut self,
        expr: HirExprId,
        whens: &[HirStmtId],
        otherwise: HirStmtId,
        span: Span,
    ) {
        let hir = self.hir;
        let value = match self.lower_expr(expr) {
            Some(value) => value,
            None => {
                self.error("select expression must be a value expression", span);
                Self::zero(span)
            }
        };
        let scrutinee_ty = self.value_type(&value).unwrap_or_else(MirType::unknown);
        let scrutinee = self.new_temp(scrutinee_ty.clone(), span);
        self.emit(MirInstr::Assign {
            dest: scrutinee.clone(),
            value,
            span,
        });
        let scrutinee = scrutinee.into();

        let merge_bb = self.new_block(span);
        let mut next_bb = self.new_block(span);
        self.terminate(MirTerminator::Goto {
            target: next_bb,
            span,
        });

        for when in whens {
            self.set_current(next_bb);
            let when = hir.get::<HirStmt>(*when);
            let HirStmtKind::When { pattern, block } = &when.kind else {
                self.error("select arm must be a when statement", when.span);
                continue;
            };
            let (pattern, block) = (*pattern, *block);

            let matched = self.lower_pattern(pattern, &scrutinee, &scrutinee_ty);
            let then_bb = self.new_block(when.span);
            let else_bb = self.new_block(when.span);
            self.terminate(MirTerminator::CondGoto {
                cond: matched.condition,
                then_block: then_bb,
                else_block: else_bb,
                span: when.span,
            });

            self.set_current(then_bb);
            for binding in matched.bindings {
                let dest = self.declare_local(&binding.name, binding.ty, when.span);
                self.emit(MirInstr::Assign {
                    dest,
                    value: binding.value,
                    span: when.span,
                });
            }
            self.lower_block(block);
            self.terminate(MirTerminator::Goto {
                target: merge_bb,
                span: when.span,
            });

            next_bb = else_bb;
        }

        self.set_current(next_bb);
        self.lower_block(otherwise);
        self.terminate(MirTerminator::Goto {
            target: merge_bb,
            span,
        });

        self.set_current(merge_bb);
    }
}
