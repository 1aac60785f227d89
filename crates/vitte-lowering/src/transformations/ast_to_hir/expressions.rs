use super::HirGenerator;
use vitte_core::ast::{BinaryOp, Expr, ExprId, ExprKind, LiteralKind, TypeId, TypeNode};
use vitte_core::diagnostics::DiagId;
use vitte_core::hir::{HirBinaryOp, HirExprKind, HirId, HirLiteralKind, HirUnaryOp};
use vitte_core::span::Span;

/// Float and char literals travel as integers past this point.
fn lower_literal_kind(kind: LiteralKind) -> HirLiteralKind {
    match kind {
        LiteralKind::Bool => HirLiteralKind::Bool,
        LiteralKind::String => HirLiteralKind::String,
        LiteralKind::Int | LiteralKind::Float | LiteralKind::Char => HirLiteralKind::Int,
    }
}

fn lower_binary_op(op: BinaryOp) -> HirBinaryOp {
    match op {
        BinaryOp::Add => HirBinaryOp::Add,
        BinaryOp::Sub => HirBinaryOp::Sub,
        BinaryOp::Mul => HirBinaryOp::Mul,
        BinaryOp::Div => HirBinaryOp::Div,
        BinaryOp::Mod => HirBinaryOp::Mod,
        BinaryOp::Eq => HirBinaryOp::Eq,
        BinaryOp::Ne => HirBinaryOp::Ne,
        BinaryOp::Lt => HirBinaryOp::Lt,
        BinaryOp::Le => HirBinaryOp::Le,
        BinaryOp::Gt => HirBinaryOp::Gt,
        BinaryOp::Ge => HirBinaryOp::Ge,
        BinaryOp::And => HirBinaryOp::And,
        BinaryOp::Or => HirBinaryOp::Or,
    }
}

impl HirGenerator<'_> {
    pub fn lower_expr(&mut self, id: ExprId) -> HirId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let expr = ast.get::<Expr>(id);
        let span = expr.span;

        let kind = match &expr.kind {
            ExprKind::Literal { kind, value } => HirExprKind::Literal {
                kind: lower_literal_kind(*kind),
                value: value.clone(),
            },
            ExprKind::Ident(ident) => HirExprKind::Var {
                name: ident.name.clone(),
            },
            // Negation is re-derived from the operand type during MIR lowering.
            ExprKind::Unary { expr, .. } => HirExprKind::Unary {
                op: HirUnaryOp::Not,
                expr: self.lower_expr(*expr),
            },
            ExprKind::Binary { op, lhs, rhs } => HirExprKind::Binary {
                op: lower_binary_op(*op),
                lhs: self.lower_expr(*lhs),
                rhs: self.lower_expr(*rhs),
            },
            ExprKind::Invoke {
                callee_expr,
                callee_type,
                args,
            } => return self.lower_invoke(*callee_expr, *callee_type, args, span),
            ExprKind::CallNoParen { callee, arg } => {
                let callee = self.make_var(callee.name.clone(), callee.span);
                HirExprKind::Call {
                    callee,
                    args: vec![self.lower_expr(*arg)],
                }
            }
            ExprKind::List { items } => {
                let callee = self.make_var("list", span);
                HirExprKind::Call {
                    callee,
                    args: items.iter().map(|item| self.lower_expr(*item)).collect(),
                }
            }
            ExprKind::Member {
                base,
                member,
                base_is_type,
            } => HirExprKind::Member {
                base: self.lower_expr(*base),
                member: member.name.clone(),
                base_is_type: *base_is_type,
            },
            ExprKind::Index { .. } => {
                self.report(DiagId::UnsupportedExpressionInHir, span);
                return HirId::INVALID;
            }
        };
        self.make_expr(kind, span)
    }

    /// `callee(args)` or `Type(args)`. A missing callee is reported and
    /// replaced by the `<error>` placeholder so the call keeps its arguments.
    fn lower_invoke(
        &mut self,
        callee_expr: ExprId,
        callee_type: TypeId,
        args: &[ExprId],
        span: Span,
    ) -> HirId {
        let callee = if callee_expr.is_valid() {
            self.lower_expr(callee_expr)
        } else if let Some(name) = self.type_name(callee_type) {
            let type_span = self
                .ast
                .try_get::<TypeNode>(callee_type)
                .map_or(span, |ty| ty.span);
            self.make_var(name, type_span)
        } else {
            self.report(DiagId::InvokeHasNoCallee, span);
            self.make_var("<error>", span)
        };

        let args = args.iter().map(|arg| self.lower_expr(*arg)).collect();
        self.make_expr(HirExprKind::Call { callee, args }, span)
    }
}
