use super::builder::Builder;
use super::types::{const_kind, proc_return};
use vitte_core::hir::{HirBinaryOp, HirExpr, HirExprId, HirExprKind, HirLiteralKind, HirUnaryOp};
use vitte_core::mir::{
    MirBinOp, MirConst, MirInstr, MirLocal, MirMember, MirType, MirValue,
};
use vitte_core::span::Span;

/// Intrinsics with a fixed lowering instead of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intrinsic {
    Asm,
    UnsafeBegin,
    UnsafeEnd,
}

impl Intrinsic {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "asm" => Some(Intrinsic::Asm),
            "unsafe_begin" => Some(Intrinsic::UnsafeBegin),
            "unsafe_end" => Some(Intrinsic::UnsafeEnd),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum CallTarget {
    Intrinsic(Intrinsic),
    Direct { name: String, ret: MirType },
    Indirect { callee: MirValue, ret: MirType },
}

fn lower_binary_op(op: HirBinaryOp) -> MirBinOp {
    match op {
        HirBinaryOp::Add => MirBinOp::Add,
        HirBinaryOp::Sub => MirBinOp::Sub,
        HirBinaryOp::Mul => MirBinOp::Mul,
        HirBinaryOp::Div => MirBinOp::Div,
        HirBinaryOp::Mod => MirBinOp::Mod,
        HirBinaryOp::Eq => MirBinOp::Eq,
        HirBinaryOp::Ne => MirBinOp::Ne,
        HirBinaryOp::Lt => MirBinOp::Lt,
        HirBinaryOp::Le => MirBinOp::Le,
        HirBinaryOp::Gt => MirBinOp::Gt,
        HirBinaryOp::Ge => MirBinOp::Ge,
        HirBinaryOp::And => MirBinOp::And,
        HirBinaryOp::Or => MirBinOp::Or,
    }
}

impl Builder<'_> {
    /// Lowers an expression into the current block and returns the value it
    /// produces, or `None` for expressions without a value (unit calls,
    /// intrinsics, failed lowering).
    pub fn lower_expr(&mut self, id: HirExprId) -> Option<MirValue> {
        if !id.is_valid() {
            return None;
        }
        let hir = self.hir;
        let expr = hir.get::<HirExpr>(id);
        let span = expr.span;

        match &expr.kind {
            HirExprKind::Literal { kind, value } => {
                Some(MirConst::new(const_kind(*kind), value.clone(), span).into())
            }
            HirExprKind::Var { name } => Some(self.lower_var(name, span)),
            HirExprKind::Unary { op, expr } => Some(self.lower_unary(*op, *expr, span)),
            HirExprKind::Binary { op, lhs, rhs } => Some(self.lower_binary(*op, *lhs, *rhs, span)),
            HirExprKind::Call { callee, args } => self.lower_call(*callee, args, span),
            HirExprKind::Member {
                base,
                member,
                base_is_type,
            } => self.lower_member(*base, member, *base_is_type, span),
        }
    }

    /// Module consts are inlined; every other name is a local reference.
    fn lower_var(&mut self, name: &str, span: Span) -> MirValue {
        if let Some(value) = self.tables.consts.get(name) {
            return MirConst {
                span,
                ..value.clone()
            }
            .into();
        }
        let ty = self.local_type(name).cloned().unwrap_or_else(MirType::unknown);
        MirLocal::new(name, ty, span).into()
    }

    fn lower_operand(&mut self, id: HirExprId, message: &str, span: Span) -> MirValue {
        match self.lower_expr(id) {
            Some(value) => value,
            None => {
                self.error(message, span);
                Self::zero(span)
            }
        }
    }

    /// Boolean operands become `x == 0`, everything else `0 - x`.
    fn lower_unary(&mut self, op: HirUnaryOp, operand: HirExprId, span: Span) -> MirValue {
        let value = self.lower_operand(operand, "invalid operand for unary expression", span);

        let is_bool = self
            .value_type(&value)
            .is_some_and(|ty| ty.name() == "bool");
        let (op, lhs, rhs, ty) = if op == HirUnaryOp::Not && is_bool {
            (MirBinOp::Eq, value, Self::zero(span), MirType::named("bool"))
        } else {
            (MirBinOp::Sub, Self::zero(span), value, MirType::named("i32"))
        };

        let dest = self.new_temp(ty, span);
        self.emit(MirInstr::BinaryOp {
            op,
            dest: dest.clone(),
            lhs,
            rhs,
            span,
        });
        dest.into()
    }

    fn lower_binary(
        &mut self,
        op: HirBinaryOp,
        lhs: HirExprId,
        rhs: HirExprId,
        span: Span,
    ) -> MirValue {
        let lhs = self.lower_operand(lhs, "invalid operand for binary expression", span);
        let rhs = self.lower_operand(rhs, "invalid operand for binary expression", span);
        let op = lower_binary_op(op);

        let dest = self.new_temp(op.result_type(), span);
        self.emit(MirInstr::BinaryOp {
            op,
            dest: dest.clone(),
            lhs,
            rhs,
            span,
        });
        dest.into()
    }

    /// Name of a `Var` expression, if `id` is one.
    fn var_name(&self, id: HirExprId) -> Option<&str> {
        let hir = self.hir;
        match &hir.try_get::<HirExpr>(id)?.kind {
            HirExprKind::Var { name } => Some(name),
            _ => None,
        }
    }

    fn lower_member(
        &mut self,
        base: HirExprId,
        member: &str,
        base_is_type: bool,
        span: Span,
    ) -> Option<MirValue> {
        if base_is_type {
            let Some(type_name) = self.var_name(base).map(str::to_string) else {
                self.error("static member access requires a type name", span);
                return None;
            };
            return Some(self.static_member(&type_name, member, span));
        }

        let Some(base) = self.lower_expr(base) else {
            self.error("member access requires a value", span);
            return None;
        };
        let pointer = self.value_type(&base).is_some_and(|ty| ty.is_pointer());
        Some(
            MirMember {
                base: Box::new(base),
                member: member.to_string(),
                pointer,
                span,
            }
            .into(),
        )
    }

    /// `Type.member` outside of a call: enum-like pick cases are spelled
    /// `Type::Case`, every other static value `Type__member__value`.
    fn static_member(&mut self, type_name: &str, member: &str, span: Span) -> MirValue {
        let tables = self.tables;
        let is_case = tables.pick_tag(type_name, member).is_some();
        if is_case && tables.enum_like.contains(type_name) {
            return MirLocal::new(
                format!("{type_name}::{member}"),
                MirType::named(type_name),
                span,
            )
            .into();
        }

        let ty = if is_case {
            MirType::named(type_name)
        } else {
            MirType::unknown()
        };
        MirLocal::new(format!("{type_name}__{member}__value"), ty, span).into()
    }

    fn resolve_callee(&mut self, callee: HirExprId, span: Span) -> Option<CallTarget> {
        let hir = self.hir;
        let tables = self.tables;
        let Some(expr) = hir.try_get::<HirExpr>(callee) else {
            self.error("call target must be a value", span);
            return None;
        };

        match &expr.kind {
            HirExprKind::Var { name } => {
                if let Some(intrinsic) = Intrinsic::from_name(name) {
                    return Some(CallTarget::Intrinsic(intrinsic));
                }
                if let Some(ty) = self.local_type(name) {
                    let ret = proc_return(ty);
                    let callee = MirLocal::new(name.as_str(), ty.clone(), expr.span).into();
                    return Some(CallTarget::Indirect { callee, ret });
                }
                let ret = if let Some(ret) = tables.fn_returns.get(name) {
                    ret.clone()
                } else if tables.is_type_name(name) {
                    MirType::named(name.as_str())
                } else {
                    MirType::unknown()
                };
                Some(CallTarget::Direct {
                    name: name.clone(),
                    ret,
                })
            }
            HirExprKind::Member {
                base,
                member,
                base_is_type,
            } => {
                let base_name = self.var_name(*base).map(str::to_string);
                match base_name {
                    Some(base_name) if base_name == "builtin" && self.local_type("builtin").is_none() => {
                        let name = format!("builtin.{member}");
                        let ret = tables.fn_returns.get(&name).cloned().unwrap_or_else(MirType::unknown);
                        Some(CallTarget::Direct { name, ret })
                    }
                    Some(type_name) if *base_is_type => {
                        let name = format!("{type_name}__{member}");
                        let ret = tables
                            .fn_returns
                            .get(&name)
                            .cloned()
                            .unwrap_or_else(|| MirType::named(type_name.as_str()));
                        Some(CallTarget::Direct { name, ret })
                    }
                    _ => {
                        let callee = self.lower_expr(callee)?;
                        let ret = self
                            .value_type(&callee)
                            .map_or_else(MirType::unknown, |ty| proc_return(&ty));
                        Some(CallTarget::Indirect { callee, ret })
                    }
                }
            }
            _ => {
                let Some(callee) = self.lower_expr(callee) else {
                    self.error("call target must be a value", span);
                    return None;
                };
                let ret = self
                    .value_type(&callee)
                    .map_or_else(MirType::unknown, |ty| proc_return(&ty));
                Some(CallTarget::Indirect { callee, ret })
            }
        }
    }

    fn lower_args(&mut self, args: &[HirExprId], span: Span) -> Vec<MirValue> {
        args.iter()
            .map(|arg| self.lower_operand(*arg, "call argument must be a value expression", span))
            .collect()
    }

    fn lower_call(&mut self, callee: HirExprId, args: &[HirExprId], span: Span) -> Option<MirValue> {
        match self.resolve_callee(callee, span)? {
            CallTarget::Intrinsic(intrinsic) => {
                self.lower_intrinsic(intrinsic, args, span);
                None
            }
            CallTarget::Direct { name, ret } => {
                let args = self.lower_args(args, span);
                self.emit_call(ret, span, |dest| MirInstr::Call {
                    callee: name,
                    args,
                    dest,
                    span,
                })
            }
            CallTarget::Indirect { callee, ret } => {
                let args = self.lower_args(args, span);
                self.emit_call(ret, span, |dest| MirInstr::CallIndirect {
                    callee,
                    args,
                    dest,
                    span,
                })
            }
        }
    }

    /// Emits a call built by `make`. Calls returning unit get no
    /// destination and produce no value.
    fn emit_call(
        &mut self,
        ret: MirType,
        span: Span,
        make: impl FnOnce(Option<MirLocal>) -> MirInstr,
    ) -> Option<MirValue> {
        if ret.is_unit() {
            self.emit(make(None));
            return None;
        }
        let dest = self.new_temp(ret, span);
        self.emit(make(Some(dest.clone())));
        Some(dest.into())
    }

    fn lower_intrinsic(&mut self, intrinsic: Intrinsic, args: &[HirExprId], span: Span) {
        match intrinsic {
            Intrinsic::UnsafeBegin => self.emit(MirInstr::UnsafeBegin { span }),
            Intrinsic::UnsafeEnd => self.emit(MirInstr::UnsafeEnd { span }),
            Intrinsic::Asm => {
                let hir = self.hir;
                let code = match args {
                    [arg] => match hir.try_get::<HirExpr>(*arg).map(|expr| &expr.kind) {
                        Some(HirExprKind::Literal {
                            kind: HirLiteralKind::String,
                            value,
                        }) => Some(value.clone()),
                        _ => None,
                    },
                    _ => None,
                };
                match code {
                    Some(code) => self.emit(MirInstr::Asm {
                        code,
                        is_volatile: true,
                        span,
                    }),
                    None => self.error("asm(...) expects a string literal", span),
                }
            }
        }
    }
}
