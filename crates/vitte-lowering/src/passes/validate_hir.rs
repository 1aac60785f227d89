//! Structural validation of lowered HIR.
//!
//! Checks that required child slots hold a node of the right category and
//! that `select` statements are well formed. Optional slots (`else`,
//! `otherwise`, let and parameter types, return values, function bodies)
//! may hold the invalid id.

use vitte_core::arena::ArenaNode;
use vitte_core::diagnostics::{DiagId, Diagnostic, DiagnosticEngine};
use vitte_core::hir::{
    HirContext, HirDecl, HirDeclKind, HirExpr, HirExprKind, HirId, HirModule, HirModuleId,
    HirNode, HirPattern, HirPatternKind, HirStmt, HirStmtKind, HirType, HirTypeKind,
};
use vitte_core::span::Span;

const DIAGNOSTIC_CONTEXT: &str = "hir-validate";

/// Validates every declaration of `module`. Returns `true` when no error
/// was reported.
pub fn validate_hir(
    hir: &HirContext,
    module: HirModuleId,
    diagnostics: &mut DiagnosticEngine,
) -> bool {
    let mut validator = HirValidator {
        hir,
        diagnostics,
        errors: 0,
    };
    validator.validate_module(module);
    tracing::debug!("HIR validation finished with {} error(s)", validator.errors);
    validator.errors == 0
}

struct HirValidator<'a> {
    hir: &'a HirContext,
    diagnostics: &'a mut DiagnosticEngine,
    errors: usize,
}

impl HirValidator<'_> {
    fn error(&mut self, diagnostic: Diagnostic) {
        self.errors += 1;
        self.diagnostics
            .add_diagnostic(diagnostic.with_source_context(DIAGNOSTIC_CONTEXT));
    }

    fn invalid(&mut self, what: &str, span: Span) {
        self.error(Diagnostic::error(format!("invalid HIR {what}")).with_span(span));
    }

    fn unexpected(&mut self, id: DiagId, found: &HirNode, span: Span) {
        self.error(
            Diagnostic::from_id(id)
                .with_span(span)
                .with_suggestion(format!("found a {} node", found.category())),
        );
    }

    /// Checks that `id` holds a `T`, reporting a missing required node or a
    /// node of the wrong category.
    fn expect<T>(&mut self, id: HirId, what: &str, wrong: DiagId, span: Span, required: bool) -> bool
    where
        T: ArenaNode<HirNode>,
    {
        let hir = self.hir;
        if !id.is_valid() {
            if required {
                self.invalid(what, span);
            }
            return false;
        }
        if hir.try_get::<T>(id).is_some() {
            return true;
        }
        self.unexpected(wrong, hir.node(id), span);
        false
    }

    fn validate_module(&mut self, module: HirModuleId) {
        let hir = self.hir;
        let Some(module) = hir.try_get::<HirModule>(module) else {
            self.invalid("module", Span::null());
            return;
        };

        for decl_id in &module.decls {
            if self.expect::<HirDecl>(
                *decl_id,
                "decl",
                DiagId::UnexpectedHirDeclKind,
                module.span,
                true,
            ) {
                self.validate_decl(hir.get::<HirDecl>(*decl_id));
            }
        }
    }

    fn validate_decl(&mut self, decl: &HirDecl) {
        let span = decl.span;
        match &decl.kind {
            HirDeclKind::Fn(func) => {
                for param in &func.params {
                    self.validate_type(param.ty, span, false);
                }
                self.validate_type(func.return_type, span, false);
                self.validate_stmt(func.body, span, false);
            }
            HirDeclKind::Const { ty, value, .. } => {
                self.validate_type(*ty, span, false);
                self.validate_expr(*value, span, true);
            }
            HirDeclKind::Global { ty, value, .. } => {
                self.validate_type(*ty, span, false);
                self.validate_expr(*value, span, false);
            }
            HirDeclKind::Form { fields, .. } => {
                for field in fields {
                    self.validate_type(field.ty, span, true);
                }
            }
            HirDeclKind::Pick { cases, .. } => {
                for field in cases.iter().flat_map(|case| &case.fields) {
                    self.validate_type(field.ty, span, true);
                }
            }
        }
    }

    fn validate_type(&mut self, id: HirId, span: Span, required: bool) {
        let hir = self.hir;
        if !self.expect::<HirType>(id, "type", DiagId::UnexpectedHirTypeKind, span, required) {
            return;
        }
        let ty = hir.get::<HirType>(id);
        let ty_span = ty.span;
        match &ty.kind {
            HirTypeKind::Named { .. } => {}
            HirTypeKind::Generic { args, .. } => {
                if args.is_empty() {
                    self.error(
                        Diagnostic::from_id(DiagId::GenericTypeRequiresAtLeastOneTypeArgument)
                            .with_span(ty_span),
                    );
                }
                for arg in args {
                    self.validate_type(*arg, ty_span, true);
                }
            }
            HirTypeKind::Pointer { pointee } => self.validate_type(*pointee, ty_span, true),
            HirTypeKind::Slice { elem } => self.validate_type(*elem, ty_span, true),
            HirTypeKind::Proc { params, ret } => {
                for param in params {
                    self.validate_type(*param, ty_span, true);
                }
                self.validate_type(*ret, ty_span, false);
            }
        }
    }

    fn validate_expr(&mut self, id: HirId, span: Span, required: bool) {
        let hir = self.hir;
        if !self.expect::<HirExpr>(id, "expr", DiagId::UnexpectedHirExprKind, span, required) {
            return;
        }
        let expr = hir.get::<HirExpr>(id);
        let span = expr.span;
        match &expr.kind {
            HirExprKind::Literal { .. } | HirExprKind::Var { .. } => {}
            HirExprKind::Unary { expr, .. } => self.validate_expr(*expr, span, true),
            HirExprKind::Binary { lhs, rhs, .. } => {
                self.validate_expr(*lhs, span, true);
                self.validate_expr(*rhs, span, true);
            }
            HirExprKind::Call { callee, args } => {
                self.validate_expr(*callee, span, true);
                for arg in args {
                    self.validate_expr(*arg, span, true);
                }
            }
            HirExprKind::Member { base, .. } => self.validate_expr(*base, span, true),
        }
    }

    fn validate_stmt(&mut self, id: HirId, span: Span, required: bool) {
        let hir = self.hir;
        if !self.expect::<HirStmt>(id, "stmt", DiagId::UnexpectedHirStmtKind, span, required) {
            return;
        }
        let stmt = hir.get::<HirStmt>(id);
        let span = stmt.span;
        match &stmt.kind {
            HirStmtKind::Let { ty, init, .. } => {
                self.validate_type(*ty, span, false);
                self.validate_expr(*init, span, true);
            }
            HirStmtKind::Expr { expr } => self.validate_expr(*expr, span, true),
            HirStmtKind::Return { expr } => self.validate_expr(*expr, span, false),
            HirStmtKind::Block { stmts } => {
                for child in stmts {
                    self.validate_stmt(*child, span, true);
                }
            }
            HirStmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.validate_expr(*cond, span, true);
                self.validate_stmt(*then_block, span, true);
                self.validate_stmt(*else_block, span, false);
            }
            HirStmtKind::Loop { body } => self.validate_stmt(*body, span, true),
            HirStmtKind::When { pattern, block } => {
                self.validate_pattern(*pattern, span, true);
                self.validate_stmt(*block, span, true);
            }
            HirStmtKind::Select {
                expr,
                whens,
                otherwise,
            } => {
                self.validate_expr(*expr, span, true);
                if whens.is_empty() {
                    self.error(
                        Diagnostic::from_id(DiagId::SelectRequiresAtLeastOneWhenBranch)
                            .with_span(span),
                    );
                }
                for when in whens {
                    if !when.is_valid() {
                        self.invalid("when", span);
                        continue;
                    }
                    match hir.try_get::<HirStmt>(*when) {
                        Some(HirStmt {
                            kind: HirStmtKind::When { .. },
                            ..
                        }) => {}
                        Some(other) => self.error(
                            Diagnostic::from_id(DiagId::SelectBranchMustBeWhenStatement)
                                .with_span(other.span),
                        ),
                        None => {}
                    }
                    self.validate_stmt(*when, span, true);
                }
                self.validate_stmt(*otherwise, span, false);
            }
            HirStmtKind::Break | HirStmtKind::Continue => {}
        }
    }

    fn validate_pattern(&mut self, id: HirId, span: Span, required: bool) {
        let hir = self.hir;
        if !self.expect::<HirPattern>(id, "pattern", DiagId::UnexpectedHirPatternKind, span, required) {
            return;
        }
        let pattern = hir.get::<HirPattern>(id);
        match &pattern.kind {
            HirPatternKind::Ident { .. } => {}
            HirPatternKind::Ctor { args, .. } => {
                for arg in args {
                    self.validate_pattern(*arg, pattern.span, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitte_core::hir::HirFnDecl;

    fn span() -> Span {
        Span::new(0, 0, 1)
    }

    fn module_with_body(hir: &mut HirContext, body: HirId) -> HirModuleId {
        let decl = hir.make(HirDecl {
            kind: HirDeclKind::Fn(HirFnDecl {
                name: "main".into(),
                params: Vec::new(),
                return_type: HirId::INVALID,
                body,
            }),
            span: span(),
        });
        hir.make(HirModule {
            name: "m".into(),
            decls: vec![decl],
            span: span(),
        })
    }

    #[test]
    fn empty_select_is_rejected() {
        let mut hir = HirContext::new();
        let scrutinee = hir.make(HirExpr {
            kind: HirExprKind::Var { name: "s".into() },
            span: span(),
        });
        let select = hir.make(HirStmt {
            kind: HirStmtKind::Select {
                expr: scrutinee,
                whens: Vec::new(),
                otherwise: HirId::INVALID,
            },
            span: span(),
        });
        let body = hir.make(HirStmt {
            kind: HirStmtKind::Block {
                stmts: vec![select],
            },
            span: span(),
        });
        let module = module_with_body(&mut hir, body);

        let mut diagnostics = DiagnosticEngine::new();
        assert!(!validate_hir(&hir, module, &mut diagnostics));
        assert_eq!(diagnostics.diagnostics().len(), 1);
        assert_eq!(diagnostics.diagnostics()[0].code.as_deref(), Some("E0024"));
    }

    #[test]
    fn expression_in_statement_slot_is_reported() {
        let mut hir = HirContext::new();
        let expr = hir.make(HirExpr {
            kind: HirExprKind::Var { name: "x".into() },
            span: span(),
        });
        let body = hir.make(HirStmt {
            kind: HirStmtKind::Block { stmts: vec![expr] },
            span: span(),
        });
        let module = module_with_body(&mut hir, body);

        let mut diagnostics = DiagnosticEngine::new();
        assert!(!validate_hir(&hir, module, &mut diagnostics));
        assert_eq!(diagnostics.diagnostics()[0].code.as_deref(), Some("E0026"));
    }

    #[test]
    fn missing_binary_operand_is_invalid_expr() {
        let mut hir = HirContext::new();
        let lhs = hir.make(HirExpr {
            kind: HirExprKind::Var { name: "a".into() },
            span: span(),
        });
        let binary = hir.make(HirExpr {
            kind: HirExprKind::Binary {
                op: vitte_core::hir::HirBinaryOp::Add,
                lhs,
                rhs: HirId::INVALID,
            },
            span: span(),
        });
        let stmt = hir.make(HirStmt {
            kind: HirStmtKind::Expr { expr: binary },
            span: span(),
        });
        let body = hir.make(HirStmt {
            kind: HirStmtKind::Block { stmts: vec![stmt] },
            span: span(),
        });
        let module = module_with_body(&mut hir, body);

        let mut diagnostics = DiagnosticEngine::new();
        assert!(!validate_hir(&hir, module, &mut diagnostics));
        assert_eq!(diagnostics.diagnostics()[0].message, "invalid HIR expr");
    }

    #[test]
    fn extern_function_without_body_is_valid() {
        let mut hir = HirContext::new();
        let module = module_with_body(&mut hir, HirId::INVALID);
        let mut diagnostics = DiagnosticEngine::new();
        assert!(validate_hir(&hir, module, &mut diagnostics));
    }
}
