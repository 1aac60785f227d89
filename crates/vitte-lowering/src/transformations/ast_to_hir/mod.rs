use vitte_core::ast::{self, AstContext, DeclKind, ModuleId, TypeId, TypeKind, TypeNode};
use vitte_core::diagnostics::{DiagId, Diagnostic, DiagnosticEngine};
use vitte_core::hir::{
    HirContext, HirDecl, HirDeclKind, HirExpr, HirExprKind, HirField, HirFnDecl, HirId,
    HirModule, HirModuleId, HirParam, HirPickCase, HirStmt, HirStmtKind, HirType, HirTypeId,
    HirTypeKind,
};
use vitte_core::span::Span;
use vitte_core::Result;

use super::IrTransform;

mod expressions;
mod patterns;
mod statements;


const DIAGNOSTIC_CONTEXT: &str = "ast→hir";

/// Desugars a resolved AST module into HIR.
///
/// The generator only reads the AST and appends to the HIR context; every
/// lowering routine returns [`HirId::INVALID`] after reporting when its
/// input cannot be represented, and callers drop or substitute such ids.
pub struct HirGenerator<'a> {
    ast: &'a AstContext,
    hir: &'a mut HirContext,
    diagnostics: &'a mut DiagnosticEngine,
}

impl<'a> HirGenerator<'a> {
    pub fn new(
        ast: &'a AstContext,
        hir: &'a mut HirContext,
        diagnostics: &'a mut DiagnosticEngine,
    ) -> Self {
        Self {
            ast,
            hir,
            diagnostics,
        }
    }

    fn report(&mut self, id: DiagId, span: Span) {
        self.diagnostics.add_diagnostic(
            Diagnostic::from_id(id)
                .with_span(span)
                .with_source_context(DIAGNOSTIC_CONTEXT),
        );
    }

    fn make_expr(&mut self, kind: HirExprKind, span: Span) -> HirId {
        self.hir.make(HirExpr { kind, span })
    }

    fn make_stmt(&mut self, kind: HirStmtKind, span: Span) -> HirId {
        self.hir.make(HirStmt { kind, span })
    }

    fn make_var(&mut self, name: impl Into<String>, span: Span) -> HirId {
        self.make_expr(HirExprKind::Var { name: name.into() }, span)
    }

    /// `name(args)` as an expression statement; used for the runtime helpers
    /// and intrinsics that surface statements desugar into.
    fn make_call_stmt(&mut self, name: &str, args: Vec<HirId>, span: Span) -> HirId {
        let callee = self.make_var(name, span);
        let call = self.make_expr(HirExprKind::Call { callee, args }, span);
        self.make_stmt(HirStmtKind::Expr { expr: call }, span)
    }

    /// Spelling of a type used as a callee or constructor pattern name.
    fn type_name(&self, id: TypeId) -> Option<String> {
        let ty = self.ast.try_get::<TypeNode>(id)?;
        match &ty.kind {
            TypeKind::Builtin { name } => Some(name.clone()),
            TypeKind::Named { ident } => Some(ident.name.clone()),
            TypeKind::Generic { base, .. } => Some(base.name.clone()),
            TypeKind::Pointer { .. } | TypeKind::Slice { .. } | TypeKind::Proc { .. } => None,
        }
    }

    pub fn lower_type(&mut self, id: TypeId) -> HirTypeId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let ty = ast.get::<TypeNode>(id);
        let kind = match &ty.kind {
            TypeKind::Builtin { name } => HirTypeKind::Named { name: name.clone() },
            TypeKind::Named { ident } => HirTypeKind::Named {
                name: ident.name.clone(),
            },
            TypeKind::Generic { base, args } => HirTypeKind::Generic {
                base_name: base.name.clone(),
                args: args.iter().map(|arg| self.lower_type(*arg)).collect(),
            },
            TypeKind::Pointer { pointee } => HirTypeKind::Pointer {
                pointee: self.lower_type(*pointee),
            },
            TypeKind::Slice { elem } => HirTypeKind::Slice {
                elem: self.lower_type(*elem),
            },
            TypeKind::Proc { params, ret } => HirTypeKind::Proc {
                params: params.iter().map(|param| self.lower_type(*param)).collect(),
                ret: self.lower_type(*ret),
            },
        };
        self.hir.make(HirType {
            kind,
            span: ty.span,
        })
    }

    fn lower_fields(&mut self, fields: &[ast::FieldDecl]) -> Vec<HirField> {
        fields
            .iter()
            .map(|field| HirField {
                name: field.ident.name.clone(),
                ty: self.lower_type(field.ty),
            })
            .collect()
    }

    /// Body of a proc-like declaration; absent bodies stay invalid.
    fn lower_body(&mut self, body: ast::StmtId) -> HirId {
        if body.is_valid() {
            self.lower_block(body)
        } else {
            HirId::INVALID
        }
    }

    /// Lowers one declaration. Declarations consumed by resolution (`use`,
    /// type aliases) produce no HIR and yield the invalid id.
    pub fn lower_decl(&mut self, id: ast::DeclId) -> HirId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let decl = ast.get::<ast::Decl>(id);
        let kind = match &decl.kind {
            DeclKind::Proc(proc_decl) => {
                let params = proc_decl
                    .params
                    .iter()
                    .map(|param| HirParam {
                        name: param.ident.name.clone(),
                        ty: self.lower_type(param.ty),
                    })
                    .collect();
                HirDeclKind::Fn(HirFnDecl {
                    name: proc_decl.name.name.clone(),
                    params,
                    return_type: self.lower_type(proc_decl.return_type),
                    body: self.lower_body(proc_decl.body),
                })
            }
            DeclKind::Entry { name, body } => HirDeclKind::Fn(HirFnDecl {
                name: name.name.clone(),
                params: Vec::new(),
                return_type: HirId::INVALID,
                body: self.lower_body(*body),
            }),
            DeclKind::Macro { name, params, body } => HirDeclKind::Fn(HirFnDecl {
                name: name.name.clone(),
                params: params
                    .iter()
                    .map(|param| HirParam {
                        name: param.name.clone(),
                        ty: HirId::INVALID,
                    })
                    .collect(),
                return_type: HirId::INVALID,
                body: self.lower_body(*body),
            }),
            DeclKind::Const { name, ty, value } => HirDeclKind::Const {
                name: name.name.clone(),
                ty: self.lower_type(*ty),
                value: self.lower_expr(*value),
            },
            DeclKind::Global {
                name,
                ty,
                value,
                is_mut,
            } => HirDeclKind::Global {
                name: name.name.clone(),
                ty: self.lower_type(*ty),
                value: self.lower_expr(*value),
                is_mut: *is_mut,
            },
            DeclKind::Form { name, fields } => HirDeclKind::Form {
                name: name.name.clone(),
                fields: self.lower_fields(fields),
            },
            DeclKind::Pick { name, cases } => HirDeclKind::Pick {
                name: name.name.clone(),
                cases: cases
                    .iter()
                    .map(|case| HirPickCase {
                        name: case.ident.name.clone(),
                        fields: self.lower_fields(&case.fields),
                    })
                    .collect(),
            },
            DeclKind::Use { .. } | DeclKind::TypeAlias { .. } => return HirId::INVALID,
        };
        self.hir.make(HirDecl {
            kind,
            span: decl.span,
        })
    }

    /// Lowers every declaration of `module`, keeping declaration order and
    /// skipping the ones that produced no HIR.
    pub fn lower_module(&mut self, module: ModuleId) -> HirModuleId {
        if !module.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let module = ast.get::<ast::Module>(module);
        tracing::debug!(
            "lowering module `{}` to HIR ({} declarations)",
            module.name,
            module.decls.len()
        );

        let decls = module
            .decls
            .iter()
            .map(|decl| self.lower_decl(*decl))
            .filter(|decl| decl.is_valid())
            .collect();

        self.hir.make(HirModule {
            name: module.name.clone(),
            decls,
            span: module.span,
        })
    }
}

impl IrTransform<ModuleId, HirModuleId> for HirGenerator<'_> {
    fn transform(&mut self, module: ModuleId) -> Result<HirModuleId> {
        Ok(self.lower_module(module))
    }
}

/// Lowers `module` from `ast` into `hir`, reporting to `diagnostics`.
pub fn lower_to_hir(
    ast: &AstContext,
    module: ModuleId,
    hir: &mut HirContext,
    diagnostics: &mut DiagnosticEngine,
) -> HirModuleId {
    HirGenerator::new(ast, hir, diagnostics).lower_module(module)
}
