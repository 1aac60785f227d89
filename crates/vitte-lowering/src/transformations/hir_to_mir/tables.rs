use super::types::{const_kind, return_type, signature_type};
use super::DIAGNOSTIC_CONTEXT;
use std::collections::{HashMap, HashSet};
use vitte_core::diagnostics::{Diagnostic, DiagnosticEngine};
use vitte_core::hir::{HirContext, HirDecl, HirDeclKind, HirExpr, HirExprKind, HirModule};
use vitte_core::mir::{MirConst, MirField, MirType};
use vitte_core::span::Span;

/// Module-wide facts gathered before any function body is lowered, so
/// bodies can refer to declarations that appear later in the module.
#[derive(Debug, Clone, Default)]
pub struct ModuleTables {
    /// Free function name to return type.
    pub fn_returns: HashMap<String, MirType>,
    /// Const name to its literal value.
    pub consts: HashMap<String, MirConst>,
    /// Pick names in declaration order.
    pub picks: Vec<String>,
    /// Pick name to case name to payload fields.
    pub pick_fields: HashMap<String, HashMap<String, Vec<MirField>>>,
    /// Pick name to case name to dense 0-based tag.
    pub pick_tags: HashMap<String, HashMap<String, u32>>,
    /// Picks whose cases are all nullary.
    pub enum_like: HashSet<String>,
    /// Form name to field name to field type.
    pub form_fields: HashMap<String, HashMap<String, MirType>>,
}

impl ModuleTables {
    pub fn collect(
        hir: &HirContext,
        module: &HirModule,
        diagnostics: &mut DiagnosticEngine,
    ) -> Self {
        let mut tables = Self::default();

        for decl_id in &module.decls {
            let decl = hir.get::<HirDecl>(*decl_id);
            match &decl.kind {
                HirDeclKind::Fn(func) => {
                    tables
                        .fn_returns
                        .insert(func.name.clone(), return_type(hir, func.return_type));
                }
                HirDeclKind::Const { name, value, .. } => {
                    let value = const_literal(hir, *value, decl.span, diagnostics);
                    tables.consts.insert(name.clone(), value);
                }
                HirDeclKind::Form { name, fields } => {
                    let fields = fields
                        .iter()
                        .map(|field| (field.name.clone(), signature_type(hir, field.ty)))
                        .collect();
                    tables.form_fields.insert(name.clone(), fields);
                }
                HirDeclKind::Pick { name, cases } => {
                    let mut fields = HashMap::new();
                    let mut tags = HashMap::new();
                    for (tag, case) in cases.iter().enumerate() {
                        tags.insert(case.name.clone(), tag as u32);
                        fields.insert(
                            case.name.clone(),
                            case.fields
                                .iter()
                                .map(|field| MirField {
                                    name: field.name.clone(),
                                    ty: signature_type(hir, field.ty),
                                })
                                .collect(),
                        );
                    }
                    if cases.iter().all(|case| case.fields.is_empty()) {
                        tables.enum_like.insert(name.clone());
                    }
                    tables.picks.push(name.clone());
                    tables.pick_fields.insert(name.clone(), fields);
                    tables.pick_tags.insert(name.clone(), tags);
                }
                HirDeclKind::Global { .. } => {}
            }
        }

        tables
    }

    /// Whether `name` names a form or pick, i.e. calling it constructs a value.
    pub fn is_type_name(&self, name: &str) -> bool {
        self.form_fields.contains_key(name) || self.pick_tags.contains_key(name)
    }

    pub fn field_type(&self, form: &str, field: &str) -> Option<&MirType> {
        self.form_fields.get(form)?.get(field)
    }

    pub fn pick_tag(&self, pick: &str, case: &str) -> Option<u32> {
        self.pick_tags.get(pick)?.get(case).copied()
    }

    pub fn case_fields(&self, pick: &str, case: &str) -> Option<&[MirField]> {
        self.pick_fields.get(pick)?.get(case).map(Vec::as_slice)
    }

    /// Resolves a constructor pattern name to `(pick, case)`.
    ///
    /// `Pick.Case` is looked up directly. A bare case name is tried against
    /// the scrutinee's pick first, then must be the unique case of that name
    /// across all picks.
    pub fn resolve_case(&self, pattern_name: &str, scrutinee_ty: &str) -> Option<(String, String)> {
        if let Some((pick, case)) = pattern_name.rsplit_once('.') {
            return self
                .pick_tag(pick, case)
                .map(|_| (pick.to_string(), case.to_string()));
        }
        if self.pick_tag(scrutinee_ty, pattern_name).is_some() {
            return Some((scrutinee_ty.to_string(), pattern_name.to_string()));
        }

        let mut owners = self
            .picks
            .iter()
            .filter(|pick| self.pick_tag(pick, pattern_name).is_some());
        match (owners.next(), owners.next()) {
            (Some(pick), None) => Some((pick.clone(), pattern_name.to_string())),
            _ => None,
        }
    }
}

/// Literal value of a const declaration; anything else is reported and
/// replaced by `0`.
fn const_literal(
    hir: &HirContext,
    value: vitte_core::hir::HirExprId,
    span: Span,
    diagnostics: &mut DiagnosticEngine,
) -> MirConst {
    let message = match hir.try_get::<HirExpr>(value) {
        Some(HirExpr {
            kind: HirExprKind::Literal { kind, value },
            span,
        }) => return MirConst::new(const_kind(*kind), value.clone(), *span),
        Some(_) => "const expressions must be literals",
        None => "const declaration missing value",
    };
    diagnostics.add_diagnostic(
        Diagnostic::error(message)
            .with_span(span)
            .with_source_context(DIAGNOSTIC_CONTEXT),
    );
    MirConst::int(0, span)
}
