use super::HirGenerator;
use vitte_core::ast::{Pattern, PatternId, PatternKind};
use vitte_core::diagnostics::DiagId;
use vitte_core::hir::{HirId, HirPattern, HirPatternKind};

impl HirGenerator<'_> {
    pub fn lower_pattern(&mut self, id: PatternId) -> HirId {
        if !id.is_valid() {
            return HirId::INVALID;
        }
        let ast = self.ast;
        let pattern = ast.get::<Pattern>(id);
        let kind = match &pattern.kind {
            PatternKind::Ident { ident } => HirPatternKind::Ident {
                name: ident.name.clone(),
            },
            PatternKind::Ctor { ty, args } => {
                let args: Vec<HirId> = args.iter().map(|arg| self.lower_pattern(*arg)).collect();
                // Subpatterns bind fields by position, so one unsupported
                // argument invalidates the whole constructor pattern.
                if args.iter().any(|arg| !arg.is_valid()) {
                    return HirId::INVALID;
                }
                HirPatternKind::Ctor {
                    type_name: self
                        .type_name(*ty)
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    args,
                }
            }
            PatternKind::Wildcard | PatternKind::Literal { .. } => {
                self.report(DiagId::UnsupportedPatternInHir, pattern.span);
                return HirId::INVALID;
            }
        };
        self.hir.make(HirPattern {
            kind,
            span: pattern.span,
        })
    }
}
