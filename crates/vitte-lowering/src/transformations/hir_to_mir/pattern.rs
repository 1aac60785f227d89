use super::builder::Builder;
use vitte_core::hir::{HirPattern, HirPatternId, HirPatternKind};
use vitte_core::mir::{MirBinOp, MirConst, MirInstr, MirMember, MirType, MirValue};
use vitte_core::span::Span;

const TAG_FIELD: &str = "__tag";

/// A name bound by a pattern, assigned once the arm is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBinding {
    pub name: String,
    pub value: MirValue,
    pub ty: MirType,
}

/// Outcome of compiling a pattern against a scrutinee.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    /// Boolean value that holds when the pattern matches.
    pub condition: MirValue,
    pub bindings: Vec<PatternBinding>,
}

struct PatternMismatch;

impl Builder<'_> {
    /// Compiles `pattern` against `scrutinee`, emitting the tag tests into
    /// the current block.
    ///
    /// A pattern that does not fit the scrutinee's pick is reported and
    /// compiles to a constant `false` condition with no bindings.
    pub fn lower_pattern(
        &mut self,
        pattern: HirPatternId,
        scrutinee: &MirValue,
        scrutinee_ty: &MirType,
    ) -> PatternMatch {
        let span = scrutinee.span();
        let mut bindings = Vec::new();
        match self.match_pattern(pattern, scrutinee, scrutinee_ty, &mut bindings) {
            Ok(condition) => PatternMatch {
                condition: condition.unwrap_or_else(|| MirConst::bool(true, span).into()),
                bindings,
            },
            Err(PatternMismatch) => PatternMatch {
                condition: MirConst::bool(false, span).into(),
                bindings: Vec::new(),
            },
        }
    }

    /// Returns the match condition, `None` when the pattern always matches.
    fn match_pattern(
        &mut self,
        id: HirPatternId,
        scrutinee: &MirValue,
        scrutinee_ty: &MirType,
        bindings: &mut Vec<PatternBinding>,
    ) -> Result<Option<MirValue>, PatternMismatch> {
        let hir = self.hir;
        let Some(pattern) = hir.try_get::<HirPattern>(id) else {
            self.error("invalid pattern", scrutinee.span());
            return Err(PatternMismatch);
        };
        let span = pattern.span;

        let (type_name, args) = match &pattern.kind {
            HirPatternKind::Ident { name } => {
                bindings.push(PatternBinding {
                    name: name.clone(),
                    value: scrutinee.clone(),
                    ty: scrutinee_ty.clone(),
                });
                return Ok(None);
            }
            HirPatternKind::Ctor { type_name, args } => (type_name, args),
        };

        let tables = self.tables;
        let resolved = tables
            .resolve_case(type_name, scrutinee_ty.name().trim_start_matches('*'))
            .and_then(|(pick, case)| {
                let tag = tables.pick_tag(&pick, &case)?;
                let fields = tables.case_fields(&pick, &case)?;
                Some((tag, fields))
            })
            .filter(|(_, fields)| args.len() <= fields.len());
        let Some((tag, fields)) = resolved else {
            self.error("unknown ctor pattern or field mismatch", span);
            return Err(PatternMismatch);
        };

        let pointer = scrutinee_ty.is_pointer();
        let project = |member: &str| -> MirValue {
            MirMember {
                base: Box::new(scrutinee.clone()),
                member: member.to_string(),
                pointer,
                span,
            }
            .into()
        };

        let tag_ok = self.new_temp(MirType::named("bool"), span);
        self.emit(MirInstr::BinaryOp {
            op: MirBinOp::Eq,
            dest: tag_ok.clone(),
            lhs: project(TAG_FIELD),
            rhs: MirConst::int(tag.into(), span).into(),
            span,
        });
        let mut condition: MirValue = tag_ok.into();

        for (arg, field) in args.iter().zip(fields) {
            let projection = project(&field.name);
            let nested = hir.try_get::<HirPattern>(*arg);
            if let Some(HirPattern {
                kind: HirPatternKind::Ident { name },
                ..
            }) = nested
            {
                bindings.push(PatternBinding {
                    name: name.clone(),
                    value: projection,
                    ty: field.ty.clone(),
                });
                continue;
            }

            // Nested constructor: test a snapshot of the field.
            let field_value = self.new_temp(field.ty.clone(), span);
            self.emit(MirInstr::Assign {
                dest: field_value.clone(),
                value: projection,
                span,
            });
            let nested = self.match_pattern(*arg, &field_value.into(), &field.ty, bindings)?;
            if let Some(nested) = nested {
                condition = self.and(condition, nested, span);
            }
        }

        Ok(Some(condition))
    }

    fn and(&mut self, lhs: MirValue, rhs: MirValue, span: Span) -> MirValue {
        let dest = self.new_temp(MirType::named("bool"), span);
        self.emit(MirInstr::BinaryOp {
            op: MirBinOp::And,
            dest: dest.clone(),
            lhs,
            rhs,
            span,
        });
        dest.into()
    }
}
