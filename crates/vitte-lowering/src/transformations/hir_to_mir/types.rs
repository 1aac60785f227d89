use vitte_core::hir::{HirContext, HirLiteralKind, HirType, HirTypeId, HirTypeKind};
use vitte_core::mir::{MirConstKind, MirType, ANY_TYPE};

/// Canonical spelling of builtin type names.
fn canonical_name(name: &str) -> &str {
    match name {
        "int" => "i32",
        "uint" => "u32",
        "float" => "f64",
        "str" => "string",
        other => other,
    }
}

/// MIR type of a HIR type. Invalid or missing types are `unknown`; a proc
/// type without a return type returns `Unit`.
pub fn lower_type(hir: &HirContext, id: HirTypeId) -> MirType {
    let Some(ty) = hir.try_get::<HirType>(id) else {
        return MirType::unknown();
    };
    match &ty.kind {
        HirTypeKind::Named { name } => MirType::named(canonical_name(name)),
        HirTypeKind::Generic { base_name, .. } => MirType::named(canonical_name(base_name)),
        HirTypeKind::Pointer { pointee } => {
            MirType::Named(format!("*{}", lower_type(hir, *pointee).name()))
        }
        HirTypeKind::Slice { elem } => MirType::Named(format!("[{}]", lower_type(hir, *elem).name())),
        HirTypeKind::Proc { params, ret } => MirType::Proc {
            params: params.iter().map(|param| lower_type(hir, *param)).collect(),
            ret: Box::new(if ret.is_valid() {
                lower_type(hir, *ret)
            } else {
                MirType::named("Unit")
            }),
        },
    }
}

/// Short all-uppercase names (`T`, `K`, `TV`) are type parameters.
pub fn is_type_parameter(name: &str) -> bool {
    !name.is_empty() && name.len() <= 2 && name.bytes().all(|b| b.is_ascii_uppercase())
}

/// Replaces type parameters by the erased `VitteAny` type.
pub fn erase_type_parameters(ty: MirType) -> MirType {
    match ty {
        MirType::Named(name) if is_type_parameter(&name) => MirType::named(ANY_TYPE),
        MirType::Proc { params, ret } => MirType::Proc {
            params: params.into_iter().map(erase_type_parameters).collect(),
            ret: Box::new(erase_type_parameters(*ret)),
        },
        other => other,
    }
}

/// Type of a field, parameter or return slot.
pub fn signature_type(hir: &HirContext, id: HirTypeId) -> MirType {
    erase_type_parameters(lower_type(hir, id))
}

/// Return type of a declared function; a missing annotation means `Unit`.
pub fn return_type(hir: &HirContext, id: HirTypeId) -> MirType {
    if id.is_valid() {
        signature_type(hir, id)
    } else {
        MirType::named("Unit")
    }
}

/// Return type of calling a value of type `ty`.
pub fn proc_return(ty: &MirType) -> MirType {
    match ty {
        MirType::Proc { ret, .. } => (**ret).clone(),
        MirType::Named(_) => MirType::unknown(),
    }
}

pub fn const_kind(kind: HirLiteralKind) -> MirConstKind {
    match kind {
        HirLiteralKind::Bool => MirConstKind::Bool,
        HirLiteralKind::Int => MirConstKind::Int,
        HirLiteralKind::String => MirConstKind::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitte_core::span::Span;

    #[test]
    fn short_uppercase_names_are_type_parameters() {
        for name in ["T", "K", "TV"] {
            assert!(is_type_parameter(name), "{name}");
        }
        for name in ["", "Tx", "ABC", "i32", "T1"] {
            assert!(!is_type_parameter(name), "{name}");
        }
    }

    #[test]
    fn erasure_reaches_into_proc_types() {
        let ty = MirType::Proc {
            params: vec![MirType::named("T"), MirType::named("i32")],
            ret: Box::new(MirType::named("U")),
        };
        assert_eq!(
            erase_type_parameters(ty),
            MirType::Proc {
                params: vec![MirType::named(ANY_TYPE), MirType::named("i32")],
                ret: Box::new(MirType::named(ANY_TYPE)),
            }
        );
    }

    #[test]
    fn lowers_pointer_and_generic_spellings() {
        let mut hir = HirContext::new();
        let span = Span::null();
        let int = hir.make(HirType {
            kind: HirTypeKind::Named { name: "int".into() },
            span,
        });
        let pointer = hir.make(HirType {
            kind: HirTypeKind::Pointer { pointee: int },
            span,
        });
        let generic = hir.make(HirType {
            kind: HirTypeKind::Generic {
                base_name: "List".into(),
                args: vec![int],
            },
            span,
        });

        assert_eq!(lower_type(&hir, int), MirType::named("i32"));
        assert_eq!(lower_type(&hir, pointer), MirType::named("*i32"));
        assert_eq!(lower_type(&hir, generic), MirType::named("List"));
        assert!(lower_type(&hir, vitte_core::hir::HirId::INVALID).is_unknown());
    }
}
