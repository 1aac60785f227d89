use vitte_core::mir::{
    MirBinOp, MirConstKind, MirFunction, MirInstr, MirMember, MirTerminator, MirValue,
};

pub fn function<'m>(module: &'m vitte_core::mir::MirModule, name: &str) -> &'m MirFunction {
    module
        .function(name)
        .unwrap_or_else(|| panic!("function `{name}` missing from MIR module"))
}

/// Every block of a defined function ends in exactly one terminator and
/// only jumps to existing blocks.
pub fn assert_well_formed(func: &MirFunction) {
    assert_eq!(func.entry, 0, "`{}` must enter at bb0", func.name);
    for (index, block) in func.blocks.iter().enumerate() {
        assert_eq!(block.id, index, "`{}`: block ids must be dense", func.name);
        let terminator = block
            .terminator
            .as_ref()
            .unwrap_or_else(|| panic!("`{}`: bb{} has no terminator", func.name, block.id));
        for target in terminator.successors() {
            assert!(
                target < func.blocks.len(),
                "`{}`: bb{} jumps to missing bb{}",
                func.name,
                block.id,
                target
            );
        }
    }
}

pub fn assert_local(value: &MirValue, name: &str) {
    match value {
        MirValue::Local(local) => assert_eq!(local.name, name),
        other => panic!("expected local `{name}`, found {other:?}"),
    }
}

pub fn assert_int(value: &MirValue, expected: i64) {
    match value {
        MirValue::Const(c) => {
            assert_eq!(c.kind, MirConstKind::Int);
            assert_eq!(c.value, expected.to_string());
        }
        other => panic!("expected int constant {expected}, found {other:?}"),
    }
}

pub fn assert_bool(value: &MirValue, expected: bool) {
    match value {
        MirValue::Const(c) => {
            assert_eq!(c.kind, MirConstKind::Bool);
            assert_eq!(c.value, expected.to_string());
        }
        other => panic!("expected bool constant {expected}, found {other:?}"),
    }
}

/// `base.member` where `base` is the local `base_name`.
pub fn assert_member(value: &MirValue, base_name: &str, member_name: &str) {
    match value {
        MirValue::Member(MirMember { base, member, .. }) => {
            assert_local(base, base_name);
            assert_eq!(member, member_name);
        }
        other => panic!("expected `{base_name}.{member_name}`, found {other:?}"),
    }
}

pub fn assert_return_local(terminator: Option<&MirTerminator>, name: &str) {
    match terminator {
        Some(MirTerminator::Return {
            value: Some(value), ..
        }) => assert_local(value, name),
        other => panic!("expected `return {name}`, found {other:?}"),
    }
}

pub fn count_binops(func: &MirFunction, op: MirBinOp) -> usize {
    func.blocks
        .iter()
        .flat_map(|block| &block.instructions)
        .filter(|instr| matches!(instr, MirInstr::BinaryOp { op: found, .. } if *found == op))
        .count()
}
