mod support;

use pretty_assertions::assert_eq;
use support::ast::AstBuilder;
use vitte_core::ast::{AstId, BinaryOp, DeclKind, Ident, ModuleId, StmtKind};
use vitte_core::config::LoweringOptions;
use vitte_core::error::Error;
use vitte_core::pretty::{pretty, PrettyOptions};
use vitte_lowering::LoweringPipeline;

/// `proc add(a: int, b: int) -> int { return a + b }` and an entry point
/// running one instruction of inline assembly.
fn add_and_main(b: &mut AstBuilder) -> ModuleId {
    let lhs = b.var("a");
    let rhs = b.var("b");
    let sum = b.binary(BinaryOp::Add, lhs, rhs);
    let ret = b.ret(sum);
    let body = b.block(vec![ret]);
    let a = b.builtin_type("int");
    let b_ty = b.builtin_type("int");
    let ret_ty = b.builtin_type("int");
    let add = b.proc_("add", vec![("a", a), ("b", b_ty)], ret_ty, body);

    let asm = b.stmt(StmtKind::Asm { code: "nop".into() });
    let unsafe_body = b.block(vec![asm]);
    let unsafe_block = b.stmt(StmtKind::Unsafe { body: unsafe_body });
    let main_body = b.block(vec![unsafe_block]);
    let main_name = Ident::new("main", b.span());
    let main = b.decl(DeclKind::Entry {
        name: main_name,
        body: main_body,
    });
    b.module("app", vec![add, main])
}

/// A function using `break` outside of any loop.
fn stray_break(b: &mut AstBuilder) -> ModuleId {
    let brk = b.stmt(StmtKind::Break);
    let body = b.block(vec![brk]);
    let f = b.proc_("f", vec![], AstId::INVALID, body);
    b.module("broken", vec![f])
}

#[test]
fn lowers_and_pretty_prints_module() {
    let mut b = AstBuilder::new();
    let module = add_and_main(&mut b);

    let lowered = LoweringPipeline::default()
        .run(&b.ctx, module)
        .expect("module lowers");
    assert!(lowered.diagnostics.is_empty(), "unexpected diagnostics: {:?}", lowered.diagnostics);

    let text = pretty(&lowered.mir, PrettyOptions::default()).to_string();
    assert_eq!(
        text,
        "module app\n\
         fn add(a: i32, b: i32) -> i32 {\n\
         \x20   let _t0: i32\n\
         \x20   bb0:\n\
         \x20       _t0: i32 = a + b\n\
         \x20       return _t0\n\
         }\n\
         fn main() -> Unit {\n\
         \x20   bb0:\n\
         \x20       unsafe_begin\n\
         \x20       asm volatile \"nop\"\n\
         \x20       unsafe_end\n\
         \x20       return\n\
         }\n"
    );
}

#[test]
fn errors_fail_the_module() {
    let mut b = AstBuilder::new();
    let module = stray_break(&mut b);

    match LoweringPipeline::default().run(&b.ctx, module) {
        Err(Error::LoweringFailed {
            error_count,
            diagnostics,
        }) => {
            assert_eq!(error_count, 1);
            assert_eq!(diagnostics[0].message, "`break` used outside of a loop");
            assert_eq!(diagnostics[0].source_context.as_deref(), Some("hir→mir"));
        }
        other => panic!("expected a lowering failure, found {other:?}"),
    }
}

#[test]
fn lossy_mode_keeps_the_module() {
    let mut b = AstBuilder::new();
    let module = stray_break(&mut b);

    let pipeline = LoweringPipeline::new(LoweringOptions::default().lossy(true));
    let lowered = pipeline.run(&b.ctx, module).expect("lossy lowering succeeds");

    assert_eq!(lowered.diagnostics.len(), 1);
    assert!(lowered.diagnostics[0].is_error());
    let func = lowered.mir.function("f").expect("function kept");
    assert!(func.blocks[0].is_terminated());
}

#[test]
fn hir_validation_can_be_skipped() {
    let mut b = AstBuilder::new();
    let scrutinee = b.int(1);
    let select = b.select(scrutinee, vec![], AstId::INVALID);
    let body = b.block(vec![select]);
    let f = b.proc_("f", vec![], AstId::INVALID, body);
    let module = b.module("m", vec![f]);

    let err = LoweringPipeline::default()
        .run(&b.ctx, module)
        .expect_err("empty select is rejected");
    let codes: Vec<Option<&str>> = err.diagnostics().iter().map(|d| d.code.as_deref()).collect();
    assert_eq!(codes, [Some("E0024")]);

    let options = LoweringOptions::default().with_hir_validation(false);
    let lowered = LoweringPipeline::new(options)
        .run(&b.ctx, module)
        .expect("unvalidated lowering succeeds");
    assert!(lowered.diagnostics.is_empty());
}

#[test]
fn mir_dumps_as_json() {
    let mut b = AstBuilder::new();
    let r = b.builtin_type("int");
    let shape = b.pick("Shape", vec![("Circle", vec![("r", r)]), ("Empty", vec![])]);
    let module = b.module("shapes", vec![shape]);

    let lowered = LoweringPipeline::default()
        .run(&b.ctx, module)
        .expect("module lowers");
    let json: serde_json::Value =
        serde_json::from_str(&lowered.mir.to_json().expect("serializes")).expect("valid json");

    assert_eq!(json["name"], "shapes");
    assert_eq!(json["picks"][0]["name"], "Shape");
    assert_eq!(json["picks"][0]["cases"][1]["name"], "Empty");
    assert_eq!(json["picks"][0]["cases"][1]["tag"], 1);
    assert_eq!(json["picks"][0]["enum_like"], false);
}
