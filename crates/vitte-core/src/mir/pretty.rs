use super::{
    MirBasicBlock, MirConst, MirConstKind, MirFunction, MirInstr, MirLocal, MirModule,
    MirTerminator, MirValue,
};
use crate::pretty::{escape_string, PrettyCtx, PrettyPrintable};
use crate::span::Span;
use itertools::Itertools;
use std::fmt::{self, Formatter};

impl PrettyPrintable for MirModule {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        ctx.writeln(f, format!("module {}", self.name))?;

        for decl in &self.structs {
            let fields = decl
                .fields
                .iter()
                .map(|field| format!("{}: {}", field.name, field.ty))
                .join(", ");
            ctx.writeln(f, format!("struct {} {{ {} }}", decl.name, fields))?;
        }

        for enum_decl in &self.enums {
            ctx.writeln(
                f,
                format!("enum {} {{ {} }}", enum_decl.name, enum_decl.items.join(", ")),
            )?;
        }

        for pick in &self.picks {
            let cases = pick
                .cases
                .iter()
                .map(|case| {
                    let fields = case
                        .fields
                        .iter()
                        .map(|field| format!("{}: {}", field.name, field.ty))
                        .join(", ");
                    format!("{}#{}({})", case.name, case.tag, fields)
                })
                .join(", ");
            ctx.writeln(f, format!("pick {} {{ {} }}", pick.name, cases))?;
        }

        for global in &self.globals {
            let keyword = if global.is_mut { "global mut" } else { "global" };
            let init = global
                .init
                .as_ref()
                .map(|c| format!(" = {}", render_const(c)))
                .unwrap_or_default();
            ctx.writeln(f, format!("{keyword} {}: {}{init}", global.name, global.ty))?;
        }

        for func in &self.functions {
            func.fmt_pretty(f, ctx)?;
        }
        Ok(())
    }
}

impl PrettyPrintable for MirFunction {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|param| format!("{}: {}", param.name, param.ty))
            .join(", ");
        let header = format!("fn {}({}) -> {}", self.name, params, self.return_type);

        if self.is_declaration() {
            return ctx.writeln(f, format!("extern {header};"));
        }

        ctx.writeln(f, format!("{header} {{"))?;
        ctx.nested(|ctx| {
            if ctx.options.show_types {
                for local in &self.locals {
                    ctx.writeln(f, format!("let {}: {}", local.name, local.ty))?;
                }
            }
            for block in &self.blocks {
                block.fmt_pretty(f, ctx)?;
            }
            Ok(())
        })?;
        ctx.writeln(f, "}")
    }
}

impl PrettyPrintable for MirBasicBlock {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        ctx.writeln(f, format!("bb{}:", self.id))?;
        ctx.nested(|ctx| {
            for instr in &self.instructions {
                let line = render_instr(instr, ctx.options.show_types);
                ctx.writeln(f, with_span(line, instr.span(), ctx.options.show_spans))?;
            }
            match &self.terminator {
                Some(term) => {
                    let (line, span) = render_terminator(term);
                    ctx.writeln(f, with_span(line, span, ctx.options.show_spans))
                }
                None => ctx.writeln(f, "<unterminated>"),
            }
        })
    }
}

fn with_span(line: String, span: Span, show: bool) -> String {
    if show {
        format!("{line} @ {span}")
    } else {
        line
    }
}

fn render_const(c: &MirConst) -> String {
    match c.kind {
        MirConstKind::String => format!("\"{}\"", escape_string(&c.value)),
        MirConstKind::Int | MirConstKind::Bool => c.value.clone(),
    }
}

fn render_value(value: &MirValue) -> String {
    match value {
        MirValue::Const(c) => render_const(c),
        MirValue::Local(local) => local.name.clone(),
        MirValue::Member(member) => {
            let sep = if member.pointer { "->" } else { "." };
            format!("{}{}{}", render_value(&member.base), sep, member.member)
        }
    }
}

fn render_dest(dest: &MirLocal, show_types: bool) -> String {
    if show_types {
        format!("{}: {}", dest.name, dest.ty)
    } else {
        dest.name.clone()
    }
}

fn render_args(args: &[MirValue]) -> String {
    args.iter().map(render_value).join(", ")
}

fn render_instr(instr: &MirInstr, show_types: bool) -> String {
    match instr {
        MirInstr::Assign { dest, value, .. } => {
            format!("{} = {}", render_dest(dest, show_types), render_value(value))
        }
        MirInstr::BinaryOp {
            op, dest, lhs, rhs, ..
        } => format!(
            "{} = {} {} {}",
            render_dest(dest, show_types),
            render_value(lhs),
            op.symbol(),
            render_value(rhs)
        ),
        MirInstr::Call {
            callee, args, dest, ..
        } => {
            let call = format!("call {}({})", callee, render_args(args));
            match dest {
                Some(dest) => format!("{} = {call}", render_dest(dest, show_types)),
                None => call,
            }
        }
        MirInstr::CallIndirect {
            callee, args, dest, ..
        } => {
            let call = format!("call *{}({})", render_value(callee), render_args(args));
            match dest {
                Some(dest) => format!("{} = {call}", render_dest(dest, show_types)),
                None => call,
            }
        }
        MirInstr::Asm {
            code, is_volatile, ..
        } => {
            let volatile = if *is_volatile { " volatile" } else { "" };
            format!("asm{volatile} \"{}\"", escape_string(code))
        }
        MirInstr::UnsafeBegin { .. } => "unsafe_begin".to_string(),
        MirInstr::UnsafeEnd { .. } => "unsafe_end".to_string(),
    }
}

fn render_terminator(term: &MirTerminator) -> (String, Span) {
    match term {
        MirTerminator::Goto { target, span } => (format!("goto bb{target}"), *span),
        MirTerminator::CondGoto {
            cond,
            then_block,
            else_block,
            span,
        } => (
            format!(
                "if {} goto bb{} else bb{}",
                render_value(cond),
                then_block,
                else_block
            ),
            *span,
        ),
        MirTerminator::Return { value, span } => {
            let line = match value {
                Some(value) => format!("return {}", render_value(value)),
                None => "return".to_string(),
            };
            (line, *span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mir::{MirBinOp, MirParam, MirType};
    use crate::pretty::{pretty, PrettyOptions};

    #[test]
    fn renders_function_with_blocks() {
        let span = Span::null();
        let int = MirType::named("i32");
        let tmp = MirLocal::new("_t0", int.clone(), span);
        let a = MirLocal::new("a", int.clone(), span);
        let b = MirLocal::new("b", int.clone(), span);

        let mut func = MirFunction::new("add", int.clone(), span);
        func.params = vec![
            MirParam {
                name: "a".into(),
                ty: int.clone(),
            },
            MirParam {
                name: "b".into(),
                ty: int.clone(),
            },
        ];
        func.locals = vec![a.clone(), b.clone(), tmp.clone()];
        let mut block = MirBasicBlock::new(0, span);
        block.instructions.push(MirInstr::BinaryOp {
            op: MirBinOp::Add,
            dest: tmp.clone(),
            lhs: a.into(),
            rhs: b.into(),
            span,
        });
        block.terminator = Some(MirTerminator::Return {
            value: Some(tmp.into()),
            span,
        });
        func.blocks.push(block);

        let mut module = MirModule::new("demo", span);
        module.functions.push(func);

        let options = PrettyOptions {
            show_types: false,
            ..PrettyOptions::default()
        };
        let text = pretty(&module, options).to_string();
        pretty_assertions::assert_eq!(
            text,
            "module demo\n\
             fn add(a: i32, b: i32) -> i32 {\n\
             \x20   bb0:\n\
             \x20       _t0 = a + b\n\
             \x20       return _t0\n\
             }\n"
        );
    }
}
