use super::tables::ModuleTables;
use super::DIAGNOSTIC_CONTEXT;
use std::collections::HashMap;
use vitte_core::config::LoweringOptions;
use vitte_core::diagnostics::{Diagnostic, DiagnosticEngine};
use vitte_core::hir::HirContext;
use vitte_core::mir::{
    MirBasicBlock, MirBlockId, MirConst, MirFunction, MirInstr, MirLocal, MirParam, MirTerminator,
    MirType, MirValue,
};
use vitte_core::span::Span;

#[derive(Debug, Clone, Copy)]
pub(super) struct LoopTargets {
    /// Re-enters the loop body.
    pub continue_to: MirBlockId,
    /// The block after the loop.
    pub break_to: MirBlockId,
}

/// Builds the control-flow graph of one function.
///
/// Lowering always appends to the *current* block. Once that block has a
/// terminator the builder is in the terminated state and further `emit` and
/// `terminate` calls are silently dropped until `set_current` moves to
/// another block.
pub struct Builder<'a> {
    pub(super) hir: &'a HirContext,
    pub(super) tables: &'a ModuleTables,
    pub(super) options: &'a LoweringOptions,
    diagnostics: &'a mut DiagnosticEngine,
    func: MirFunction,
    current: MirBlockId,
    terminated: bool,
    next_temp: usize,
    /// First declared type of every parameter and local.
    local_types: HashMap<String, MirType>,
    pub(super) loop_stack: Vec<LoopTargets>,
}

impl<'a> Builder<'a> {
    pub fn new(
        hir: &'a HirContext,
        tables: &'a ModuleTables,
        options: &'a LoweringOptions,
        diagnostics: &'a mut DiagnosticEngine,
        func: MirFunction,
    ) -> Self {
        Self {
            hir,
            tables,
            options,
            diagnostics,
            func,
            current: 0,
            terminated: false,
            next_temp: 0,
            local_types: HashMap::new(),
            loop_stack: Vec::new(),
        }
    }

    pub fn finish(self) -> MirFunction {
        self.func
    }

    pub fn function(&self) -> &MirFunction {
        &self.func
    }

    /// Appends a fresh, empty block and returns its id.
    pub fn new_block(&mut self, span: Span) -> MirBlockId {
        let id = self.func.blocks.len();
        self.func.blocks.push(MirBasicBlock::new(id, span));
        id
    }

    pub fn set_current(&mut self, id: MirBlockId) {
        self.current = id;
        self.terminated = self.func.blocks[id].is_terminated();
    }

    pub fn current(&self) -> MirBlockId {
        self.current
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn emit(&mut self, instr: MirInstr) {
        if self.terminated {
            return;
        }
        self.func.blocks[self.current].instructions.push(instr);
    }

    pub fn terminate(&mut self, terminator: MirTerminator) {
        if self.terminated {
            return;
        }
        self.func.blocks[self.current].terminator = Some(terminator);
        self.terminated = true;
    }

    pub(super) fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.add_diagnostic(
            Diagnostic::error(message)
                .with_span(span)
                .with_source_context(DIAGNOSTIC_CONTEXT),
        );
    }

    pub(super) fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.add_diagnostic(
            Diagnostic::warning(message)
                .with_span(span)
                .with_source_context(DIAGNOSTIC_CONTEXT),
        );
    }

    pub fn declare_param(&mut self, name: &str, ty: MirType) {
        self.local_types
            .entry(name.to_string())
            .or_insert_with(|| ty.clone());
        self.func.params.push(MirParam {
            name: name.to_string(),
            ty,
        });
    }

    /// Registers a local the first time `name` is seen and returns it with
    /// its tracked type; later declarations keep the first type.
    pub fn declare_local(&mut self, name: &str, ty: MirType, span: Span) -> MirLocal {
        if let Some(existing) = self.local_types.get(name) {
            return MirLocal::new(name, existing.clone(), span);
        }
        self.local_types.insert(name.to_string(), ty.clone());
        let local = MirLocal::new(name, ty, span);
        self.func.locals.push(local.clone());
        local
    }

    pub fn new_temp(&mut self, ty: MirType, span: Span) -> MirLocal {
        let name = format!("_t{}", self.next_temp);
        self.next_temp += 1;
        self.declare_local(&name, ty, span)
    }

    pub fn local_type(&self, name: &str) -> Option<&MirType> {
        self.local_types.get(name)
    }

    /// Type name tracked for `name`, `unknown` when untracked.
    pub fn local_type_name(&self, name: &str) -> &str {
        self.local_type(name).map_or("unknown", MirType::name)
    }

    /// Best-known type of a lowered value. Member projections are typed
    /// through the form declaration of their base.
    pub(super) fn value_type(&self, value: &MirValue) -> Option<MirType> {
        match value {
            MirValue::Const(c) => Some(MirType::named(c.kind.type_name())),
            MirValue::Local(local) => Some(local.ty.clone()),
            MirValue::Member(member) => {
                let base = self.value_type(&member.base)?;
                let form = base.name().trim_start_matches('*');
                self.tables.field_type(form, &member.member).cloned()
            }
        }
    }

    /// Placeholder operand substituted after a reported error.
    pub(super) fn zero(span: Span) -> MirValue {
        MirConst::int(0, span).into()
    }
}
