use crate::span::Span;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

macro_rules! diag_ids {
    ($($name:ident = $code:literal, $message:literal;)*) => {
        /// Catalogued diagnostics with stable codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DiagId {
            $($name,)*
        }

        impl DiagId {
            pub fn code(self) -> &'static str {
                match self {
                    $(DiagId::$name => $code,)*
                }
            }

            pub fn message(self) -> &'static str {
                match self {
                    $(DiagId::$name => $message,)*
                }
            }
        }
    };
}

diag_ids! {
    InvokeHasNoCallee = "E0014", "invoke has no callee";
    UnsupportedExpressionInHir = "E0015", "unsupported expression in HIR";
    UnsupportedPatternInHir = "E0016", "unsupported pattern in HIR";
    UnsupportedStatementInHir = "E0017", "unsupported statement in HIR";
    GenericTypeRequiresAtLeastOneTypeArgument = "E0021", "generic type requires at least one type argument";
    UnexpectedHirTypeKind = "E0022", "unexpected HIR type kind";
    UnexpectedHirExprKind = "E0023", "unexpected HIR expression kind";
    SelectRequiresAtLeastOneWhenBranch = "E0024", "select requires at least one when branch";
    SelectBranchMustBeWhenStatement = "E0025", "select branch must be a when statement";
    UnexpectedHirStmtKind = "E0026", "unexpected HIR statement kind";
    UnexpectedHirPatternKind = "E0027", "unexpected HIR pattern kind";
    UnexpectedHirDeclKind = "E0028", "unexpected HIR declaration kind";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub span: Option<Span>,
    pub suggestions: Vec<String>,
    pub source_context: Option<String>,
    pub code: Option<String>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: None,
            suggestions: Vec::new(),
            source_context: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, message)
    }

    /// Error built from a catalogued id.
    pub fn from_id(id: DiagId) -> Self {
        Self::error(id.message()).with_code(id.code())
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source_context(mut self, context: impl Into<String>) -> Self {
        self.source_context = Some(context.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }

        if !self.suggestions.is_empty() {
            write!(f, " (hints: {})", self.suggestions.join("; "))?;
        }

        Ok(())
    }
}

/// Output layout for [`DiagnosticEngine::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticTemplate {
    #[default]
    Pretty,
    Plain,
}

/// Ordered sink for diagnostics produced while lowering one module.
///
/// Reporting never aborts: callers record the problem, substitute a
/// placeholder and keep going, and the driver inspects [`has_errors`]
/// afterwards.
///
/// [`has_errors`]: DiagnosticEngine::has_errors
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.add_diagnostic(Diagnostic::error(message).with_span(span));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.add_diagnostic(Diagnostic::warning(message).with_span(span));
    }

    pub fn report(&mut self, id: DiagId, span: Span) {
        self.add_diagnostic(Diagnostic::from_id(id).with_span(span));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            tracing::debug!("diagnostic: {}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Renders every diagnostic as display lines. Info diagnostics are only
    /// included when `verbose_info` is set.
    pub fn render(&self, template: DiagnosticTemplate, verbose_info: bool) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| verbose_info || d.level != DiagnosticLevel::Info)
            .flat_map(|d| match template {
                DiagnosticTemplate::Pretty => render_pretty(d),
                DiagnosticTemplate::Plain => render_plain(d),
            })
            .collect()
    }
}

fn context_of(diagnostic: &Diagnostic) -> &str {
    diagnostic.source_context.as_deref().unwrap_or("lowering")
}

fn render_pretty(diagnostic: &Diagnostic) -> Vec<String> {
    let prefix = match diagnostic.level {
        DiagnosticLevel::Error => "✖",
        DiagnosticLevel::Warning => "⚠",
        DiagnosticLevel::Info => "ℹ",
    };

    let mut header = format!("{} [{}] {}", prefix, context_of(diagnostic), diagnostic.message);
    if let Some(code) = &diagnostic.code {
        header.push_str(&format!(" ({code})"));
    }

    let mut lines = vec![header];
    if let Some(span) = &diagnostic.span {
        lines.push(format!("   at {span}"));
    }
    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   help: {suggestion}"));
    }
    lines
}

fn render_plain(diagnostic: &Diagnostic) -> Vec<String> {
    let level = match diagnostic.level {
        DiagnosticLevel::Error => "ERROR",
        DiagnosticLevel::Warning => "WARNING",
        DiagnosticLevel::Info => "INFO",
    };

    let mut line = format!("[{}] {}: {}", context_of(diagnostic), level, diagnostic.message);
    if let Some(code) = &diagnostic.code {
        line.push_str(&format!(" ({code})"));
    }
    if let Some(span) = &diagnostic.span {
        line.push_str(&format!(" at {span}"));
    }
    vec![line]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_counts_only_errors() {
        let mut engine = DiagnosticEngine::new();
        engine.warning("unreachable statement", Span::new(0, 1, 2));
        assert!(!engine.has_errors());

        engine.report(DiagId::InvokeHasNoCallee, Span::new(0, 3, 4));
        engine.error("invalid operand for binary expression", Span::new(0, 5, 6));
        assert!(engine.has_errors());
        assert_eq!(engine.error_count(), 2);
        assert_eq!(engine.diagnostics()[1].code.as_deref(), Some("E0014"));
        assert_eq!(engine.diagnostics()[1].message, "invoke has no callee");
    }

    #[test]
    fn plain_template_is_single_line() {
        let mut engine = DiagnosticEngine::new();
        engine.add_diagnostic(
            Diagnostic::from_id(DiagId::SelectRequiresAtLeastOneWhenBranch)
                .with_source_context("hir-validate")
                .with_span(Span::new(2, 10, 20)),
        );
        engine.add_diagnostic(Diagnostic::info("lowered 3 functions"));

        assert_eq!(
            engine.render(DiagnosticTemplate::Plain, false),
            vec![
                "[hir-validate] ERROR: select requires at least one when branch (E0024) at Span(2:10-20)"
                    .to_string()
            ]
        );
        assert_eq!(engine.render(DiagnosticTemplate::Plain, true).len(), 2);
    }

    #[test]
    fn display_includes_code_and_hints() {
        let diagnostic = Diagnostic::error("unknown ctor pattern or field mismatch")
            .with_code("E9999")
            .with_suggestion("check the pick declaration");
        assert_eq!(
            diagnostic.to_string(),
            "unknown ctor pattern or field mismatch [E9999] (hints: check the pick declaration)"
        );
    }
}
