//! Lowering options, overridable from the environment.

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Run the HIR structural validator before MIR lowering.
    pub validate_hir: bool,
    /// Check CFG well-formedness of every lowered function.
    pub verify_mir: bool,
    /// Warn once per block when statements follow a terminator.
    pub warn_unreachable: bool,
    /// Hand back lowered output even when errors were reported.
    pub lossy: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            validate_hir: true,
            verify_mir: true,
            warn_unreachable: false,
            lossy: false,
        }
    }
}

impl LoweringOptions {
    /// Defaults adjusted by `VITTE_SKIP_HIR_VALIDATION`, `VITTE_SKIP_MIR_VERIFY`,
    /// `VITTE_WARN_UNREACHABLE` and `VITTE_LOSSY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            validate_hir: !env_flag("VITTE_SKIP_HIR_VALIDATION").unwrap_or(!defaults.validate_hir),
            verify_mir: !env_flag("VITTE_SKIP_MIR_VERIFY").unwrap_or(!defaults.verify_mir),
            warn_unreachable: env_flag("VITTE_WARN_UNREACHABLE")
                .unwrap_or(defaults.warn_unreachable),
            lossy: env_flag("VITTE_LOSSY").unwrap_or(defaults.lossy),
        }
    }

    pub fn with_hir_validation(mut self, enabled: bool) -> Self {
        self.validate_hir = enabled;
        self
    }

    pub fn with_mir_verification(mut self, enabled: bool) -> Self {
        self.verify_mir = enabled;
        self
    }

    pub fn with_unreachable_warnings(mut self, enabled: bool) -> Self {
        self.warn_unreachable = enabled;
        self
    }

    pub fn lossy(mut self, enabled: bool) -> Self {
        self.lossy = enabled;
        self
    }
}
