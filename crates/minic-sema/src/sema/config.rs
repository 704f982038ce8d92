//! Analyzer configuration

/// Routines every program may call without declaring them
pub const DEFAULT_BUILTINS: &[&str] = &["printf", "scanf"];

/// Options for one analysis pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Names pre-seeded as implicit external functions
    pub builtins: Vec<String>,
    /// Report a unit that never declares or defines `main`
    pub require_main: bool,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No builtins at all
    pub fn bare() -> Self {
        Self {
            builtins: Vec::new(),
            require_main: false,
        }
    }

    pub fn with_builtin(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.builtins.contains(&name) {
            self.builtins.push(name);
        }
        self
    }

    pub fn with_require_main(mut self, require_main: bool) -> Self {
        self.require_main = require_main;
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            builtins: DEFAULT_BUILTINS.iter().map(|s| s.to_string()).collect(),
            require_main: false,
        }
    }
}
