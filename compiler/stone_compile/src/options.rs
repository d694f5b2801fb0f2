//! Compiler configuration.

use rustc_hash::FxHashSet;
use stone_ast::{ContextOptions, TokenKind};
use stone_diagnostic::{DiagId, DiagnosticOptions};
use thiserror::Error;

/// Invalid compiler configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("module name '{0}' is not a valid identifier")]
    InvalidModuleName(String),

    #[error("invalid module alias '{0}': expected 'Alias=RealName'")]
    MalformedModuleAlias(String),

    #[error("module alias '{alias}' conflicts with module name '{module}'")]
    AliasShadowsModule { alias: String, module: String },

    #[error("module name '{0}' appears more than once in module aliases")]
    DuplicateModuleAlias(String),

    #[error("unknown diagnostic '{0}'")]
    UnknownDiagnostic(String),
}

/// Everything a [`Compilation`](crate::Compilation) is configured with.
#[derive(Clone, Debug, Default)]
pub struct CompilerOptions {
    /// Name of the module being compiled.
    pub module_name: String,
    pub diagnostics: DiagnosticOptions,
    pub context: ContextOptions,
    /// Raw `-module-alias` values, each `Alias=RealName`.
    pub module_aliases: Vec<String>,
    /// Diagnostics to ignore, by catalog name.
    pub ignored_diagnostics: Vec<String>,
}

impl CompilerOptions {
    pub fn new(module_name: impl Into<String>) -> Self {
        CompilerOptions {
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    /// Module names are identifiers that are not keywords.
    pub fn validate_module_name(&self) -> Result<(), OptionsError> {
        if is_identifier(&self.module_name) && TokenKind::keyword(&self.module_name).is_none() {
            Ok(())
        } else {
            Err(OptionsError::InvalidModuleName(self.module_name.clone()))
        }
    }

    /// Parse `module_aliases` into `(alias, real)` pairs.
    ///
    /// Every name, alias or real, may occur once across all pairs, and no
    /// alias may be the name of the module being compiled.
    pub fn module_aliases(&self) -> Result<Vec<(String, String)>, OptionsError> {
        let mut seen = FxHashSet::default();
        let mut pairs = Vec::with_capacity(self.module_aliases.len());
        for raw in &self.module_aliases {
            let Some((alias, real)) = raw.split_once('=') else {
                return Err(OptionsError::MalformedModuleAlias(raw.clone()));
            };
            if !is_identifier(alias) || !is_identifier(real) || alias == real {
                return Err(OptionsError::MalformedModuleAlias(raw.clone()));
            }
            if alias == self.module_name {
                return Err(OptionsError::AliasShadowsModule {
                    alias: alias.to_owned(),
                    module: self.module_name.clone(),
                });
            }
            for name in [alias, real] {
                if !seen.insert(name) {
                    return Err(OptionsError::DuplicateModuleAlias(name.to_owned()));
                }
            }
            pairs.push((alias.to_owned(), real.to_owned()));
        }
        Ok(pairs)
    }

    /// `diagnostics` with `ignored_diagnostics` resolved and added.
    pub fn diagnostic_options(&self) -> Result<DiagnosticOptions, OptionsError> {
        let mut options = self.diagnostics.clone();
        for name in &self.ignored_diagnostics {
            let id = DiagId::from_name(name)
                .ok_or_else(|| OptionsError::UnknownDiagnostic(name.clone()))?;
            if !options.ignored.contains(&id) {
                options.ignored.push(id);
            }
        }
        Ok(options)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
