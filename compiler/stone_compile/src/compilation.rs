//! One compilation: a context, a diagnostic engine and the phases run on them.
//!
//! Phases never stop on their own. Before each one starts, the compilation
//! looks at the engine's error state and skips the phase if an earlier one
//! left the compilation unfit to continue.

use crate::{CompilerOptions, OptionsError, SourceDecl, SourceImport};
use rustc_hash::{FxHashMap, FxHashSet};
use stone_ast::{
    ArenaKind, Context, Decl, DeclKind, FunDecl, Identifier, ModuleAliasLookup, ModuleDecl,
    NodeId, Span, StructDecl, VarDecl,
};
use stone_diagnostic::{diag, ConsumerId, DiagnosticConsumer, DiagnosticEngine};

/// Compilation phases, in the order a driver runs them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    ImportModules,
    Declare,
    Summarize,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::ImportModules => "import-modules",
            Phase::Declare => "declare",
            Phase::Summarize => "summarize",
        }
    }

    /// Whether the phase still runs after a (non-fatal) error.
    fn runs_after_errors(self) -> bool {
        matches!(self, Phase::ImportModules)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseStatus {
    Completed,
    Skipped,
}

/// What a top-level name is bound to: the latest declaration under it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopLevelDecl {
    Fun(NodeId<FunDecl>),
    Struct(NodeId<StructDecl>),
    Var(NodeId<VarDecl>),
}

impl TopLevelDecl {
    pub fn kind(self) -> DeclKind {
        match self {
            TopLevelDecl::Fun(_) => DeclKind::Fun,
            TopLevelDecl::Struct(_) => DeclKind::Struct,
            TopLevelDecl::Var(_) => DeclKind::Var,
        }
    }

    /// Location of the first declaration of the name.
    pub fn first_loc(self, ctx: &Context) -> Span {
        match self {
            TopLevelDecl::Fun(d) => ctx.get(ctx.first_decl(d)).loc(),
            TopLevelDecl::Struct(d) => ctx.get(ctx.first_decl(d)).loc(),
            TopLevelDecl::Var(d) => ctx.get(ctx.first_decl(d)).loc(),
        }
    }

    /// Number of declarations in the name's redeclaration chain.
    pub fn chain_len(self, ctx: &Context) -> usize {
        match self {
            TopLevelDecl::Fun(d) => ctx.redecls(d).count(),
            TopLevelDecl::Struct(d) => ctx.redecls(d).count(),
            TopLevelDecl::Var(d) => ctx.redecls(d).count(),
        }
    }
}

/// Outcome of a finished compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilationSummary {
    pub num_errors: usize,
    pub num_warnings: usize,
    pub had_error: bool,
    /// A consumer failed to write its output.
    pub output_failed: bool,
}

impl CompilationSummary {
    pub fn succeeded(&self) -> bool {
        !self.had_error && !self.output_failed
    }
}

/// Owns the [`Context`] and [`DiagnosticEngine`] of one module's compilation.
pub struct Compilation {
    ctx: Context,
    diags: DiagnosticEngine,
    main_module: NodeId<ModuleDecl>,
    aliases: Vec<(Identifier, Identifier)>,
    imported: FxHashSet<Identifier>,
    top_level: FxHashMap<Identifier, TopLevelDecl>,
    /// Top-level names in first-declaration order.
    order: Vec<Identifier>,
}

impl Compilation {
    pub fn new(options: &CompilerOptions) -> Result<Self, OptionsError> {
        options.validate_module_name()?;
        let alias_pairs = options.module_aliases()?;
        let diag_options = options.diagnostic_options()?;

        let mut ctx = Context::with_options(&options.context);
        let mut diags = DiagnosticEngine::with_options(&diag_options);
        diags.set_identifiers(ctx.identifiers().clone());

        ctx.set_module_aliases(
            alias_pairs
                .iter()
                .map(|(alias, real)| (alias.as_str(), real.as_str())),
        );
        let aliases = alias_pairs
            .iter()
            .map(|(alias, real)| (ctx.get_identifier(alias), ctx.get_identifier(real)))
            .collect();

        let name = ctx.get_identifier(&options.module_name);
        let main_module = ModuleDecl::create(&mut ctx, ArenaKind::Compilation, name, Span::DUMMY, true);
        ctx.set_main_module(main_module);
        ctx.add_loaded_module(main_module);
        tracing::debug!(module = %options.module_name, ctx = ctx.id().raw(), "created compilation");

        Ok(Compilation {
            ctx,
            diags,
            main_module,
            aliases,
            imported: FxHashSet::default(),
            top_level: FxHashMap::default(),
            order: Vec::new(),
        })
    }

    pub fn add_consumer(&mut self, consumer: Box<dyn DiagnosticConsumer>) -> ConsumerId {
        self.diags.add_consumer(consumer)
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn diagnostics(&self) -> &DiagnosticEngine {
        &self.diags
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticEngine {
        &mut self.diags
    }

    pub fn main_module(&self) -> NodeId<ModuleDecl> {
        self.main_module
    }

    /// What a top-level name currently refers to.
    pub fn lookup(&self, name: &str) -> Option<TopLevelDecl> {
        let name = self.ctx.identifiers().get(name)?;
        self.top_level.get(&name).copied()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(phase = phase.name()))]
    fn run_phase(&mut self, phase: Phase, body: impl FnOnce(&mut Self)) -> PhaseStatus {
        if self.diags.has_fatal_error_occurred()
            || (self.diags.had_any_error() && !phase.runs_after_errors())
        {
            tracing::debug!("skipped");
            return PhaseStatus::Skipped;
        }
        body(self);
        tracing::debug!(
            errors = self.diags.num_errors(),
            warnings = self.diags.num_warnings(),
            "completed"
        );
        PhaseStatus::Completed
    }

    // Imports

    /// Load every imported module.
    ///
    /// A module that has an alias must be imported under the alias;
    /// importing it by its real name is a fatal error.
    pub fn import_modules(&mut self, imports: &[SourceImport<'_>]) -> PhaseStatus {
        self.run_phase(Phase::ImportModules, |this| {
            for &import in imports {
                this.import_module(import);
            }
        })
    }

    fn import_module(&mut self, import: SourceImport<'_>) {
        let name = self.ctx.get_identifier(import.module);
        let alias = self
            .ctx
            .get_real_module_name(name, ModuleAliasLookup::AliasFromRealName);
        if !alias.is_empty() && alias != name {
            self.diags
                .diagnose(import.loc, diag::NoSuchModule, (name,))
                .flush();
            return;
        }

        self.imported.insert(name);
        let real = self
            .ctx
            .get_real_module_name(name, ModuleAliasLookup::AlwaysRealName);
        if self.ctx.get_loaded_module(real).is_some() {
            return;
        }
        let module = ModuleDecl::create(&mut self.ctx, ArenaKind::Compilation, real, import.loc, false);
        self.ctx.add_loaded_module(module);
    }

    // Declarations

    /// Create nodes for `decls` and link redeclarations of the same name.
    pub fn declare(&mut self, decls: &[SourceDecl<'_>]) -> PhaseStatus {
        self.run_phase(Phase::Declare, |this| {
            for decl in decls {
                this.declare_one(decl);
            }
        })
    }

    fn declare_one(&mut self, decl: &SourceDecl<'_>) {
        let name = self.ctx.get_identifier(decl.name());
        let previous = self.top_level.get(&name).copied();

        if let Some(prev) = previous.filter(|prev| prev.kind() != decl.kind()) {
            self.diags
                .diagnose(decl.loc(), diag::InvalidRedeclaration, (name,))
                .flush();
            self.note_previous(prev.kind(), prev.first_loc(&self.ctx));
            return;
        }

        let current = match *decl {
            SourceDecl::Fun {
                loc,
                ref params,
                has_body,
                ..
            } => self.declare_fun(name, loc, params, has_body, previous),
            SourceDecl::Struct { loc, .. } => self.declare_struct(name, loc, previous),
            SourceDecl::Var {
                loc,
                ty,
                ty_loc,
                is_mutable,
                ..
            } => self.declare_var(name, loc, (ty, ty_loc), is_mutable, previous),
        };

        if self.top_level.insert(name, current).is_none() {
            self.order.push(name);
        }
    }

    fn declare_fun(
        &mut self,
        name: Identifier,
        loc: Span,
        params: &[(&str, Span)],
        has_body: bool,
        previous: Option<TopLevelDecl>,
    ) -> TopLevelDecl {
        let params: Vec<(Identifier, Span)> = params
            .iter()
            .map(|&(param, param_loc)| (self.ctx.get_identifier(param), param_loc))
            .collect();
        let fun = FunDecl::create(&mut self.ctx, ArenaKind::Compilation, name, loc, &params, has_body);

        if let Some(TopLevelDecl::Fun(prev)) = previous {
            let first = self.ctx.first_decl(prev);
            let expected = self.ctx.get(first).params().len();
            if expected != params.len() {
                let args = (
                    name,
                    u64::try_from(expected).unwrap_or(u64::MAX),
                    u64::try_from(params.len()).unwrap_or(u64::MAX),
                );
                self.diags
                    .diagnose(loc, diag::ParamCountMismatch, args)
                    .flush();
                let first_loc = self.ctx.get(first).loc();
                self.diags
                    .diagnose(first_loc, diag::DeclaredHere, (name,))
                    .flush();
            }

            if has_body {
                let definition = self
                    .ctx
                    .redecls(prev)
                    .find(|&f| self.ctx.get(f).has_body())
                    .map(|f| self.ctx.get(f).loc());
                if let Some(definition_loc) = definition {
                    self.diagnose_redefinition(DeclKind::Fun, name, loc, definition_loc);
                }
            }
            self.ctx.set_previous_decl(fun, Some(prev));
        }
        TopLevelDecl::Fun(fun)
    }

    fn declare_struct(
        &mut self,
        name: Identifier,
        loc: Span,
        previous: Option<TopLevelDecl>,
    ) -> TopLevelDecl {
        let decl = StructDecl::create(&mut self.ctx, ArenaKind::Compilation, name, loc);
        if let Some(TopLevelDecl::Struct(prev)) = previous {
            let first_loc = self.ctx.get(self.ctx.first_decl(prev)).loc();
            self.diagnose_redefinition(DeclKind::Struct, name, loc, first_loc);
            self.ctx.set_previous_decl(decl, Some(prev));
        }
        TopLevelDecl::Struct(decl)
    }

    fn declare_var(
        &mut self,
        name: Identifier,
        loc: Span,
        (ty, ty_loc): (&str, Span),
        is_mutable: bool,
        previous: Option<TopLevelDecl>,
    ) -> TopLevelDecl {
        if !self.is_known_type(ty) {
            let ty = self.ctx.get_identifier(ty);
            self.diags
                .diagnose(ty_loc, diag::UnknownType, (ty,))
                .flush();
        }

        let decl = VarDecl::create(&mut self.ctx, ArenaKind::Compilation, name, loc, is_mutable);
        if let Some(TopLevelDecl::Var(prev)) = previous {
            let first_loc = self.ctx.get(self.ctx.first_decl(prev)).loc();
            self.diagnose_redefinition(DeclKind::Var, name, loc, first_loc);
            self.ctx.set_previous_decl(decl, Some(prev));
        }
        TopLevelDecl::Var(decl)
    }

    fn is_known_type(&self, ty: &str) -> bool {
        if self.ctx.get_builtin_type(ty).is_some() {
            return true;
        }
        matches!(self.lookup(ty), Some(TopLevelDecl::Struct(_)))
    }

    fn diagnose_redefinition(&mut self, kind: DeclKind, name: Identifier, loc: Span, previous: Span) {
        self.diags
            .diagnose(loc, diag::RedefinitionOfDecl, (kind, name))
            .flush();
        self.note_previous(kind, previous);
    }

    fn note_previous(&mut self, kind: DeclKind, loc: Span) {
        self.diags
            .diagnose(loc, diag::PreviousDeclaration, (kind,))
            .flush();
    }

    // Summary

    /// Report redeclared names and module aliases that were never imported.
    pub fn summarize(&mut self) -> PhaseStatus {
        self.run_phase(Phase::Summarize, |this| {
            for name in this.order.clone() {
                let Some(&decl) = this.top_level.get(&name) else {
                    continue;
                };
                let redeclarations = decl.chain_len(&this.ctx).saturating_sub(1);
                if redeclarations > 0 {
                    let count = i64::try_from(redeclarations).unwrap_or(i64::MAX);
                    let loc = decl.first_loc(&this.ctx);
                    this.diags
                        .diagnose(loc, diag::RedeclarationCount, (name, count))
                        .flush();
                }
            }

            let unused: Vec<Identifier> = this
                .aliases
                .iter()
                .filter(|(alias, _)| !this.imported.contains(alias))
                .map(|&(alias, _)| alias)
                .collect();
            for alias in unused {
                this.diags
                    .diagnose(Span::DUMMY, diag::ModuleAliasUnused, (alias,))
                    .flush();
            }
        })
    }

    /// Finish every consumer and report how the compilation went.
    pub fn finish(mut self) -> CompilationSummary {
        let output_failed = self.diags.finish();
        let summary = CompilationSummary {
            num_errors: self.diags.num_errors(),
            num_warnings: self.diags.num_warnings(),
            had_error: self.diags.had_any_error(),
            output_failed,
        };
        tracing::debug!(?summary, "finished compilation");
        summary
    }
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("ctx", &self.ctx)
            .field("diags", &self.diags)
            .field("top_level", &self.top_level.len())
            .finish_non_exhaustive()
    }
}
