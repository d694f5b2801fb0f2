//! Whole-compilation tests: options in, diagnostics and AST out.

use pretty_assertions::assert_eq;
use stone_ast::{Decl, Span};
use stone_compile::{
    Compilation, CompilerOptions, OptionsError, PhaseStatus, SourceDecl, SourceImport,
    TopLevelDecl,
};
use stone_diagnostic::{
    CollectingConsumer, DiagnosticLevel, DiagnosticMessage, TextDiagnosticPrinter,
};

fn compile(options: &CompilerOptions) -> (Compilation, CollectingConsumer) {
    let collector = CollectingConsumer::new();
    let mut compilation = Compilation::new(options).unwrap();
    compilation.add_consumer(Box::new(collector.clone()));
    (compilation, collector)
}

fn rendered(collector: &CollectingConsumer) -> Vec<String> {
    collector.messages().iter().map(DiagnosticMessage::to_string).collect()
}

fn fun<'a>(name: &'a str, at: u32, params: &[&'a str], has_body: bool) -> SourceDecl<'a> {
    SourceDecl::Fun {
        name,
        loc: Span::new(at, at + 1),
        params: params.iter().map(|&p| (p, Span::new(at, at + 1))).collect(),
        has_body,
    }
}

fn var<'a>(name: &'a str, at: u32, ty: &'a str) -> SourceDecl<'a> {
    SourceDecl::Var {
        name,
        loc: Span::new(at, at + 1),
        ty,
        ty_loc: Span::new(at + 2, at + 3),
        is_mutable: false,
    }
}

#[test]
fn test_clean_compilation() {
    let options = CompilerOptions {
        module_aliases: vec!["Net=NetCore".to_owned()],
        ..CompilerOptions::new("App")
    };
    let (mut compilation, collector) = compile(&options);

    let imports = [SourceImport {
        module: "Net",
        loc: Span::new(0, 3),
    }];
    assert_eq!(compilation.import_modules(&imports), PhaseStatus::Completed);

    let decls = [
        fun("main", 10, &[], false),
        SourceDecl::Struct {
            name: "Point",
            loc: Span::new(20, 25),
        },
        var("origin", 30, "Point"),
        var("count", 40, "int"),
        fun("main", 50, &[], true),
    ];
    assert_eq!(compilation.declare(&decls), PhaseStatus::Completed);
    assert_eq!(compilation.summarize(), PhaseStatus::Completed);

    let ctx = compilation.context();
    let main = ctx.main_module().unwrap();
    assert_eq!(main, compilation.main_module());
    assert!(ctx.get(main).is_main());

    let net = ctx.identifiers().get("Net").unwrap();
    let module = ctx.get_loaded_module(net).unwrap();
    assert_eq!(&*ctx.identifier_str(ctx.get(module).name()), "NetCore");
    assert_eq!(ctx.loaded_modules().count(), 2);

    let Some(TopLevelDecl::Fun(latest)) = compilation.lookup("main") else {
        panic!("main is not a function");
    };
    let first = ctx.first_decl(latest);
    assert!(ctx.get(latest).has_body());
    assert!(!ctx.get(first).has_body());
    assert_eq!(ctx.most_recent_decl(first), latest);
    assert_eq!(ctx.redecls(latest).count(), 2);

    assert_eq!(rendered(&collector), vec!["remark: 'main' has 1 redeclarations"]);
    let summary = compilation.finish();
    assert!(summary.succeeded());
    assert_eq!(summary.num_errors, 0);
    assert!(collector.is_finished());
}

#[test]
fn test_redefinition_stops_later_phases() {
    let (mut compilation, collector) = compile(&CompilerOptions::new("App"));
    let decls = [fun("main", 0, &[], true), fun("main", 10, &[], true)];
    assert_eq!(compilation.declare(&decls), PhaseStatus::Completed);
    assert_eq!(compilation.summarize(), PhaseStatus::Skipped);
    assert_eq!(compilation.declare(&[]), PhaseStatus::Skipped);

    assert_eq!(
        rendered(&collector),
        vec![
            "error: redefinition of function 'main'",
            "note: previous declaration of function is here",
        ]
    );
    let messages = collector.messages();
    assert_eq!(messages[0].loc, Span::new(10, 11));
    assert_eq!(messages[1].loc, Span::new(0, 1));

    // Invalid redeclarations still join the chain.
    let Some(TopLevelDecl::Fun(latest)) = compilation.lookup("main") else {
        panic!("main is not a function");
    };
    assert_eq!(compilation.context().redecls(latest).count(), 2);

    let summary = compilation.finish();
    assert!(!summary.succeeded());
    assert_eq!(summary.num_errors, 1);
}

#[test]
fn test_param_count_mismatch() {
    let (mut compilation, collector) = compile(&CompilerOptions::new("App"));
    let decls = [fun("add", 0, &["a", "b"], false), fun("add", 10, &["a"], true)];
    compilation.declare(&decls);

    assert_eq!(
        rendered(&collector),
        vec![
            "error: function 'add' takes 2 parameters but this declaration has 1",
            "note: 'add' declared here",
        ]
    );
}

#[test]
fn test_redeclaration_as_different_kind() {
    let (mut compilation, collector) = compile(&CompilerOptions::new("App"));
    let decls = [
        SourceDecl::Struct {
            name: "Point",
            loc: Span::new(0, 5),
        },
        var("Point", 10, "int"),
    ];
    compilation.declare(&decls);

    assert_eq!(
        rendered(&collector),
        vec![
            "error: invalid redeclaration of 'Point'",
            "note: previous declaration of struct is here",
        ]
    );
    assert!(matches!(compilation.lookup("Point"), Some(TopLevelDecl::Struct(_))));
}

#[test]
fn test_unknown_type() {
    let (mut compilation, collector) = compile(&CompilerOptions::new("App"));
    compilation.declare(&[var("p", 0, "Pointt")]);

    let messages = collector.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, DiagnosticLevel::Error);
    assert_eq!(messages[0].text, "cannot find type 'Pointt' in scope");
    assert_eq!(messages[0].loc, Span::new(2, 3));
}

#[test]
fn test_import_by_real_name_is_fatal() {
    let options = CompilerOptions {
        module_aliases: vec!["Net=NetCore".to_owned()],
        ..CompilerOptions::new("App")
    };
    let (mut compilation, collector) = compile(&options);
    let imports = [
        SourceImport {
            module: "NetCore",
            loc: Span::new(0, 7),
        },
        SourceImport {
            module: "NetCore",
            loc: Span::new(8, 15),
        },
    ];
    assert_eq!(compilation.import_modules(&imports), PhaseStatus::Completed);
    assert_eq!(compilation.declare(&[fun("main", 20, &[], true)]), PhaseStatus::Skipped);

    // The second import is dropped: nothing is reported after a fatal error.
    assert_eq!(rendered(&collector), vec!["fatal error: no such module 'NetCore'"]);
    assert!(compilation.diagnostics().has_fatal_error_occurred());
    assert_eq!(compilation.lookup("main"), None);
}

#[test]
fn test_unused_alias_warning() {
    let options = CompilerOptions {
        module_aliases: vec!["Net=NetCore".to_owned(), "Log=Logging".to_owned()],
        ..CompilerOptions::new("App")
    };
    let (mut compilation, collector) = compile(&options);
    compilation.import_modules(&[SourceImport {
        module: "Log",
        loc: Span::DUMMY,
    }]);
    compilation.summarize();

    assert_eq!(rendered(&collector), vec!["warning: module alias 'Net' is never imported"]);
    let summary = compilation.finish();
    assert_eq!(summary.num_warnings, 1);
    assert!(summary.succeeded());
}

#[test]
fn test_warnings_as_errors_and_ignored_names() {
    let mut options = CompilerOptions {
        module_aliases: vec!["Net=NetCore".to_owned()],
        ..CompilerOptions::new("App")
    };
    options.diagnostics.warnings_as_errors = true;
    let (mut compilation, collector) = compile(&options);
    compilation.summarize();
    assert_eq!(rendered(&collector), vec!["error: module alias 'Net' is never imported"]);
    assert!(!compilation.finish().succeeded());

    options.ignored_diagnostics = vec!["ModuleAliasUnused".to_owned()];
    let (mut compilation, collector) = compile(&options);
    compilation.summarize();
    assert!(collector.is_empty());
    assert!(compilation.finish().succeeded());
}

#[test]
fn test_invalid_options() {
    let options = CompilerOptions {
        module_aliases: vec!["Net".to_owned()],
        ..CompilerOptions::new("App")
    };
    assert_eq!(
        Compilation::new(&options).unwrap_err(),
        OptionsError::MalformedModuleAlias("Net".to_owned())
    );
    assert_eq!(
        Compilation::new(&CompilerOptions::new("struct")).unwrap_err(),
        OptionsError::InvalidModuleName("struct".to_owned())
    );
}

#[test]
fn test_printer_output() {
    let source = "fun main() {}\nfun main() {}\n";
    let mut compilation = Compilation::new(&CompilerOptions::new("App")).unwrap();
    compilation.add_consumer(Box::new(
        TextDiagnosticPrinter::new(std::io::sink()).with_source("main.stone", source),
    ));
    compilation.declare(&[
        SourceDecl::Fun {
            name: "main",
            loc: Span::new(4, 8),
            params: Vec::new(),
            has_body: true,
        },
        SourceDecl::Fun {
            name: "main",
            loc: Span::new(18, 22),
            params: Vec::new(),
            has_body: true,
        },
    ]);
    let summary = compilation.finish();
    assert!(summary.had_error);
    assert!(!summary.output_failed);
}
