// tests/pipeline.rs
//! End-to-end runs over the shipped pages, replayed from memory.

mod common;

use common::{expected_elements, faithful_source, scratch_dir, with_page};
use notion2code::constants::GENERATED_MARKER;
use notion2code::element::{Element, Paragraph};
use notion2code::symbols::UnionObject;
use notion2code::{emit, pages, pipeline, AppError, GeneratorConfig, Translator};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;

fn config_in(dir: &std::path::Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: dir.join("generated"),
        review_dir: dir.join("review"),
        concurrency: 4,
        ..GeneratorConfig::default()
    }
}

#[tokio::test]
async fn test_shipped_pages_translate_and_assemble() {
    let copies = pages::all();
    let source = Arc::new(faithful_source(&copies));
    let outcome = Translator::new(source, 4).translate_all(copies).await;
    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);

    let graph = outcome.into_graph().unwrap();
    let modules: Vec<&str> = graph.modules().iter().map(|m| m.name.as_str()).collect();
    insta::assert_debug_snapshot!(modules, @r###"
    [
        "global",
        "emoji",
        "file",
        "parent",
        "property_value",
        "user",
    ]
    "###);

    let global = &graph.modules()[0];
    assert_eq!(global.symbols, vec!["FileOrEmoji", "Parent", "Person", "User"]);

    let icon = graph.get::<UnionObject>("FileOrEmoji").unwrap();
    assert_eq!(icon.members, vec!["Emoji".to_string(), "File".to_string()]);
    assert!(!icon.comment.is_empty());

    let property_value = graph.modules().iter().find(|m| m.name == "property_value").unwrap();
    assert!(property_value.symbols.contains(&"CheckboxPropertyValue".to_string()));
    assert!(property_value.symbols.contains(&"NumberFormula".to_string()));
    assert!(property_value.symbols.contains(&"ArrayRollup".to_string()));
    assert!(property_value.tests.len() >= 7);
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let mut outputs = Vec::new();
    for concurrency in [1, 5] {
        let copies = pages::all();
        let source = Arc::new(faithful_source(&copies));
        let graph = Translator::new(source, concurrency)
            .translate_all(copies)
            .await
            .into_graph()
            .unwrap();
        outputs.push(emit(&graph).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_run_writes_modules_and_removes_stale_outputs() {
    let dir = scratch_dir("run");
    let config = config_in(&dir);
    fs::create_dir_all(&config.output_dir).unwrap();
    let stale = config.output_dir.join("comment.rs");
    let handwritten = config.output_dir.join("extensions.rs");
    fs::write(&stale, format!("{}\npub struct Comment;\n", GENERATED_MARKER)).unwrap();
    fs::write(&handwritten, "pub trait Extra {}\n").unwrap();

    let copies = pages::all();
    let source = Arc::new(faithful_source(&copies));
    let summary = pipeline::run(&config, source, copies).await.unwrap();

    assert_eq!(summary.pages, 5);
    assert_eq!(summary.report.stats.files_removed, 1);
    for name in ["mod.rs", "runtime.rs", "global.rs", "user.rs", "user_tests.rs", "property_value.rs"] {
        let contents = fs::read_to_string(config.output_dir.join(name)).unwrap();
        assert!(contents.starts_with(GENERATED_MARKER), "{} lacks the marker", name);
    }
    assert!(!stale.exists());
    assert!(handwritten.exists());

    let index = fs::read_to_string(config.output_dir.join("mod.rs")).unwrap();
    assert!(index.contains("mod property_value"));
    assert!(index.contains("property_value_tests"));

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_growth_fails_the_run_and_leaves_a_scaffold() {
    let dir = scratch_dir("growth");
    let config = config_in(&dir);

    let copies = pages::all();
    let user = copies.iter().find(|c| c.page() == "user").unwrap();
    let mut grown = expected_elements(user);
    grown.push(Element::Paragraph(Paragraph {
        text: "Users may also belong to groups.".to_string(),
    }));
    let source = Arc::new(with_page(faithful_source(&copies), user.path(), &grown));

    let err = pipeline::run(&config, source, copies).await.unwrap_err();
    match &err {
        AppError::PagesFailed { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].page, "user");
            assert!(matches!(
                failures[0].error,
                AppError::DocumentationGrowth { unhandled: 1, .. }
            ));
        }
        other => panic!("expected PagesFailed, got {:?}", other),
    }

    let scaffold = fs::read_to_string(config.review_dir.join("user.rs")).unwrap();
    assert!(scaffold.contains("Users may also belong to groups."));
    // Emission is skipped entirely.
    assert!(!config.output_dir.join("mod.rs").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_failed_page_leaves_no_global_symbols() {
    let copies = pages::all();
    let user = copies.iter().find(|c| c.page() == "user").unwrap();
    let mut changed = expected_elements(user);
    changed[0] = Element::Paragraph(Paragraph {
        text: "The User object was rewritten.".to_string(),
    });
    let source = Arc::new(with_page(faithful_source(&copies), user.path(), &changed));

    let outcome = Translator::new(source, 3).translate_all(copies).await;
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0].error,
        AppError::StructuralMismatch { index: 0, .. }
    ));
    assert!(!outcome.global.contains("User"));
    assert!(!outcome.global.contains("Person"));
    assert!(outcome.global.contains("Parent"));
    assert!(outcome.global.contains("FileOrEmoji"));
}

#[tokio::test]
async fn test_every_failure_is_reported() {
    let copies = pages::select(&["emoji".to_string(), "parent".to_string(), "file".to_string()]);
    // Only the file page is served.
    let file = copies.iter().find(|c| c.page() == "file").unwrap();
    let source = Arc::new(with_page(
        notion2code::MemorySource::new(),
        file.path(),
        &expected_elements(file),
    ));

    let outcome = Translator::new(source, 2).translate_all(copies).await;
    let failed: Vec<&str> = outcome.failures.iter().map(|f| f.page.as_str()).collect();
    assert_eq!(failed, vec!["emoji", "parent"]);
    for failure in &outcome.failures {
        assert!(matches!(failure.error, AppError::PageUnavailable { status: 404, .. }));
    }

    let err = outcome.into_graph().unwrap_err();
    assert!(err.to_string().starts_with("2 page translation(s) failed"));
}
