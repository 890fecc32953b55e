// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java recipes loaded from documents and run over batches of files.

use std::sync::Arc;

use indoc::indoc;
use tugrewrite_java::JavaParser;
use tugrewrite_lst::recipe::RecipeDocument;
use tugrewrite_lst::{print, run_batch, Node, RecipeError, RunOptions, VisitorRegistry};

fn registry() -> VisitorRegistry {
    let mut registry = VisitorRegistry::with_builtins();
    tugrewrite_java::register(&mut registry);
    registry
}

fn parse(text: &str) -> Arc<Node> {
    JavaParser.parse_source(text).unwrap()
}

#[test]
fn registry_knows_the_java_visitors() {
    let registry = registry();
    for name in ["remove-annotation", "add-import", "blank-lines", "rename-identifier"] {
        assert!(registry.contains(name), "{}", name);
    }
}

#[test]
fn toml_recipe_over_a_batch() {
    let recipe = RecipeDocument::from_toml_str(indoc! {r#"
        name = "java.Cleanup"
        description = "Drop @Deprecated and space out methods"

        [[visitors]]
        type = "remove-annotation"
        name = "Deprecated"

        [[visitors]]
        type = "blank-lines"
        minimumAroundMethod = 1
    "#})
    .unwrap()
    .into_recipe(&registry())
    .unwrap();

    let roots = vec![
        parse("class A {\n    @Deprecated\n    void f() {}\n    void g() {}\n}\n"),
        parse("class B {\n    void h() {}\n}\n"),
    ];
    let results = run_batch(&recipe, &roots, &RunOptions::default());

    assert!(results[0].changed());
    assert_eq!(
        print(results[0].tree().unwrap()).unwrap(),
        "class A {\n    void f() {}\n\n    void g() {}\n}\n"
    );
    assert!(!results[1].changed());
    assert!(Arc::ptr_eq(results[1].tree().unwrap(), &roots[1]));
}

#[test]
fn json_recipe_until_stable_converges() {
    let recipe = RecipeDocument::from_json_str(
        r#"{
            "name": "java.Imports",
            "iteration": "until-stable",
            "max-cycles": 5,
            "visitors": [
                { "type": "add-import", "typeName": "java.util.List" },
                { "type": "add-import", "typeName": "java.util.Map" }
            ]
        }"#,
    )
    .unwrap()
    .into_recipe(&registry())
    .unwrap();

    let run = recipe.run(&parse("package a;\n\nclass A {}\n")).unwrap();
    assert!(run.changed);
    assert!(run.converged);
    assert_eq!(run.cycles, 2);
    assert_eq!(
        print(&run.tree).unwrap(),
        "package a;\n\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}\n"
    );
}

#[test]
fn bad_parameters_fail_before_any_tree_is_touched() {
    let document = RecipeDocument::from_toml_str(indoc! {r#"
        name = "java.Broken"

        [[visitors]]
        type = "add-import"
        type-name = "java.util.List"
    "#})
    .unwrap();
    assert!(matches!(
        document.into_recipe(&registry()),
        Err(RecipeError::InvalidParameter { ref parameter, .. }) if parameter == "type-name"
    ));
}
