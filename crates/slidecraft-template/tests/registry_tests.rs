/*
 * registry_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for directory loading and override layering.
 */

use slidecraft_template::TemplateRegistry;
use std::fs;
use std::path::Path;

fn write_template(dir: &Path, file: &str, text: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn test_load_dir_recursive_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_template(
        dir.path(),
        "structure/title.yaml",
        "name: title\ncategory: structure\noutput: \"# {{ content.title }}\"\n",
    );
    write_template(
        dir.path(),
        "content/bullets.yml",
        "name: bullets\ncategory: content\noutput: body\n",
    );
    write_template(dir.path(), "notes.txt", "not a template file\n");

    let mut registry = TemplateRegistry::new();
    let loaded = registry.load_dir(dir.path()).unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(registry.list(), vec!["bullets", "title"]);
}

#[test]
fn test_custom_tree_overrides_builtin() {
    let builtin = tempfile::tempdir().unwrap();
    let custom = tempfile::tempdir().unwrap();
    write_template(
        builtin.path(),
        "title.yaml",
        "name: title\noutput: \"# built-in\"\n",
    );
    write_template(
        builtin.path(),
        "quote.yaml",
        "name: quote\noutput: \"> built-in\"\n",
    );
    write_template(
        custom.path(),
        "title.yaml",
        "name: title\noutput: \"# custom\"\n",
    );

    let mut registry = TemplateRegistry::new();
    registry.load_dir(builtin.path()).unwrap();
    registry.load_dir(custom.path()).unwrap();

    // Custom tree wins for the collision; everything else is untouched.
    assert_eq!(registry.get("title").unwrap().output_source, "# custom");
    assert_eq!(registry.get("quote").unwrap().output_source, "> built-in");
}

#[test]
fn test_failing_file_keeps_earlier_files() {
    let dir = tempfile::tempdir().unwrap();
    write_template(
        dir.path(),
        "a_good.yaml",
        "name: good\noutput: body\n",
    );
    write_template(dir.path(), "b_bad.yaml", "name: bad\n");

    let mut registry = TemplateRegistry::new();
    let err = registry.load_dir(dir.path()).unwrap_err();
    // The bad file is named in the error; the good file stays registered.
    assert!(err.to_string().contains("b_bad.yaml"));
    assert!(registry.get("good").is_some());
}
