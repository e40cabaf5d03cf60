use std::path::{Path, PathBuf};

use serde_json::Value;
use stencil::core::builder::{self, WriteOptions};
use stencil::core::catalog::Catalog;
use stencil::core::template::{self, TemplateVars};
use stencil::extension::{PackageName, stub};

fn quiet() -> WriteOptions {
    WriteOptions {
        quiet: true,
        ..WriteOptions::default()
    }
}

fn generate_into(dir: &Path, template: &str, package: &str) -> PathBuf {
    generate_with_author(dir, template, package, "Ada")
}

fn generate_with_author(dir: &Path, template: &str, package: &str, author: &str) -> PathBuf {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let package = PackageName::parse(package).expect("package");
    let bound = TemplateVars::for_package(&package, None, Some(author)).expect("vars");
    let files = catalog
        .get(template)
        .expect("template")
        .render(&bound)
        .expect("render");

    let target = builder::package_dir(dir, package.as_str());
    builder::write_package(&target, &files, quiet()).expect("write");
    target
}

#[test]
fn atom_package_layout() {
    let dir = tempfile::tempdir().unwrap();
    let target = generate_into(dir.path(), "atom-package", "my-ext");

    for file in [
        "package.json",
        "README.md",
        "lib/my-ext.js",
        "lib/MyExtTutorial.js",
        "keymaps/my-ext.json",
    ] {
        assert!(target.join(file).is_file(), "missing {file}");
    }

    let main = std::fs::read_to_string(target.join("lib/my-ext.js")).unwrap();
    assert!(main.contains("class MyExt {"));
    assert!(main.contains("import { MyExtTutorial } from './MyExtTutorial';"));
    assert!(main.contains("atom.config.set('my-ext.showWelcomeOnActivation', true)"));
}

#[test]
fn atom_package_json_embeds_stub_schema() {
    let dir = tempfile::tempdir().unwrap();
    let target = generate_into(dir.path(), "atom-package", "my-ext");

    let text = std::fs::read_to_string(target.join("package.json")).unwrap();
    let manifest: Value = serde_json::from_str(&text).expect("package.json is valid JSON");
    assert_eq!(manifest["name"], "my-ext");
    assert_eq!(manifest["author"], "Ada");

    let expected: Value =
        serde_json::to_value(stub::config_schema().unwrap()).expect("schema as JSON");
    assert_eq!(manifest["configSchema"], expected);
    assert_eq!(manifest["configSchema"]["enable-global-keymaps"]["default"], true);

    let keymap = std::fs::read_to_string(target.join("keymaps/my-ext.json")).unwrap();
    let keymap: Value = serde_json::from_str(&keymap).expect("keymap is valid JSON");
    assert_eq!(keymap["atom-workspace"]["ctrl-alt-shift-h"], "my-ext:run-tutorial");
}

#[test]
fn package_json_stays_valid_with_quotes_in_author() {
    let dir = tempfile::tempdir().unwrap();
    let author = r#"Ada "The Countess" Lovelace \ <ada@example.org>"#;
    let target = generate_with_author(dir.path(), "atom-package", "my-ext", author);

    let text = std::fs::read_to_string(target.join("package.json")).unwrap();
    let manifest: Value = serde_json::from_str(&text).expect("package.json is valid JSON");
    assert_eq!(manifest["author"], author);
}

#[test]
fn package_json_without_author_has_empty_string() {
    let package = PackageName::parse("my-ext").unwrap();
    let bound = TemplateVars::for_package(&package, None, None).unwrap();
    let files = Catalog::builtin()
        .unwrap()
        .get("atom-package")
        .unwrap()
        .render(&bound)
        .unwrap();

    let package_json = files
        .iter()
        .find(|file| file.path == Path::new("package.json"))
        .expect("package.json rendered");
    let manifest: Value = serde_json::from_str(&package_json.contents).unwrap();
    assert_eq!(manifest["author"], "");
}

#[test]
fn bash_builtin_uses_identifier_form() {
    let dir = tempfile::tempdir().unwrap();
    let target = generate_into(dir.path(), "bash-builtin", "line-count");

    let source = std::fs::read_to_string(target.join("line_count.c")).unwrap();
    assert!(source.contains("int line_count_builtin (WORD_LIST *list)"));
    assert!(source.contains("struct builtin line_count_struct = {"));
    assert!(source.contains("printf (\"line_count: %s\\n\""));

    let makefile = std::fs::read_to_string(target.join("Makefile")).unwrap();
    assert!(makefile.contains("line_count.so: line_count.c"));
}

#[test]
fn generate_matches_rendered_entry() {
    let dir = tempfile::tempdir().unwrap();
    let target = generate_into(dir.path(), "atom-package", "my-ext");

    let source = template::generate("my-ext", None).expect("generate");
    let written = std::fs::read_to_string(target.join(&source.path)).unwrap();
    assert_eq!(source.contents, written);
}

#[test]
fn explicit_class_name_is_used() {
    let source = template::generate("zoom-tabs", Some("TabZoomer")).expect("generate");
    assert!(source.contents.contains("class TabZoomer {"));
    assert!(source.contents.contains("'zoom-tabs:run-tutorial'"));
}
