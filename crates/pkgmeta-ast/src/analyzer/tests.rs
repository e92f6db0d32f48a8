use super::*;
use crate::parser::AstGrepParser;
use pkgmeta_record::ExtrasRequire;

fn analyze(source: &str) -> PackageMetadata {
    let result = SetupScriptAnalyzer::new().analyze_source(&AstGrepParser, source);
    assert!(result.is_ok(), "parse failed: {:?}", result.err());
    result.unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_top_level_call() {
    let metadata = analyze(
        r#"
from setuptools import setup

setup(name="foo", version="1.0", install_requires=["bar>=1.0", "baz"])
"#,
    );

    assert_eq!(
        metadata,
        PackageMetadata {
            name: Some("foo".to_string()),
            version: Some("1.0".to_string()),
            python_requires: None,
            install_requires: strings(&["bar>=1.0", "baz"]),
            extras_require: ExtrasRequire::new(),
        }
    );
}

#[test]
fn test_call_inside_main_guard_matches_top_level() {
    let top_level = analyze(
        r#"setup(name="foo", version="1.0", install_requires=["bar>=1.0", "baz"])
"#,
    );
    let guarded = analyze(
        r#"
from setuptools import setup

if __name__ == "__main__":
    setup(name="foo", version="1.0", install_requires=["bar>=1.0", "baz"])
"#,
    );

    assert_eq!(guarded, top_level);
    assert_eq!(guarded.name.as_deref(), Some("foo"));
}

#[test]
fn test_main_guard_must_be_last_statement() {
    let metadata = analyze(
        r#"
if __name__ == "__main__":
    setup(name="foo")

print("done")
"#,
    );

    assert!(metadata.is_unknown());
}

#[test]
fn test_guard_sees_top_level_assignments() {
    let metadata = analyze(
        r#"
VERSION = "2.1"

if "__main__" == __name__:
    setup(name="foo", version=VERSION)
"#,
    );

    assert_eq!(metadata.version.as_deref(), Some("2.1"));
}

#[test]
fn test_namespaced_setup_call() {
    let metadata = analyze(
        r#"
import setuptools

setuptools.setup(name="foo", python_requires=">=3.8")
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("foo"));
    assert_eq!(metadata.python_requires.as_deref(), Some(">=3.8"));
}

#[test]
fn test_other_namespaces_are_not_setup() {
    let metadata = analyze(
        r#"
import distutils.core

distutils.core.setup(name="foo")
other.setup(name="bar")
"#,
    );

    assert!(metadata.is_unknown());
}

#[test]
fn test_kwargs_bundle_via_dict_constructor() {
    let metadata = analyze(
        r#"
kwargs = dict(name="foo", version="1.0")

setup(**kwargs)
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("foo"));
    assert_eq!(metadata.version.as_deref(), Some("1.0"));
    assert!(metadata.install_requires.is_empty());
    assert!(metadata.extras_require.is_empty());
    assert!(metadata.python_requires.is_none());
}

#[test]
fn test_kwargs_bundle_via_dict_display() {
    let metadata = analyze(
        r#"
DEPS = ["requests"]
kwargs = {"name": "foo", "install_requires": DEPS}

setup(version="0.3", **kwargs)
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("foo"));
    assert_eq!(metadata.version.as_deref(), Some("0.3"));
    assert_eq!(metadata.install_requires, strings(&["requests"]));
}

#[test]
fn test_explicit_keyword_beats_bundle() {
    let metadata = analyze(
        r#"
kwargs = dict(name="from-bundle")

setup(name="explicit", **kwargs)
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("explicit"));
}

#[test]
fn test_extras_with_named_group() {
    let metadata = analyze(
        r#"
TEST_DEPS = ["pytest", "mock"]

setup(extras_require={"test": TEST_DEPS})
"#,
    );

    let mut expected = ExtrasRequire::new();
    expected.insert("test".to_string(), strings(&["pytest", "mock"]));
    assert_eq!(metadata.extras_require, expected);
}

#[test]
fn test_extras_skip_only_bad_groups() {
    let metadata = analyze(
        r#"
EXTRAS = {
    "docs": ["sphinx"],
    "dev": compute_dev(),
    KEY: ["ignored"],
    "test": ("pytest",),
}

setup(extras_require=EXTRAS)
"#,
    );

    let groups: Vec<&str> = metadata.extras_require.keys().map(String::as_str).collect();
    assert_eq!(groups, vec!["docs", "test"]);
    assert_eq!(metadata.extras_require["test"], strings(&["pytest"]));
}

#[test]
fn test_non_string_elements_are_skipped() {
    let metadata = analyze(
        r#"
setup(install_requires=["a", 1, other, "b", f"c{x}"])
"#,
    );

    assert_eq!(metadata.install_requires, strings(&["a", "b"]));
}

#[test]
fn test_unresolvable_fields_stay_unknown() {
    let metadata = analyze(
        r#"
import os

setup(
    name=get_name(),
    version="1." + "0",
    install_requires=open("requirements.txt").read().splitlines(),
    python_requires=MISSING,
)
"#,
    );

    assert!(metadata.is_unknown());
}

#[test]
fn test_first_assignment_wins() {
    let metadata = analyze(
        r#"
VERSION = "1.0"
VERSION = "2.0"

setup(version=VERSION)
"#,
    );

    assert_eq!(metadata.version.as_deref(), Some("1.0"));
}

#[test]
fn test_name_resolution_is_single_level() {
    let metadata = analyze(
        r#"
BASE = "foo"
NAME = BASE

setup(name=NAME)
"#,
    );

    assert!(metadata.name.is_none());
}

#[test]
fn test_call_in_function_sees_only_function_definitions() {
    let metadata = analyze(
        r#"
VERSION = "1.0"

def main():
    NAME = "foo"
    setup(name=NAME, version=VERSION)

main()
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("foo"));
    assert!(metadata.version.is_none());
}

#[test]
fn test_first_function_with_setup_wins() {
    let metadata = analyze(
        r#"
def helper():
    return 1

def build():
    setup(name="first")

def build_again():
    setup(name="second")
"#,
    );

    assert_eq!(metadata.name.as_deref(), Some("first"));
}

#[test]
fn test_no_registration_call() {
    let metadata = analyze(
        r#"
import sys

print(sys.argv)
"#,
    );

    assert_eq!(metadata, PackageMetadata::default());
}

#[test]
fn test_analysis_is_idempotent() {
    let source = r#"
DEPS = ["a", "b"]
setup(name="foo", install_requires=DEPS, extras_require={"x": ["c"]})
"#;
    assert_eq!(analyze(source), analyze(source));
}

#[test]
fn test_syntax_error_surfaces() {
    let result = SetupScriptAnalyzer::new().analyze_source(&AstGrepParser, "setup(name=\"foo\"\n");
    assert!(result.is_err());
}

#[test]
fn test_indentation_error_surfaces() {
    let result =
        SetupScriptAnalyzer::new().analyze_source(&AstGrepParser, "def f():\nsetup(name='a')\n");
    assert!(result.is_err());
}
