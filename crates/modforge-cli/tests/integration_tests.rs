//! End-to-end tests driving the `modforge` binary.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SHA: &str = "958cc5a7a7430f93fac0fd6f8b9aa92fc1801efce0cda797d6029d44080a9b24";

/// Test context that sets up a temporary modforge home
struct TestContext {
    temp_dir: TempDir,
    modforge_home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let modforge_home = temp_dir.path().join(".modforge");
        std::fs::create_dir_all(modforge_home.join("formulas"))
            .expect("failed to create formula dir");
        Self {
            temp_dir,
            modforge_home,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_modforge"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("MODFORGE_HOME", &self.modforge_home);
        cmd.env_remove("MODFORGE_PREFIX");
        cmd.env_remove("MODFORGE_MACOS");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run modforge")
    }

    fn write_formula(&self, file: &str, content: &str) -> PathBuf {
        let path = self.modforge_home.join("formulas").join(file);
        std::fs::write(&path, content).expect("failed to write formula");
        path
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn user_formula(name: &str) -> String {
    format!(
        r#"
[package]
name = "{name}"
version = "0.3.0"
description = "Local test module"

[source]
url = "https://example.com/{name}-0.3.0.tar.gz"
sha256 = "{SHA}"

[[option]]
name = "with-httpd24"

[[rule]]
when = {{ option = "with-httpd24" }}
then.depends = {{ name = "httpd24" }}
"#
    )
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_list_shows_builtin_and_user_formulas() {
    let ctx = TestContext::new();
    ctx.write_formula("mod_local.toml", &user_formula("mod_local"));

    let output = ctx.run(&["list"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("mod_security"));
    assert!(out.contains("mod_wsgi"));
    assert!(out.contains("mod_local"));
    assert!(out.contains("3 formulas"));
}

#[test]
fn test_info_lists_options_and_aliases() {
    let ctx = TestContext::new();
    let output = ctx.run(&["info", "mod-wsgi"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("4.5.14"));
    assert!(out.contains("--with-python"));
    assert!(out.contains("--with-brewed-httpd24"));
}

#[test]
fn test_info_unknown_formula_fails() {
    let ctx = TestContext::new();
    let output = ctx.run(&["info", "mod_php"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not found"));
}

#[test]
fn test_resolve_conflict_exits_nonzero() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "resolve", "mod_wsgi", "--with", "httpd22", "--with", "httpd24", "--macos", "10.12",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Cannot build for httpd22 and httpd24 at the same time"));
}

#[test]
fn test_resolve_missing_build_tools() {
    let ctx = TestContext::new();
    let output = ctx.run(&["resolve", "mod_security", "--macos", "mavericks", "--no-build-tools"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("xcode-select --install"));
}

#[test]
fn test_resolve_json_plan() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "resolve",
        "mod_wsgi",
        "--macos",
        "sierra",
        "--no-build-tools",
        "--json",
        "--prefix",
        "/usr/local",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let deps: Vec<&str> = plan["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(deps, vec!["apr", "apr-util"]);
    assert_eq!(plan["platform"]["version"], "10.12");
    assert_eq!(plan["platform"]["build_tools"], false);

    let args: Vec<&str> = plan["args"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["flag"].as_str().unwrap())
        .collect();
    assert_eq!(args, vec!["--prefix", "--disable-framework", "--with-apxs"]);
    assert_eq!(plan["args"][0]["value"], "/usr/local/Cellar/mod_wsgi/4.5.14");

    let ops = plan["operations"].as_array().unwrap();
    assert_eq!(ops[0]["step"]["program"], "cp");
    assert_eq!(ops[1]["patch"]["file"], "brew-apxs");
    assert!(plan["caveats"].as_str().unwrap().contains("/etc/apache2/httpd.conf"));
}

#[test]
fn test_resolve_reads_macos_from_env() {
    let ctx = TestContext::new();
    let output = ctx
        .cmd()
        .env("MODFORGE_MACOS", "10.9")
        .args(["resolve", "mod_security", "--with", "homebrew-httpd24", "--no-build-tools", "--json"])
        .output()
        .expect("failed to run modforge");
    assert!(output.status.success(), "{}", stderr(&output));

    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let deps = plan["dependencies"].as_array().unwrap();
    assert!(deps.iter().any(|d| d["name"] == "httpd24"));
    assert!(deps.iter().any(|d| d["name"] == "curl"));
}

#[test]
fn test_resolve_human_output_and_unknown_option_warning() {
    let ctx = TestContext::new();
    let output = ctx.run(&["resolve", "mod_wsgi", "--macos", "14", "--with", "bogus"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Dependencies"));
    assert!(out.contains("brew-apxs"));
    assert!(out.contains("Caveats"));
    assert!(out.contains("LoadModule wsgi_module"));
    assert!(stderr(&output).contains("Ignoring unknown option --with-bogus"));
}

#[test]
fn test_check_valid_formula() {
    let ctx = TestContext::new();
    let path = ctx.write_formula("mod_local.toml", &user_formula("mod_local"));
    let output = ctx.run(&["check", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Formula is valid"));
}

#[test]
fn test_check_invalid_formula() {
    let ctx = TestContext::new();
    let broken = user_formula("mod_local").replace("with-httpd24\"\n\n[[rule]]", "with-httpd22\"\n\n[[rule]]");
    let path = ctx.temp_dir.path().join("broken.toml");
    std::fs::write(&path, broken).unwrap();

    let output = ctx.run(&["check", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("undeclared option 'with-httpd24'"));
}
