use std::{fs, path::Path};

use stickywheel::{
    application::{Application, CommandKind},
    dependency::MAIN_GROUP,
    io::{Io, Verbosity},
    StickyWheelPlugin,
};
use tempfile::TempDir;

// Collects debug lines so tests can assert on diagnostics.
#[derive(Default)]
struct CapturingIo {
    lines: std::cell::RefCell<Vec<(String, Verbosity)>>,
}

impl Io for CapturingIo {
    fn write_line(&self, line: &str, verbosity: Verbosity) {
        self.lines.borrow_mut().push((line.to_string(), verbosity));
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn load_app(root: &Path) -> Application {
    let mut app = Application::load(root).unwrap();
    app.add_plugin(StickyWheelPlugin::default()).unwrap();
    app
}

#[test_log::test]
fn minimum_strategy_pins_sibling_project() {
    let temp_dir = TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("app");

    write(
        &app_dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "app"
version = "1.0.0"

[tool.poetry.dependencies]
pkg = { path = "../pkg" }

[tool.stickywheel]
strategy = "minimum"
"#,
    );
    write(
        &temp_dir.path().join("pkg/pyproject.toml"),
        r#"[tool.poetry]
name = "pkg"
version = "2.3.1"
"#,
    );

    let mut app = load_app(&app_dir);
    let io = CapturingIo::default();
    app.run(CommandKind::Build, &io).unwrap();

    let main = app.package().dependency_group(MAIN_GROUP).unwrap();
    assert_eq!(main.len(), 1);

    let pkg = main.get("pkg").unwrap();
    assert_eq!(pkg.constraint(), Some(">=2.3.1"));
    assert!(main.iter().all(|d| !d.is_directory()));

    let lines = io.lines.borrow();
    assert_eq!(
        *lines,
        vec![
            (
                "Updating dependency constraints...".to_string(),
                Verbosity::Debug
            ),
            ("  • Pinning pkg (>=2.3.1)".to_string(), Verbosity::Debug),
        ]
    );
}

#[test_log::test]
fn path_without_descriptor_is_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("app");
    fs::create_dir_all(temp_dir.path().join("vendored")).unwrap();

    write(
        &app_dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "app"
version = "1.0.0"

[tool.poetry.dependencies]
vendored = { path = "../vendored" }
"#,
    );

    let mut app = load_app(&app_dir);
    let before = app.package().dependency_group(MAIN_GROUP).cloned();

    let io = CapturingIo::default();
    app.run(CommandKind::Publish, &io).unwrap();

    assert_eq!(app.package().dependency_group(MAIN_GROUP).cloned(), before);
    assert_eq!(io.lines.borrow().len(), 1);
}

#[test]
fn default_strategy_is_semver() {
    let temp_dir = TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("app");

    write(
        &app_dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "app"
version = "1.0.0"

[tool.poetry.dependencies]
pkg = { path = "../pkg", develop = true }

[tool.stickywheel]
strategy = "whatever"
"#,
    );
    write(
        &temp_dir.path().join("pkg/pyproject.toml"),
        r#"[tool.poetry]
name = "pkg"
version = "0.1.0"
"#,
    );

    let mut app = load_app(&app_dir);
    app.run(CommandKind::Build, &CapturingIo::default()).unwrap();

    let main = app.package().dependency_group(MAIN_GROUP).unwrap();
    assert_eq!(main.get("pkg").unwrap().constraint(), Some("^0.1.0"));
}

#[test]
fn other_commands_leave_group_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("app");

    write(
        &app_dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "app"
version = "1.0.0"

[tool.poetry.dependencies]
pkg = { path = "../pkg" }
"#,
    );
    write(
        &temp_dir.path().join("pkg/pyproject.toml"),
        r#"[tool.poetry]
name = "pkg"
version = "0.1.0"
"#,
    );

    let mut app = load_app(&app_dir);
    let io = CapturingIo::default();
    app.run(CommandKind::Other("install".into()), &io).unwrap();

    let main = app.package().dependency_group(MAIN_GROUP).unwrap();
    assert!(main.get("pkg").unwrap().is_directory());
    assert!(io.lines.borrow().is_empty());
}

#[test]
fn sibling_missing_name_aborts_command() {
    let temp_dir = TempDir::new().unwrap();
    let app_dir = temp_dir.path().join("app");

    write(
        &app_dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "app"
version = "1.0.0"

[tool.poetry.dependencies]
pkg = { path = "../pkg" }
"#,
    );
    write(
        &temp_dir.path().join("pkg/pyproject.toml"),
        r#"[tool.poetry]
version = "0.1.0"
"#,
    );

    let mut app = load_app(&app_dir);
    let result = app.run(CommandKind::Publish, &CapturingIo::default());

    assert!(result.is_err());
}
