use std::path::Path;

use serde_json::json;

use taskcenter::bootstrap;
use taskcenter::fs::RealFileSystem;
use taskcenter::registry::{TaskCommand, TaskOrigin};
use taskcenter_test_utils::builders::{touch_all, write_json_config, TaskRecordBuilder};
use taskcenter_test_utils::init_tracing;

#[test]
fn discovered_scripts_skip_referenced_and_self() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    touch_all(
        dir.path(),
        &["build.py", "clean_cache.py", "taskcenter.py", "notes.txt"],
    );
    let config = write_json_config(
        dir.path(),
        "tasks.json",
        &[TaskRecordBuilder::new("Build")
            .command_parts(&["{interpreter}", "build.py"])
            .build()],
    );

    let boot = bootstrap(&config, None, Some("taskcenter.py".into()), &RealFileSystem).unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();

    let names: Vec<&str> = boot.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Build", "Clean Cache"]);

    let build = &boot.tasks[0];
    assert_eq!(build.origin, TaskOrigin::Configured);
    assert_eq!(
        build.command,
        TaskCommand::Argv(vec![boot.ctx.interpreter().to_string(), "build.py".into()])
    );
    assert_eq!(build.cwd, root);

    let clean = &boot.tasks[1];
    assert_eq!(clean.origin, TaskOrigin::Discovered);
    assert_eq!(clean.description, "Run clean_cache.py");
    assert_eq!(
        clean.command,
        TaskCommand::Argv(vec![
            boot.ctx.interpreter().to_string(),
            "clean_cache.py".into()
        ])
    );
}

#[test]
fn toml_config_with_placeholders_and_cwd() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("tools")).unwrap();
    std::fs::write(
        dir.path().join("Taskcenter.toml"),
        r#"
[config]
interpreter = "py3"
assets_dir = "data"
discover_scripts = false

[[task]]
name = "Export"
description = "Writes into {assets_dir}"
command = "{python} export.py --out {assets_dir}"
cwd = "tools"

[[task]]
name = "Broken"

[[task]]
name = "Missing dir"
command = ["ls"]
cwd = "does/not/exist"
"#,
    )
    .unwrap();

    let boot = bootstrap(
        &dir.path().join("Taskcenter.toml"),
        None,
        None,
        &RealFileSystem,
    )
    .unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();
    let assets = root.join("data");

    assert_eq!(boot.tasks.len(), 2);
    let export = &boot.tasks[0];
    assert_eq!(export.description, format!("Writes into {}", assets.display()));
    assert_eq!(
        export.command,
        TaskCommand::ShellLine(format!("py3 export.py --out {}", assets.display()))
    );
    assert_eq!(export.cwd, root.join("tools"));

    let missing = &boot.tasks[1];
    assert_eq!(missing.name, "Missing dir");
    assert_eq!(missing.cwd, root);
}

#[test]
fn malformed_config_leaves_only_discovered_scripts() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    touch_all(dir.path(), &["zeta.py", "alphaBeta.py"]);
    std::fs::write(dir.path().join("Taskcenter.toml"), "this is [not toml").unwrap();

    let boot = bootstrap(
        &dir.path().join("Taskcenter.toml"),
        None,
        None,
        &RealFileSystem,
    )
    .unwrap();

    let names: Vec<&str> = boot.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha Beta", "Zeta"]);
}

#[test]
fn missing_config_with_explicit_project_dir() {
    init_tracing();
    let project = tempfile::tempdir().unwrap();
    touch_all(project.path(), &["report.py"]);

    let boot = bootstrap(
        Path::new("definitely-missing-taskcenter.toml"),
        Some(project.path()),
        None,
        &RealFileSystem,
    )
    .unwrap();

    assert_eq!(boot.tasks.len(), 1);
    assert_eq!(boot.tasks[0].name, "Report");
}

#[test]
fn wrongly_typed_records_are_dropped() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = write_json_config(
        dir.path(),
        "tasks.json",
        &[
            json!("not a table"),
            TaskRecordBuilder::new("Nested")
                .raw("command", json!(["echo", ["x"]]))
                .build(),
            TaskRecordBuilder::new("Ok").command_line("echo ok").build(),
            TaskRecordBuilder::new("   ").command_line("echo blank").build(),
        ],
    );

    let boot = bootstrap(&config, None, None, &RealFileSystem).unwrap();
    let names: Vec<&str> = boot.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Ok"]);
}
