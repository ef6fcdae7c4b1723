//! Command dispatch tests: parse a command line and run it against a temp data dir

use std::fs;

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

use amisite::cli::{execute, Cli, CliResult};
use amisite::exitcode;
use amisite::util::testing;

fn run(data_dir: &TempDir, args: &[&str]) -> CliResult<()> {
    testing::init_test_setup();
    let dir = data_dir.path().to_string_lossy().to_string();
    let mut argv = vec!["amisite", "-D", dir.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("parse args");
    execute(&cli)
}

fn exit_code(result: CliResult<()>) -> i32 {
    match result {
        Ok(()) => exitcode::OK,
        Err(e) => e.exit_code(),
    }
}

#[test]
fn given_menu_commands_when_running_then_menu_file_reflects_them() {
    let temp = TempDir::new().unwrap();

    run(&temp, &["menu", "add", "Beranda", "--url", "/"]).unwrap();
    run(&temp, &["menu", "add", "Profil", "--page", "4"]).unwrap();
    run(&temp, &["menu", "add", "Visi", "--parent", "2", "--draft"]).unwrap();
    run(&temp, &["menu", "reorder", "2", "1"]).unwrap();
    run(&temp, &["menu", "update", "3", "--publish", "--title", "Visi & Misi"]).unwrap();
    run(&temp, &["menu", "tree", "--published"]).unwrap();

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("menu.json")).unwrap()).unwrap();
    assert_eq!(rows[0]["order"], json!(1));
    assert_eq!(rows[1]["order"], json!(0));
    assert_eq!(rows[1]["page_id"], json!(4));
    assert_eq!(rows[2]["title"], json!("Visi & Misi"));
    assert_eq!(rows[2]["is_published"], json!(true));
}

#[test]
fn given_cycle_when_updating_then_exits_with_dataerr() {
    let temp = TempDir::new().unwrap();
    run(&temp, &["menu", "add", "A"]).unwrap();
    run(&temp, &["menu", "add", "B", "--parent", "1"]).unwrap();

    let code = exit_code(run(&temp, &["menu", "update", "1", "--parent", "2"]));

    assert_eq!(code, exitcode::DATAERR);
}

#[test]
fn given_unknown_node_when_removing_then_exits_with_noinput() {
    let temp = TempDir::new().unwrap();

    let code = exit_code(run(&temp, &["menu", "remove", "99"]));

    assert_eq!(code, exitcode::NOINPUT);
}

#[test]
fn given_read_only_flag_when_adding_then_exits_with_noperm() {
    let temp = TempDir::new().unwrap();

    let code = exit_code(run(&temp, &["--read-only", "menu", "add", "A"]));

    assert_eq!(code, exitcode::NOPERM);
    assert!(!temp.path().join("menu.json").exists());
}

#[test]
fn given_legacy_document_file_when_validating_then_lists_violation() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("draft.json");
    fs::write(
        &file,
        r#"{"rows":[{"columns":[{"elements":[{"type":"gallery","galleryColumns":"3"}]}]}]}"#,
    )
    .unwrap();

    let err = run(&temp, &["page", "validate", file.to_str().unwrap()]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].field, "galleryColumns");
}

#[test]
fn given_document_file_when_replacing_and_migrating_then_page_is_stored() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("page.json");
    fs::write(
        &file,
        r#"{"rows":[{"columns":[{"width":12,"elements":[{"type":"text","content":"Halo"}]}]}]}"#,
    )
    .unwrap();

    run(&temp, &["page", "replace", "7", file.to_str().unwrap()]).unwrap();
    run(&temp, &["page", "show", "7"]).unwrap();
    run(&temp, &["page", "migrate", "--dry-run"]).unwrap();

    assert!(temp.path().join("pages/7.json").is_file());
}

#[test]
fn given_missing_page_when_showing_then_exits_with_noinput() {
    let temp = TempDir::new().unwrap();

    let code = exit_code(run(&temp, &["page", "show", "1"]));

    assert_eq!(code, exitcode::NOINPUT);
}

#[test]
fn given_no_command_when_running_then_usage_error() {
    let temp = TempDir::new().unwrap();

    assert_eq!(exit_code(run(&temp, &[])), exitcode::USAGE);
}

#[test]
fn given_local_config_when_removing_then_configured_policy_applies() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".amisite.toml"),
        "[menu]\ndelete_policy = \"cascade\"\n",
    )
    .unwrap();
    run(&temp, &["menu", "add", "A"]).unwrap();
    run(&temp, &["menu", "add", "A1", "--parent", "1"]).unwrap();

    run(&temp, &["menu", "remove", "1"]).unwrap();

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(temp.path().join("menu.json")).unwrap()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn given_file_that_is_not_json_when_replacing_then_exits_with_dataerr_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("broken.json");
    fs::write(&file, r#"{"rows": ["#).unwrap();

    let code = exit_code(run(&temp, &["page", "replace", "3", file.to_str().unwrap()]));

    assert_eq!(code, exitcode::DATAERR);
    assert!(!temp.path().join("pages/3.json").exists());
}
