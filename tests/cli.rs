use std::fs::File;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn snapscribe_cmd() -> Command {
    Command::cargo_bin("snapscribe").expect("binary exists")
}

fn write_png(dir: &Path, width: i32, height: i32) -> PathBuf {
    let surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).expect("surface");
    {
        let ctx = cairo::Context::new(&surface).expect("context");
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.paint().expect("paint");
    }
    let path = dir.join("shot.png");
    let mut file = File::create(&path).expect("png file");
    surface.write_to_png(&mut file).expect("write png");
    path
}

#[test]
fn help_prints_usage() {
    snapscribe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Annotate a screenshot and export the flattened image",
        ));
}

#[test]
fn input_is_required() {
    snapscribe_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn missing_input_file_is_reported() {
    let temp = TempDir::new().unwrap();
    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(temp.path().join("nope.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn zero_scale_is_rejected() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 20, 20);
    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(&input)
        .args(["--scale", "0", "--data-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Device pixel ratio"));
}

#[test]
fn data_url_goes_to_stdout() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 32, 24);
    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(&input)
        .arg("--data-url")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("data:image/png;base64,"));
}

#[test]
fn script_is_replayed_before_export() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 64, 48);
    let script = temp.path().join("steps.toml");
    std::fs::write(
        &script,
        r#"
[[step]]
action = "tool"
name = "ArrowTool"

[[step]]
action = "drag"
from = [5.0, 5.0]
to = [50.0, 40.0]
steps = 3

[[step]]
action = "tool"
name = "TextTool"

[[step]]
action = "down"
x = 10.0
y = 30.0

[[step]]
action = "text"
content = "ok"
"#,
    )
    .unwrap();
    let output = temp.path().join("out").join("annotated.png");

    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("annotated.png"));

    let mut file = File::open(&output).expect("export written");
    let exported = cairo::ImageSurface::create_from_png(&mut file).expect("valid PNG");
    assert_eq!((exported.width(), exported.height()), (64, 48));
}

#[test]
fn unknown_tool_in_script_fails() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 16, 16);
    let script = temp.path().join("steps.toml");
    std::fs::write(&script, "[[step]]\naction = \"tool\"\nname = \"LaserTool\"\n").unwrap();

    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .arg("--data-url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool: LaserTool"));
}

#[test]
fn export_defaults_to_configured_directory() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 16, 16);
    let saves = temp.path().join("saves");
    let config_dir = temp.path().join("snapscribe");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[export]\nsave_directory = {:?}\nfilename_template = \"shot\"\n",
            saves.display().to_string()
        ),
    )
    .unwrap();

    snapscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg(&input)
        .assert()
        .success();

    assert!(saves.join("shot.png").exists());
}
