//! CLI integration tests for rigging.
//!
//! Every test runs in a fresh temp directory with `HOME` pointed at it, so
//! no user config leaks in.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the rigging binary command, isolated in `dir`.
fn rigging(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rigging").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_project_config(dir: &Path, contents: &str) {
    fs::create_dir_all(dir.join(".rigging")).unwrap();
    fs::write(dir.join(".rigging/config.toml"), contents).unwrap();
}

// ============================================================================
// rigging variant
// ============================================================================

#[test]
fn test_variant_explicit_windows() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["variant", "--name", "demo", "--version", "1.2", "--variant", "win64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project: demo 1.2 (win64)"))
        .stdout(predicate::str::contains("windows: true"))
        .stdout(predicate::str::contains("executable: demo.exe"))
        .stdout(predicate::str::contains("shared library: demo.dll"))
        .stdout(predicate::str::contains("output path: (set `paths.output`)"));
}

#[test]
fn test_variant_from_set_value() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["variant", "--set", "projects.default_variant=linux32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("variant: linux32"))
        .stdout(predicate::str::contains("linux: true"))
        .stdout(predicate::str::contains("shared library: libproject.so"));
}

#[test]
fn test_variant_from_project_config() {
    let tmp = temp_dir();
    write_project_config(
        tmp.path(),
        r#"
[projects]
default_variant = "macos64"

[paths]
output = "/out"
"#,
    );

    rigging(tmp.path())
        .args(["variant", "--name", "viewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared library: libviewer.dylib"))
        .stdout(predicate::str::contains("output path: /out/macos64"));
}

#[test]
fn test_variant_empty_fails() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["variant", "--name", "demo", "--set", "projects.default_variant="])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot determine the variant for project `demo`",
        ))
        .stderr(predicate::str::contains("projects.default_variant"));
}

#[test]
fn test_malformed_config_fails() {
    let tmp = temp_dir();
    write_project_config(tmp.path(), "[projects\ndefault_variant = ");

    rigging(tmp.path())
        .args(["variant"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

// ============================================================================
// rigging flags
// ============================================================================

#[test]
fn test_flags_missing_tool_names_command() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["flags", "--command", "rigging-no-such-config-tool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "failed to run: 'rigging-no-such-config-tool --cflags' (executable not found)",
        ));
}

#[test]
fn test_flags_pkg_config_requires_package() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["flags", "--tool", "pkg-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no packages given"));
}

#[test]
fn test_flags_no_matching_types_runs_nothing() {
    let tmp = temp_dir();

    rigging(tmp.path())
        .args(["flags", "--command", "rigging-no-such-config-tool", "--types", "archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Inputs for: archive"));
}

#[cfg(unix)]
fn fake_sdl2_config(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-sdl2-config");
    fs::write(
        &script,
        "#!/bin/sh\n\
         case \"$1\" in\n\
           --cflags) echo '-I/fake/include/SDL2 -D_REENTRANT' ;;\n\
           --libs) echo '-L/fake/lib -lSDL2' ;;\n\
           --static-libs) echo '-L/fake/lib -lSDL2 -lm -pthread' ;;\n\
           *) exit 2 ;;\n\
         esac\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_flags_text_output() {
    let tmp = temp_dir();
    let script = fake_sdl2_config(tmp.path());

    rigging(tmp.path())
        .args(["flags", "--command"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("-I/fake/include/SDL2"))
        .stdout(predicate::str::contains("-D_REENTRANT"))
        .stdout(predicate::str::contains("-L/fake/lib"))
        .stdout(predicate::str::contains("-lSDL2"));
}

#[cfg(unix)]
#[test]
fn test_flags_static_json_from_config() {
    let tmp = temp_dir();
    let script = fake_sdl2_config(tmp.path());
    write_project_config(
        tmp.path(),
        &format!(
            "[sdl_config]\ncommand = \"{}\"\nstatic = \"yes\"\n",
            script.display()
        ),
    );

    let output = rigging(tmp.path())
        .args(["flags", "--types", "link", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["command_types"], serde_json::json!(["link"]));
    assert_eq!(json["libraries"], serde_json::json!(["SDL2", "m"]));
    assert_eq!(json["flags"], serde_json::json!(["-pthread"]));
    assert_eq!(json["include_paths"], serde_json::json!([]));
}
