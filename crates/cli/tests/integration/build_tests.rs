//! Build command integration tests.

use std::fs;

use predicates::prelude::*;

use super::common::{TestEnv, archive_files};

/// sha256("hi")
const HI_SHA256: &str = "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4";

const SIMPLE: &str = r#"
name: a
displayName: A
version: 1.0
description: d
sources:
  f.txt: hello.txt
"#;

#[test]
fn build_local_package() {
    let env = TestEnv::with_descriptor(SIMPLE);
    env.write_file("pkg/hello.txt", "hi");

    env.mkpkg_cmd()
        .arg(&env.descriptor_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Download file://"))
        .stdout(predicate::str::contains("Data a-1.0\tOK"))
        .stdout(predicate::str::contains("Tar a-1.0\tOK"))
        .stdout(predicate::str::contains("1 package built, 0 skipped, 0 failed"));

    let pkg_dir = env.build_path().join("a-1.0");
    assert_eq!(fs::read_to_string(pkg_dir.join("f.txt")).unwrap(), "hi");

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(pkg_dir.join("mods.json")).unwrap()).unwrap();
    assert_eq!(
        manifest,
        serde_json::json!({
            "name": "a",
            "displayName": "A",
            "version": "1.0",
            "description": "d",
            "section": "any",
            "dependencies": {},
            "conflicts": {},
            "files": { "f.txt": { "sha256": HI_SHA256 } }
        })
    );

    let files = archive_files(&env.build_path().join("a-1.0.tar"));
    let names: Vec<_> = files.keys().map(String::as_str).collect();
    assert_eq!(names, ["f.txt", "mods.json"]);
    assert_eq!(files["f.txt"], "hi");
}

#[test]
fn second_run_is_skipped() {
    let env = TestEnv::with_descriptor(SIMPLE);
    env.write_file("pkg/hello.txt", "hi");

    env.mkpkg_cmd().arg(&env.descriptor_path).assert().success();
    let archive = env.build_path().join("a-1.0.tar");
    let before = fs::metadata(&archive).unwrap().modified().unwrap();

    env.mkpkg_cmd()
        .arg(&env.descriptor_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("a-1.0 SKIPPED"))
        .stdout(predicate::str::contains("Download").not())
        .stdout(predicate::str::contains("0 packages built, 1 skipped, 0 failed"));

    assert_eq!(fs::metadata(&archive).unwrap().modified().unwrap(), before);
}

#[test]
fn variables_expand_in_sources() {
    let env = TestEnv::with_descriptor(
        r#"
name: core
displayName: Core
version: 2
description: d
depends:
  forge: any
  lib: 1.5
sources:
  mods/: files/$name-${mc}.jar
"#,
    );
    env.write_file("pkg/files/core-1.20.1.jar", "jar");

    env.mkpkg_cmd()
        .arg("-D")
        .arg("mc=1.20.1")
        .arg(&env.descriptor_path)
        .assert()
        .success();

    let pkg_dir = env.build_path().join("core-2");
    assert_eq!(fs::read_to_string(pkg_dir.join("mods/core-1.20.1.jar")).unwrap(), "jar");

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(pkg_dir.join("mods.json")).unwrap()).unwrap();
    assert_eq!(manifest["dependencies"], serde_json::json!({ "forge": "(,)", "lib": "1.5" }));
    assert!(manifest["files"]["mods/core-1.20.1.jar"]["sha256"].is_string());
}

#[test]
fn failure_continues_with_next_package() {
    let env = TestEnv::with_descriptor(
        r#"
name: bad
displayName: Bad
version: 1
description: d
sources:
  x.txt: missing.txt
---
name: good
displayName: Good
version: 1
description: d
sources:
  ok.txt: ok.txt
"#,
    );
    env.write_file("pkg/ok.txt", "ok");

    env.mkpkg_cmd()
        .arg(&env.descriptor_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("1 package built, 0 skipped, 1 failed"))
        .stderr(predicate::str::contains("Source file not found"));

    assert!(env.build_path().join("good-1.tar").exists());
    assert!(!env.build_path().join("bad-1.tar").exists());
}

#[test]
fn multiple_descriptor_files() {
    let env = TestEnv::with_descriptor(SIMPLE);
    env.write_file("pkg/hello.txt", "hi");
    env.write_file(
        "other/minecraft_pkg.yml",
        "name: b\ndisplayName: B\nversion: '0.1'\ndescription: d\nsources:\n  cfg/: b.toml\n",
    );
    env.write_file("other/b.toml", "x = 1");

    env.mkpkg_cmd()
        .arg(&env.descriptor_path)
        .arg(env.temp.path().join("other/minecraft_pkg.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 packages built"));

    let files = archive_files(&env.build_path().join("b-0.1.tar"));
    assert_eq!(files["cfg/b.toml"], "x = 1");
}
