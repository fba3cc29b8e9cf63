//! Integration tests: compare treecp against GNU cp, plus binary surface

mod common;
use common::*;

use std::process::Command as StdCommand;

fn has_gnu_cp() -> bool {
    StdCommand::new("/usr/bin/cp")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

macro_rules! skip_no_gnu {
    () => {
        if !has_gnu_cp() {
            eprintln!("SKIP: GNU cp not found");
            return;
        }
    };
}

fn gnu_cp(args: &[&str], src: &std::path::Path, dst: &std::path::Path) {
    let out = StdCommand::new("/usr/bin/cp")
        .args(args)
        .arg(src)
        .arg(dst)
        .output()
        .unwrap();
    assert!(out.status.success(), "GNU cp failed: {:?}", out);
}

// ─── Compare single file copy ────────────────────────────────────────────────

#[test]
fn integ_single_file_matches_gnu() {
    skip_no_gnu!();
    let e = Env::new();
    let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
    e.file_mode("src", &data, 0o640);

    gnu_cp(&["-p"], &e.p("src"), &e.p("gnu"));
    treecp().arg(e.p("src")).arg(e.p("our")).assert().success();

    assert_eq!(bytes(&e.p("gnu")), bytes(&e.p("our")));
    assert_eq!(mode(&e.p("gnu")), mode(&e.p("our")));
}

// ─── Compare recursive copy ──────────────────────────────────────────────────

#[test]
fn integ_recursive_content_only_matches_gnu() {
    skip_no_gnu!();
    let e = Env::new();
    e.file("src/f1", "one");
    e.file("src/a/f2", "two");
    e.file_mode("src/a/b/f3", "three", 0o600);
    e.dir("src/empty");

    gnu_cp(&["-R", "-p"], &e.p("src"), &e.p("gnu"));
    treecp().arg("-c").arg(e.p("src")).arg(e.p("our")).assert().success();

    for rel in ["f1", "a/f2", "a/b/f3"] {
        assert_eq!(content(&e.p(&format!("gnu/{rel}"))), content(&e.p(&format!("our/{rel}"))));
        assert_eq!(mode(&e.p(&format!("gnu/{rel}"))), mode(&e.p(&format!("our/{rel}"))));
    }
    assert!(e.p("our/empty").is_dir());
    assert_eq!(file_count(&e.p("gnu")), file_count(&e.p("our")));
}

#[test]
fn integ_dereference_matches_gnu_l() {
    skip_no_gnu!();
    let e = Env::new();
    e.file("src/f1", "one");
    e.symlink("../f1", "src/a/link");

    gnu_cp(&["-R", "-L"], &e.p("src"), &e.p("gnu"));
    treecp().arg("-c").arg(e.p("src")).arg(e.p("our")).assert().success();

    assert!(!is_symlink(&e.p("our/a/link")));
    assert_eq!(content(&e.p("gnu/a/link")), content(&e.p("our/a/link")));
}

#[test]
fn integ_no_dereference_points_at_same_file_as_gnu() {
    skip_no_gnu!();
    let e = Env::new();
    e.file("src/f1", "one");
    e.symlink("../f1", "src/a/link");

    gnu_cp(&["-R", "-P"], &e.p("src"), &e.p("gnu"));
    treecp().args(["-c", "-P"]).arg(e.p("src")).arg(e.p("our")).assert().success();

    assert!(is_symlink(&e.p("gnu/a/link")));
    assert!(is_symlink(&e.p("our/a/link")));
    // GNU keeps the relative text; treecp stores the resolved absolute path.
    assert_eq!(ino(&e.p("our/a/link")), ino(&e.p("src/f1")));
}

// ─── Binary surface ──────────────────────────────────────────────────────────

#[test]
fn integ_exit_code_success() {
    let e = Env::new();
    e.file("src", "x");

    treecp()
        .arg(e.p("src"))
        .arg(e.p("dst"))
        .assert()
        .success()
        .code(0)
        .stdout("");
}

#[test]
fn integ_exit_code_failure() {
    let e = Env::new();

    treecp()
        .arg("/nonexistent")
        .arg(e.p("whatever"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn integ_help_flag() {
    treecp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("copy files and directory trees"))
        .stdout(predicates::str::contains("--content-only"));
}

#[test]
fn integ_version_flag() {
    treecp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("treecp"));
}

#[test]
fn integ_progress_flag_without_tty() {
    let e = Env::new();
    e.sample_tree("A");

    treecp()
        .arg("--progress")
        .arg(e.p("A"))
        .arg(e.p("B"))
        .assert()
        .success();

    assert_eq!(content(&e.p("B/A/sub/y.txt")), "world");
}
