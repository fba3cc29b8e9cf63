// Renders the man page. The CLI is described again here because build
// scripts cannot depend on the crate being built.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Only generate man page if requested or on release
    if std::env::var("GENERATE_MAN").is_ok() || std::env::var("PROFILE").as_deref() == Ok("release")
    {
        generate_man_page();
    }
}

fn generate_man_page() {
    let cmd = build_cli_command();

    let man = clap_mangen::Man::new(cmd);
    let out_dir =
        std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap_or_else(|_| ".".into()));
    let mut buf = Vec::new();
    if man.render(&mut buf).is_err() {
        println!("cargo:warning=failed to render man page");
        return;
    }
    if let Err(e) = std::fs::write(out_dir.join("treecp.1"), buf) {
        println!("cargo:warning=failed to write man page: {}", e);
    }
}

fn build_cli_command() -> clap::Command {
    use clap::{Arg, ArgAction, Command};

    Command::new("treecp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("copy files and directory trees")
        .arg(Arg::new("force").short('f').long("force").action(ArgAction::SetTrue).help("overwrite existing destinations"))
        .arg(Arg::new("content-only").short('c').long("content-only").action(ArgAction::SetTrue).help("copy the children of a directory SOURCE straight into DEST"))
        .arg(Arg::new("no-dereference").short('P').long("no-dereference").action(ArgAction::SetTrue).help("recreate symbolic links instead of copying their targets"))
        .arg(Arg::new("move").short('m').long("move").action(ArgAction::SetTrue).help("remove SOURCE after copying, renaming when possible"))
        .arg(Arg::new("revert").long("revert").action(ArgAction::SetTrue).help("delete a partially written file when its copy fails"))
        .arg(Arg::new("buffer-size").long("buffer-size").value_name("BYTES").help("buffer size for file streaming (default 65536)"))
        .arg(Arg::new("exclude").short('x').long("exclude").value_name("NAME").action(ArgAction::Append).help("leave out entries with this file name"))
        .arg(Arg::new("checksum").long("checksum").value_name("ALGO").help("print a sha256 or sha512 checksum of the copied bytes"))
        .arg(Arg::new("skip-errors").long("skip-errors").action(ArgAction::SetTrue).help("keep going when an entry fails"))
        .arg(Arg::new("log-errors").long("log-errors").action(ArgAction::SetTrue).help("log entries skipped by --skip-errors"))
        .arg(Arg::new("fail-on-existing").long("fail-on-existing").action(ArgAction::SetTrue).help("treat existing files inside a directory copy as errors"))
        .arg(Arg::new("timeout").long("timeout").value_name("SECS").help("cancel the copy after SECS seconds"))
        .arg(Arg::new("progress").long("progress").action(ArgAction::SetTrue).help("show a progress bar"))
        .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::Count).help("explain what is being done"))
        .arg(Arg::new("source").required(true))
        .arg(Arg::new("dest").required(true))
}
