mod cli;

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::process;
use std::time::Duration;

use clap::Parser;
use sha2::{Digest, Sha256, Sha512};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use treecp::hash::to_hex;
use treecp::{CancelToken, CopyOptions, CopyRequest, CpResult, HashSink};

use crate::cli::{ChecksumAlgo, Cli};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("treecp: {}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "treecp=warn",
        1 => "treecp=info",
        _ => "treecp=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init();
}

fn run(cli: &Cli) -> CpResult<()> {
    let opts = options_from_cli(cli);

    let cancel = match cli.timeout {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            CancelToken::with_timeout(Duration::from_secs_f64(secs))
        }
        _ => CancelToken::new(),
    };

    match cli.checksum {
        None => CopyRequest::new(&cli.source, &cli.dest, opts).run(&cancel),
        Some(ChecksumAlgo::Sha256) => {
            let mut h = Sha256::new();
            copy_hashed(cli, opts, &cancel, &mut h)?;
            println!("{}", to_hex(&h.finalize()));
            Ok(())
        }
        Some(ChecksumAlgo::Sha512) => {
            let mut h = Sha512::new();
            copy_hashed(cli, opts, &cancel, &mut h)?;
            println!("{}", to_hex(&h.finalize()));
            Ok(())
        }
    }
}

fn copy_hashed(
    cli: &Cli,
    opts: CopyOptions,
    cancel: &CancelToken,
    sink: &mut dyn HashSink,
) -> CpResult<()> {
    CopyRequest::new(&cli.source, &cli.dest, opts)
        .with_hash(sink)
        .run(cancel)
}

fn options_from_cli(cli: &Cli) -> CopyOptions {
    let mut opts = CopyOptions::default()
        .with_force(cli.force)
        .with_content_only(cli.content_only)
        .with_no_follow(cli.no_dereference)
        .with_move(cli.move_source)
        .with_revert_on_err(cli.revert)
        .with_error_skip(cli.skip_errors)
        .with_error_log(cli.log_errors || cli.verbose > 0)
        .with_fail_on_existing(cli.fail_on_existing)
        .with_progress(cli.progress);

    if let Some(size) = cli.buffer_size {
        opts = opts.with_buffer_size(size);
    }

    if !cli.exclude.is_empty() {
        let names: Vec<OsString> = cli.exclude.iter().map(OsString::from).collect();
        opts = opts.with_exclude(move |p| {
            p.file_name()
                .is_some_and(|name| names.iter().any(|n| n.as_os_str() == name))
        });
    }

    opts
}
