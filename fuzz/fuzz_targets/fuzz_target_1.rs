#![no_main]

use libfuzzer_sys::fuzz_target;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // Fuzz destination path handling with arbitrary byte sequences
    let os = OsStr::from_bytes(data);
    let p = Path::new(os);

    // clean_path: never panics, never leaves `.` components behind
    let cleaned = treecp::util::clean_path(p);
    if cleaned != Path::new(".") {
        assert!(cleaned.components().all(|c| c.as_os_str() != "."));
    }

    // dest path builders: should never panic
    let dst = Path::new("/tmp/fuzz_dst");
    let _ = treecp::util::is_dir_style(p);
    let _ = treecp::util::dir_dest_path(p, dst, false);
    let _ = treecp::util::dir_dest_path(p, dst, true);
    let _ = treecp::util::file_dest_path(p, dst, false);
    let _ = treecp::util::file_dest_path(dst, p, true);

    if data.len() > 2 {
        let split = data.len() / 2;
        let a = Path::new(OsStr::from_bytes(&data[..split]));
        let b = Path::new(OsStr::from_bytes(&data[split..]));
        let _ = treecp::util::file_dest_path(a, b, false);
    }
});
