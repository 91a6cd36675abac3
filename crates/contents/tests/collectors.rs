#![cfg(unix)]

use contents::{FileSelection, MAX_SMALL_FILE_BYTES, collect_small_files, collect_sysctl};
use logging::{CapturingLogger, Severity};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn patterns_select_regular_files_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(root.join("init.rc"), b"on boot").expect("init.rc");
    fs::write(root.join("init.usb.rc"), b"on usb").expect("init.usb.rc");
    fs::write(root.join("ueventd.rc"), b"/dev/null 0666").expect("ueventd.rc");
    fs::create_dir(root.join("init.d.rc")).expect("dir named like a match");
    symlink(root.join("init.rc"), root.join("init.link.rc")).expect("symlink");

    let selection = FileSelection::new()
        .pattern(root, "init*.rc")
        .expect("pattern");
    let files = collect_small_files(&selection, MAX_SMALL_FILE_BYTES, &CapturingLogger::new());

    let keys: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [key(&root.join("init.rc")), key(&root.join("init.usb.rc"))]
    );
}

#[test]
fn deep_patterns_honour_exclusions() {
    let temp = tempfile::tempdir().expect("tempdir");
    let selinux = temp.path().join("selinux");
    fs::create_dir_all(selinux.join("class/file/perms")).expect("class tree");
    fs::create_dir_all(selinux.join("booleans")).expect("booleans");
    fs::write(selinux.join("enforce"), b"1").expect("enforce");
    fs::write(selinux.join("booleans/debug"), b"0 0").expect("boolean");
    fs::write(selinux.join("class/file/index"), b"6").expect("class index");

    let selection = FileSelection::new()
        .pattern_excluding(&selinux, "**", "class/**")
        .expect("pattern");
    let files = collect_small_files(&selection, MAX_SMALL_FILE_BYTES, &CapturingLogger::new());

    assert!(files.contains_key(&key(&selinux.join("enforce"))));
    assert!(files.contains_key(&key(&selinux.join("booleans/debug"))));
    assert!(!files.keys().any(|path| path.contains("/class/")));
}

#[test]
fn nested_version_files_are_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let modules = temp.path().join("module");
    fs::create_dir_all(modules.join("wlan")).expect("wlan");
    fs::create_dir_all(modules.join("usbcore/parameters")).expect("usbcore");
    fs::write(modules.join("wlan/version"), b"5.2.1\n").expect("version");
    fs::write(modules.join("usbcore/parameters/autosuspend"), b"2").expect("param");

    let selection = FileSelection::new()
        .pattern(&modules, "**/version")
        .expect("pattern");
    let files = collect_small_files(&selection, MAX_SMALL_FILE_BYTES, &CapturingLogger::new());

    assert_eq!(files.len(), 1);
    assert_eq!(files[&key(&modules.join("wlan/version"))], "NS4yLjEK");
}

#[test]
fn per_process_files_cover_numeric_entries_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let proc_root = temp.path();
    for pid in ["1", "42"] {
        fs::create_dir_all(proc_root.join(pid).join("attr")).expect("pid dir");
        fs::write(proc_root.join(pid).join("cmdline"), b"init\0").expect("cmdline");
    }
    fs::create_dir(proc_root.join("self")).expect("self");
    fs::write(proc_root.join("self/cmdline"), b"census\0").expect("self cmdline");

    let selection = FileSelection::new().per_process(proc_root, ["cmdline", "attr/current"]);
    let expanded = selection.expand(&CapturingLogger::new());
    assert_eq!(
        expanded,
        vec![
            proc_root.join("1/cmdline"),
            proc_root.join("1/attr/current"),
            proc_root.join("42/cmdline"),
            proc_root.join("42/attr/current"),
        ]
    );

    let files = collect_small_files(&selection, MAX_SMALL_FILE_BYTES, &CapturingLogger::new());
    assert_eq!(files.len(), 2);
    assert_eq!(files[&key(&proc_root.join("42/cmdline"))], "aW5pdAA=");
}

#[test]
fn missing_pattern_base_contributes_nothing() {
    let selection = FileSelection::new()
        .pattern("/nonexistent/census/etc/permissions", "*.xml")
        .expect("pattern");
    assert!(selection.expand(&CapturingLogger::new()).is_empty());
}

#[test]
fn sysctl_tree_is_keyed_by_dotted_name() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("kernel")).expect("kernel");
    fs::create_dir_all(root.join("net/ipv4")).expect("net");
    fs::write(root.join("kernel/hostname"), b"localhost\n").expect("hostname");
    fs::write(root.join("kernel/printk"), b"4\t4\t1\t7\n").expect("printk");
    fs::write(root.join("net/ipv4/ip_forward"), b"0\n\n").expect("ip_forward");

    let logger = CapturingLogger::new();
    let parameters = collect_sysctl(root, &logger).expect("sysctl");

    assert_eq!(parameters.len(), 3);
    assert_eq!(parameters["kernel.hostname"], "localhost");
    assert_eq!(parameters["kernel.printk"], "4\t4\t1\t7");
    assert_eq!(parameters["net.ipv4.ip_forward"], "0\n");
    assert_eq!(logger.count(Severity::Warning), 0);
}

#[test]
fn missing_sysctl_root_is_an_error() {
    let error = collect_sysctl(Path::new("/nonexistent/census/sys"), &CapturingLogger::new())
        .expect_err("missing root");
    assert!(matches!(error, contents::ContentsError::Walk(_)));
}
