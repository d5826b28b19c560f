//! Rootfs extraction tests.
//!
//! Well-formed archives are built with the host `tar`. Failure paths use a
//! fake `tar` script so exit codes and timing are exact.

mod helpers;

use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use helpers::{assert_file_exists, TestEnv};
use openclawd_bootstrap::extract::ExtractOptions;
use openclawd_bootstrap::{BootstrapError, BootstrapManager, CancelToken};

fn with_tar(env: &TestEnv, body: &str, timeout: Duration) -> BootstrapManager {
    env.manager().with_extract_options(ExtractOptions {
        tar_program: env.script("tar", body),
        timeout,
    })
}

#[test]
fn test_extract_creates_bash_and_deletes_archive() {
    let env = TestEnv::new();
    let archive = env.ubuntu_archive();

    env.manager()
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap();

    assert_file_exists(&env.paths.bin_bash());
    assert_eq!(
        fs::read_to_string(env.paths.rootfs_dir().join("etc/os-release")).unwrap(),
        "NAME=\"Ubuntu\"\n"
    );
    assert!(!archive.exists(), "archive should be consumed");
    assert!(!env.paths.staging_dir().exists());
}

#[test]
fn test_extract_merges_into_existing_rootfs() {
    let env = TestEnv::new();
    let manager = env.manager();
    manager.setup_directories().unwrap();
    fs::create_dir_all(env.paths.rootfs_dir().join("opt/data")).unwrap();
    fs::create_dir_all(env.paths.rootfs_dir().join("etc")).unwrap();
    fs::write(env.paths.rootfs_dir().join("etc/old"), "stale").unwrap();

    manager
        .extract_rootfs(&env.ubuntu_archive(), &CancelToken::new())
        .unwrap();

    assert!(env.paths.rootfs_dir().join("opt/data").is_dir());
    assert_eq!(
        fs::read_to_string(env.paths.rootfs_dir().join("etc/old")).unwrap(),
        "stale"
    );
    assert_file_exists(&env.paths.rootfs_dir().join("etc/os-release"));
}

#[test]
fn test_reextract_keeps_user_tools_and_shim() {
    let env = TestEnv::new();
    let manager = env.manager();
    manager.setup_directories().unwrap();
    let node = env.paths.rootfs_dir().join("usr/local/bin/node");
    fs::create_dir_all(node.parent().unwrap()).unwrap();
    fs::write(&node, "#!/bin/sh\necho v22.11.0\n").unwrap();
    manager.install_bionic_bypass().unwrap();

    let archive = env.archive(
        "refresh",
        &[
            ("usr/bin/env", "#!/bin/sh\n"),
            ("root/.profile", "# ~/.profile\n"),
            ("bin/bash", "#!/bin/sh\n"),
        ],
    );
    manager
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap();

    assert_file_exists(&node);
    assert_file_exists(&env.paths.bypass_file());
    assert_file_exists(&env.paths.rootfs_dir().join("usr/bin/env"));
    assert_file_exists(&env.paths.rootfs_dir().join("root/.profile"));
    assert!(manager.is_bootstrap_complete());
}

#[test]
fn test_nonzero_exit_reports_exact_code_and_keeps_archive() {
    let env = TestEnv::new();
    let archive = env.ubuntu_archive();
    let manager = with_tar(
        &env,
        "echo 'tar: unexpected EOF' >&2; exit 7",
        Duration::from_secs(10),
    );

    let err = manager
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap_err();

    match err {
        BootstrapError::Extraction(failure) => {
            assert_eq!(failure.exit_code, 7);
            assert!(failure.output.contains("unexpected EOF"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(archive.exists(), "archive must survive a failed extraction");
    assert!(!env.paths.staging_dir().exists());
}

#[test]
fn test_corrupt_archive_leaves_rootfs_untouched() {
    let env = TestEnv::new();
    let manager = env.manager();
    manager.setup_directories().unwrap();
    fs::create_dir_all(env.paths.rootfs_dir().join("etc")).unwrap();
    fs::write(env.paths.rootfs_dir().join("etc/hostname"), "phone").unwrap();

    let archive = env.scratch.join("corrupt.tar.gz");
    fs::write(&archive, b"definitely not gzip").unwrap();

    let err = manager
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap_err();

    let code = err.extraction_exit_code().expect("extraction failure");
    assert_ne!(code, 0);
    assert!(archive.exists());
    assert_eq!(
        fs::read_to_string(env.paths.rootfs_dir().join("etc/hostname")).unwrap(),
        "phone"
    );
}

#[test]
fn test_timeout_kills_extraction() {
    let env = TestEnv::new();
    let archive = env.ubuntu_archive();
    let manager = with_tar(&env, "exec sleep 10", Duration::from_millis(200));

    let started = Instant::now();
    let err = manager
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(archive.exists());
    assert!(!env.paths.staging_dir().exists());
}

#[test]
fn test_cancel_stops_extraction() {
    let env = TestEnv::new();
    let archive = env.ubuntu_archive();
    let manager = with_tar(&env, "exec sleep 10", Duration::from_secs(60));
    let token = CancelToken::new();

    let trigger = token.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        trigger.cancel();
    });

    let err = manager.extract_rootfs(&archive, &token).unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, BootstrapError::Cancelled { .. }));
    assert!(archive.exists());
}

#[test]
fn test_missing_tar_is_spawn_error() {
    let env = TestEnv::new();
    let archive = env.ubuntu_archive();
    let manager = env.manager().with_extract_options(ExtractOptions {
        tar_program: "nonexistent_program_12345".to_string(),
        timeout: Duration::from_secs(10),
    });

    let err = manager
        .extract_rootfs(&archive, &CancelToken::new())
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Spawn { .. }));
    assert!(archive.exists());
}
