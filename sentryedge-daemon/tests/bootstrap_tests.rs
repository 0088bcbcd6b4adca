//! Startup tests -- configuration resolution and app assembly.

use std::io::Write;

use serial_test::serial;

use sentryedge_daemon::bootstrap::{build_app, resolve_config};
use sentryedge_daemon::cli::DaemonCli;

fn cli(config: &std::path::Path) -> DaemonCli {
    DaemonCli {
        config: config.to_path_buf(),
        log_level: None,
        log_format: None,
        bind: None,
        validate: false,
    }
}

#[tokio::test]
#[serial]
async fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = resolve_config(&cli(&dir.path().join("absent.toml")))
        .await
        .unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:8787");
    assert_eq!(config.normalizer.max_unwrap_depth, 5);
}

#[tokio::test]
#[serial]
async fn cli_flags_override_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[general]\nlog_level = \"warn\"\n\n[server]\nbind = \"127.0.0.1:9000\""
    )
    .unwrap();

    let mut args = cli(file.path());
    args.log_level = Some("debug".to_owned());
    args.bind = Some("127.0.0.1:9999".to_owned());

    let config = resolve_config(&args).await.unwrap();
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.server.bind, "127.0.0.1:9999");
}

#[tokio::test]
#[serial]
async fn invalid_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[normalizer]\nmax_unwrap_depth = 0").unwrap();
    assert!(resolve_config(&cli(file.path())).await.is_err());
}

#[tokio::test]
#[serial]
async fn build_app_with_jsonl_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[storage]\nbackend = \"jsonl\"\npath = \"{}\"",
        dir.path().join("logs.jsonl").display()
    )
    .unwrap();

    let config = resolve_config(&cli(file.path())).await.unwrap();
    assert!(build_app(&config).await.is_ok());
    assert!(dir.path().join("logs.jsonl").exists());
}
