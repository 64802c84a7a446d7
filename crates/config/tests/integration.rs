//! Integration tests for config loading

use h5pack_config::{calculate_build_jobs, Config, DEFAULT_URL_TEMPLATE};
use std::io::Write;

#[tokio::test]
async fn defaults_when_no_file() {
    let config = Config::default();
    assert_eq!(config.source.url_template, DEFAULT_URL_TEMPLATE);
    assert_eq!(config.network.retries, 3);
    assert_eq!(config.build.jobs, 0);
    assert_eq!(config.work_path().to_str(), Some("build"));
    assert_eq!(config.package_path().to_str(), Some("package"));
}

#[tokio::test]
async fn load_partial_file_fills_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[build]
jobs = 4

[source]
url_template = "https://mirror.example/hdf5-{{version}}.tar.gz"
"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).await.unwrap();
    assert_eq!(config.build.jobs, 4);
    assert_eq!(
        config.source.url_template,
        "https://mirror.example/hdf5-{version}.tar.gz"
    );
    // untouched sections keep defaults
    assert_eq!(config.network.timeout, 300);
}

#[tokio::test]
async fn load_rejects_bad_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not [valid toml").unwrap();
    assert!(Config::load_from_file(file.path()).await.is_err());
}

#[test]
fn source_url_expands_series_and_version() {
    let config = Config::default();
    let url = config.source_url("1.12.2");
    assert_eq!(
        url,
        "https://support.hdfgroup.org/ftp/HDF5/releases/hdf5-1.12/hdf5-1.12.2/src/hdf5-1.12.2.tar.gz"
    );
}

#[test]
fn build_jobs_user_override_wins() {
    assert_eq!(calculate_build_jobs(6), 6);
    assert!(calculate_build_jobs(0) >= 1);
}
