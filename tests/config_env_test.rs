use dujour::Settings;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Kept as a single test: environment variables are process-wide.
#[test]
fn test_env_overrides_file_and_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dujour.toml");
    fs::write(
        &config_path,
        r#"
data_folder = "from-file"

[server]
bind = "127.0.0.1:7000"
https = true
"#,
    )
    .unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("DUJOUR_SERVER__BIND", "0.0.0.0:9999");
        env::set_var("DUJOUR_FILE_WATCH__ENABLED", "false");
        env::set_var("DUJOUR_LOGGING__DEFAULT", "debug");
    }

    let settings = Settings::load_from(&config_path).unwrap();

    unsafe {
        env::remove_var("DUJOUR_SERVER__BIND");
        env::remove_var("DUJOUR_FILE_WATCH__ENABLED");
        env::remove_var("DUJOUR_LOGGING__DEFAULT");
    }

    assert_eq!(settings.server.bind, "0.0.0.0:9999", "env beats file");
    assert!(settings.server.https, "file value survives");
    assert_eq!(settings.data_folder, PathBuf::from("from-file"));
    assert!(!settings.file_watch.enabled);
    assert_eq!(settings.logging.default, "debug");
    assert_eq!(settings.server.cert_folder, PathBuf::from("certs"));
}
