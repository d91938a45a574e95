use art_detail::config::Configuration;
use art_detail::geometry::Size;
use std::io::Write;
use std::time::Duration;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
loading:
  fake-loading-timeout: 5s
  spinner-show-delay: 250ms
read-orientation: false
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.loading.fake_loading_timeout, Duration::from_secs(5));
    assert_eq!(cfg.loading.spinner_show_delay, Duration::from_millis(250));
    assert_eq!(cfg.loading.spinner_fade_in, Duration::from_millis(300));
    assert_eq!(cfg.loading.spinner_fade_out, Duration::from_secs(1));
    assert!(!cfg.read_orientation);
    assert_eq!(cfg.surface_size, Size::new(1080.0, 1920.0));
}

#[test]
fn empty_document_uses_defaults() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    let cfg = cfg.validated().unwrap();
    assert_eq!(cfg.loading.fake_loading_timeout, Duration::from_secs(10));
    assert!(cfg.read_orientation);
}

#[test]
fn parse_surface_size() {
    let yaml = r#"
surface-size:
  width: 800
  height: 480
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.surface_size, Size::new(800.0, 480.0));
}

#[test]
fn unknown_keys_are_rejected() {
    let yaml = r#"
loading:
  spinner-delay: 1s
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());

    let yaml = r#"
photo-library-path: "/photos"
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn zero_show_delay_is_allowed() {
    let yaml = r#"
loading:
  spinner-show-delay: 0s
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_ok());
}

#[test]
fn zero_fade_out_is_rejected() {
    let yaml = r#"
loading:
  spinner-fade-out: 0ms
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(format!("{err:#}").contains("spinner-fade-out"));
}

#[test]
fn negative_surface_is_rejected() {
    let yaml = r#"
surface-size:
  width: -1
  height: 100
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "loading:\n  spinner-fade-in: 150ms").unwrap();
    let cfg = Configuration::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.loading.spinner_fade_in, Duration::from_millis(150));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = Configuration::from_yaml_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}
