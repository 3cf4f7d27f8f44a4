use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

use crate::config::builder::ConfigBuilder;
use crate::config::environment::{env_bool, env_string, env_u32, env_u64};
use crate::config::{
    Config, ContentEncoding, DEFAULT_ADDONS_ROOT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    NoChangePolicy, SchemaMode,
};
use crate::error::{ErrorKind, ForgeError};

pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new(vars: &[(&str, Option<&str>)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect::<Vec<_>>();
        for (key, value) in vars {
            match value {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

const FORGE_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "FORGE_BASE_URL",
    "FORGE_MODEL",
    "FORGE_TIMEOUT_SECS",
    "FORGE_MAX_OUTPUT_TOKENS",
    "FORGE_SCHEMA_MODE",
    "FORGE_ENCODING",
    "FORGE_ADDONS_ROOT",
    "FORGE_TRACE_DIR",
    "FORGE_PUBLISH",
    "FORGE_ON_NO_CHANGE",
];

fn clean_env<'a>(home: &'a str, set: &[(&'a str, &'a str)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut vars: Vec<(&str, Option<&str>)> = vec![("HOME", Some(home))];
    for key in FORGE_VARS {
        let value = set.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
        vars.push((*key, value));
    }
    vars
}

fn forge_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<ForgeError>().map(ForgeError::kind)
}

#[test]
fn load_from_env_only() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(&clean_env(
        &home,
        &[
            ("OPENAI_API_KEY", " env-key \n"),
            ("FORGE_TIMEOUT_SECS", "90"),
            ("FORGE_MAX_OUTPUT_TOKENS", "4096"),
            ("FORGE_SCHEMA_MODE", "best-effort"),
            ("FORGE_ENCODING", "plain"),
            ("FORGE_PUBLISH", "yes"),
        ],
    ));

    let config = Config::load(None).unwrap();
    assert_eq!(config.service.api_key, "env-key");
    assert_eq!(config.service.timeout_secs, 90);
    assert_eq!(config.service.max_output_tokens, 4096);
    assert_eq!(config.service.model, DEFAULT_MODEL);
    assert_eq!(config.output.schema_mode, SchemaMode::BestEffort);
    assert_eq!(config.output.encoding, ContentEncoding::Plain);
    assert!(config.publish.enabled);
}

#[test]
fn defaults_match_the_ci_generator() {
    let config = Config::builder().build().unwrap();
    assert_eq!(config.service.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.output.addons_root, DEFAULT_ADDONS_ROOT);
    assert_eq!(config.output.schema_mode, SchemaMode::Strict);
    assert_eq!(config.output.encoding, ContentEncoding::Base64);
    assert_eq!(config.publish.on_no_change, NoChangePolicy::Fail);
    assert!(!config.publish.enabled);
}

#[test]
fn load_prefers_env_over_user_file() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    let config_dir = temp_home.path().join(".issue-forge");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config"),
        r#"{
            "service": { "model": "file-model", "timeout_secs": 20 },
            "output": { "addons_root": "addons", "trace_dir": "specs" },
            "publish": { "on_no_change": "succeed" }
        }"#,
    )
    .unwrap();

    let _env = EnvGuard::new(&clean_env(
        &home,
        &[("OPENAI_API_KEY", "env-key"), ("FORGE_TIMEOUT_SECS", "40")],
    ));

    let config = Config::load(None).unwrap();
    assert_eq!(config.service.model, "file-model");
    assert_eq!(config.service.timeout_secs, 40);
    assert_eq!(config.output.addons_root, "addons");
    assert_eq!(config.output.trace_dir, "specs");
    assert_eq!(config.publish.on_no_change, NoChangePolicy::Succeed);
}

#[test]
fn explicit_file_replaces_rules() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    let path = temp_home.path().join("forge.json");
    std::fs::write(
        &path,
        r#"{
            "rules": {
                "target": "an Odoo 18 point-of-sale extension",
                "files": ["__manifest__.py", "static/src/js/main.js"],
                "constraints": ["Keep the JavaScript dependency-free."]
            }
        }"#,
    )
    .unwrap();

    let _env = EnvGuard::new(&clean_env(&home, &[("OPENAI_API_KEY", "k")]));

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.rules.target, "an Odoo 18 point-of-sale extension");
    assert_eq!(config.rules.files.len(), 2);
    assert_eq!(config.rules.constraints, vec!["Keep the JavaScript dependency-free."]);
}

#[test]
fn load_errors_without_api_key() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();

    let _env = EnvGuard::new(&clean_env(&home, &[("OPENAI_API_KEY", "   ")]));

    let err = Config::load(None).unwrap_err();
    assert_eq!(forge_kind(&err), Some(ErrorKind::Configuration));
    assert!(err.to_string().contains("OPENAI_API_KEY is missing"));
}

#[test]
fn missing_explicit_file_is_a_configuration_error() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    let _env = EnvGuard::new(&clean_env(&home, &[("OPENAI_API_KEY", "k")]));

    let err = Config::load(Some(&temp_home.path().join("absent.json"))).unwrap_err();
    assert_eq!(forge_kind(&err), Some(ErrorKind::Configuration));
}

#[test]
fn unknown_schema_mode_is_rejected() {
    let _lock = env_lock();
    let temp_home = TempDir::new().unwrap();
    let home = temp_home.path().to_str().unwrap().to_string();
    let _env = EnvGuard::new(&clean_env(
        &home,
        &[("OPENAI_API_KEY", "k"), ("FORGE_SCHEMA_MODE", "loose")],
    ));

    let err = Config::load(None).unwrap_err();
    assert_eq!(forge_kind(&err), Some(ErrorKind::Configuration));
    assert!(err.to_string().contains("unknown schema mode"));
}

#[test]
fn validation_rejects_escaping_roots() {
    let config = ConfigBuilder::new()
        .with_service(|service| service.api_key = "k".into())
        .with_output(|output| output.addons_root = "../outside".into())
        .build()
        .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("plain relative path"));

    let config = ConfigBuilder::new()
        .with_service(|service| service.api_key = "k".into())
        .with_output(|output| output.trace_dir = "/tmp/specs".into())
        .build()
        .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_env_string() {
    let _lock = env_lock();
    let _env = EnvGuard::new(&[("FORGE_TEST_VAR", Some("test_value"))]);

    assert_eq!(
        env_string("FORGE_TEST_VAR").unwrap(),
        Some("test_value".to_string())
    );
    assert_eq!(env_string("FORGE_NONEXISTENT_VAR").unwrap(), None);
}

#[test]
fn test_env_numbers() {
    let _lock = env_lock();
    let _env = EnvGuard::new(&[
        ("FORGE_TEST_U64", Some("123")),
        ("FORGE_TEST_U32", Some("456")),
        ("FORGE_TEST_BAD", Some("12x")),
    ]);

    assert_eq!(env_u64("FORGE_TEST_U64").unwrap(), Some(123));
    assert_eq!(env_u32("FORGE_TEST_U32").unwrap(), Some(456));
    assert_eq!(env_u32("FORGE_NONEXISTENT_VAR").unwrap(), None);
    assert_eq!(
        env_u64("FORGE_TEST_BAD").unwrap_err().kind(),
        ErrorKind::Configuration
    );
}

#[test]
fn test_env_bool() {
    let _lock = env_lock();
    let _env = EnvGuard::new(&[
        ("FORGE_TEST_ON", Some("TRUE")),
        ("FORGE_TEST_OFF", Some("0")),
        ("FORGE_TEST_MAYBE", Some("maybe")),
    ]);

    assert_eq!(env_bool("FORGE_TEST_ON").unwrap(), Some(true));
    assert_eq!(env_bool("FORGE_TEST_OFF").unwrap(), Some(false));
    assert!(env_bool("FORGE_TEST_MAYBE").is_err());
}
