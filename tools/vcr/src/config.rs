use crate::errors::VcrError;
use crate::logging::{DiagnosticSink, JsonlLogger, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::transport::ReqwestTransport;
use crate::types::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type EnvMap = BTreeMap<String, String>;

pub const ENV_MODE: &str = "VCR_MODE";
pub const ENV_DIR: &str = "VCR_DIR";
pub const ENV_DEBUG: &str = "VCR_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VcrConfig {
    pub mode: Mode,
    pub fixtures: FixturesConfig,
    pub diagnostics: DiagnosticsConfig,
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixturesConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub debug: bool,
    /// JSONL file for diagnostics; stderr when unset.
    pub log_path: Option<PathBuf>,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for VcrConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Replay,
            fixtures: FixturesConfig {
                dir: PathBuf::from("testdata"),
            },
            diagnostics: DiagnosticsConfig {
                debug: false,
                log_path: None,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            },
            transport: TransportConfig {
                timeout_seconds: None,
                user_agent: None,
            },
        }
    }
}

impl VcrConfig {
    pub fn diagnostic_sink(&self) -> DiagnosticSink {
        match &self.diagnostics.log_path {
            Some(path) => {
                let mut logger = JsonlLogger::new(path);
                logger.max_payload_bytes = self.diagnostics.max_payload_bytes;
                DiagnosticSink::Jsonl(logger)
            }
            None => DiagnosticSink::Stderr,
        }
    }

    pub fn build_transport(&self) -> Result<ReqwestTransport, VcrError> {
        ReqwestTransport::with_options(
            self.transport.timeout_seconds.map(Duration::from_secs),
            self.transport.user_agent.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialVcrConfig {
    mode: Option<String>,
    fixtures: Option<PartialFixturesConfig>,
    diagnostics: Option<PartialDiagnosticsConfig>,
    transport: Option<PartialTransportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialFixturesConfig {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialDiagnosticsConfig {
    debug: Option<bool>,
    log_path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialTransportConfig {
    timeout_seconds: Option<u64>,
    user_agent: Option<String>,
}

/// Defaults, then the TOML file at `config_path`, then `VCR_*` variables.
pub fn load_config(config_path: Option<&Path>, env: &EnvMap) -> Result<VcrConfig, VcrError> {
    let mut cfg = VcrConfig::default();

    if let Some(path) = config_path {
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| VcrError::Io(format!("{}: {e}", path.display())))?;
        let partial: PartialVcrConfig = toml::from_str(&file_contents)
            .map_err(|e| VcrError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial)?;
    }

    apply_env_overrides(&mut cfg, env)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn env_from_process() -> EnvMap {
    std::env::vars().collect()
}

fn merge_partial_config(cfg: &mut VcrConfig, partial: PartialVcrConfig) -> Result<(), VcrError> {
    if let Some(mode) = partial.mode {
        cfg.mode = mode.parse()?;
    }

    if let Some(fixtures) = partial.fixtures {
        if let Some(dir) = fixtures.dir {
            cfg.fixtures.dir = dir;
        }
    }

    if let Some(diagnostics) = partial.diagnostics {
        if let Some(debug) = diagnostics.debug {
            cfg.diagnostics.debug = debug;
        }
        if let Some(log_path) = diagnostics.log_path {
            cfg.diagnostics.log_path = Some(log_path);
        }
        if let Some(value) = diagnostics.max_payload_bytes {
            cfg.diagnostics.max_payload_bytes = value;
        }
    }

    if let Some(transport) = partial.transport {
        if let Some(value) = transport.timeout_seconds {
            cfg.transport.timeout_seconds = Some(value);
        }
        if let Some(value) = transport.user_agent {
            cfg.transport.user_agent = Some(value);
        }
    }
    Ok(())
}

fn apply_env_overrides(cfg: &mut VcrConfig, env: &EnvMap) -> Result<(), VcrError> {
    if let Some(mode) = env.get(ENV_MODE) {
        cfg.mode = mode.parse()?;
    }
    if let Some(dir) = env.get(ENV_DIR) {
        cfg.fixtures.dir = PathBuf::from(dir);
    }
    if let Some(debug) = env.get(ENV_DEBUG) {
        cfg.diagnostics.debug = parse_flag(ENV_DEBUG, debug)?;
    }
    Ok(())
}

fn parse_flag(name: &str, value: &str) -> Result<bool, VcrError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(VcrError::InvalidConfig(format!(
            "{name} must be a boolean flag, got {other:?}"
        ))),
    }
}

fn validate_config(cfg: &VcrConfig) -> Result<(), VcrError> {
    if cfg.fixtures.dir.as_os_str().is_empty() {
        return Err(VcrError::InvalidConfig(
            "fixtures.dir must not be empty".to_string(),
        ));
    }

    if cfg.diagnostics.max_payload_bytes == 0 {
        return Err(VcrError::InvalidConfig(
            "diagnostics.max_payload_bytes must be greater than zero".to_string(),
        ));
    }

    if cfg.transport.timeout_seconds == Some(0) {
        return Err(VcrError::InvalidConfig(
            "transport.timeout_seconds must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config, EnvMap, VcrConfig, ENV_DEBUG, ENV_DIR, ENV_MODE};
    use crate::errors::VcrError;
    use crate::logging::DiagnosticSink;
    use crate::types::Mode;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_replay_from_testdata() {
        let cfg = load_config(None, &EnvMap::new()).expect("defaults");
        assert_eq!(cfg, VcrConfig::default());
        assert_eq!(cfg.mode, Mode::Replay);
        assert_eq!(cfg.fixtures.dir, PathBuf::from("testdata"));
        assert!(matches!(cfg.diagnostic_sink(), DiagnosticSink::Stderr));
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vcr.toml");
        std::fs::write(
            &path,
            "mode = \"record\"\n[fixtures]\ndir = \"fixtures/http\"\n[diagnostics]\nlog_path = \"vcr.jsonl\"\n[transport]\ntimeout_seconds = 5\n",
        )
        .expect("write config");

        let cfg = load_config(Some(&path), &EnvMap::new()).expect("load");
        assert_eq!(cfg.mode, Mode::Record);
        assert_eq!(cfg.fixtures.dir, PathBuf::from("fixtures/http"));
        assert!(!cfg.diagnostics.debug);
        assert_eq!(cfg.transport.timeout_seconds, Some(5));
        assert!(cfg.transport.user_agent.is_none());
        assert!(matches!(cfg.diagnostic_sink(), DiagnosticSink::Jsonl(_)));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vcr.toml");
        std::fs::write(&path, "mode = \"record\"\n").expect("write config");

        let cfg = load_config(
            Some(&path),
            &env(&[(ENV_MODE, "live"), (ENV_DIR, "other"), (ENV_DEBUG, "1")]),
        )
        .expect("load");
        assert_eq!(cfg.mode, Mode::Live);
        assert_eq!(cfg.fixtures.dir, PathBuf::from("other"));
        assert!(cfg.diagnostics.debug);
    }

    #[test]
    fn unknown_env_mode_is_invalid_mode() {
        let err = load_config(None, &env(&[(ENV_MODE, "fast-forward")])).expect_err("bad mode");
        assert!(matches!(err, VcrError::InvalidMode(_)));
    }

    #[test]
    fn unknown_file_mode_is_invalid_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vcr.toml");
        std::fs::write(&path, "mode = \"rewind\"\n").expect("write config");
        let err = load_config(Some(&path), &EnvMap::new()).expect_err("bad mode");
        assert!(matches!(err, VcrError::InvalidMode(ref name) if name == "rewind"));
    }

    #[test]
    fn file_mode_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vcr.toml");
        std::fs::write(&path, "mode = \"Record\"\n").expect("write config");
        let cfg = load_config(Some(&path), &EnvMap::new()).expect("config");
        assert_eq!(cfg.mode, Mode::Record);

        std::fs::write(&path, "mode = \"PLAY\"\n").expect("write config");
        let cfg = load_config(Some(&path), &EnvMap::new()).expect("config");
        assert_eq!(cfg.mode, Mode::Replay);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = load_config(None, &env(&[(ENV_DEBUG, "maybe")])).expect_err("bad flag");
        assert!(matches!(err, VcrError::InvalidConfig(_)));

        let err = load_config(None, &env(&[(ENV_DIR, "")])).expect_err("empty dir");
        assert!(matches!(err, VcrError::InvalidConfig(_)));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vcr.toml");
        std::fs::write(&path, "[transport]\ntimeout_seconds = 0\n").expect("write config");
        let err = load_config(Some(&path), &EnvMap::new()).expect_err("zero timeout");
        assert!(matches!(err, VcrError::InvalidConfig(_)));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("absent.toml")), &EnvMap::new())
            .expect_err("missing file");
        assert!(matches!(err, VcrError::Io(_)));
    }
}
