use crate::errors::VcrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating mode of a [`crate::engine::Vcr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Answer every call from fixtures, never touching the network.
    #[default]
    #[serde(alias = "play")]
    Replay,
    /// Execute calls live and persist each response as a fixture.
    Record,
    /// Execute calls live with no persistence.
    Live,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replay => "replay",
            Self::Record => "record",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = VcrError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replay" | "play" => Ok(Self::Replay),
            "record" => Ok(Self::Record),
            "live" => Ok(Self::Live),
            _ => Err(VcrError::InvalidMode(value.to_string())),
        }
    }
}

/// Shape of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    DirectRequest,
    SimpleGet,
    FormPost,
}

impl CallKind {
    /// Prefix used in fixture file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectRequest => "do",
            Self::SimpleGet => "get",
            Self::FormPost => "postform",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::DirectRequest => "direct-request",
            Self::SimpleGet => "simple-get",
            Self::FormPost => "form-post",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallKind, Mode};
    use crate::errors::VcrError;

    #[test]
    fn mode_parses_known_names_case_insensitively() {
        assert_eq!("replay".parse::<Mode>().ok(), Some(Mode::Replay));
        assert_eq!("Play".parse::<Mode>().ok(), Some(Mode::Replay));
        assert_eq!(" RECORD ".parse::<Mode>().ok(), Some(Mode::Record));
        assert_eq!("live".parse::<Mode>().ok(), Some(Mode::Live));
    }

    #[test]
    fn unknown_mode_is_invalid_mode_error() {
        let err = "rewind".parse::<Mode>().expect_err("unknown mode");
        assert!(matches!(err, VcrError::InvalidMode(ref name) if name == "rewind"));
    }

    #[test]
    fn call_kind_strings_match_contract() {
        assert_eq!(CallKind::DirectRequest.as_str(), "do");
        assert_eq!(CallKind::SimpleGet.as_str(), "get");
        assert_eq!(CallKind::FormPost.as_str(), "postform");
        assert_eq!(CallKind::DirectRequest.tag(), "direct-request");
        assert_eq!(CallKind::SimpleGet.tag(), "simple-get");
        assert_eq!(CallKind::FormPost.tag(), "form-post");
    }

    #[test]
    fn mode_deserializes_from_toml_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            mode: Mode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"play\"").expect("parse");
        assert_eq!(parsed.mode, Mode::Replay);
        let parsed: Wrapper = toml::from_str("mode = \"record\"").expect("parse");
        assert_eq!(parsed.mode, Mode::Record);
    }
}
