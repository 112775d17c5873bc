use crate::errors::VcrError;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), VcrError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VcrError::Io(e.to_string()))?;
        }
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| VcrError::Io(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| VcrError::Io(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| VcrError::Io(e.to_string()))?;
        file.write_all(b"\n")
            .map_err(|e| VcrError::Io(e.to_string()))
    }
}

/// Where debug diagnostics go.
#[derive(Debug, Clone, Default)]
pub enum DiagnosticSink {
    #[default]
    Stderr,
    Jsonl(JsonlLogger),
}

impl DiagnosticSink {
    /// Diagnostics never fail a call; a sink that cannot be written is skipped.
    pub fn emit(&self, event: &LogEvent<'_>) {
        match self {
            Self::Stderr => eprintln!("{}", render_line(event)),
            Self::Jsonl(logger) => {
                let _ = logger.append(event);
            }
        }
    }

    pub fn fixture_overwrite(&self, path: &Path, existing: &[u8], replacement: &[u8]) {
        self.emit(&LogEvent {
            level: "warn",
            event_type: "fixture_overwrite",
            payload: json!({
                "path": path.display().to_string(),
                "existing": String::from_utf8_lossy(existing),
                "new": String::from_utf8_lossy(replacement),
            }),
        });
    }
}

/// Human-readable form used on stderr.
pub fn render_line(event: &LogEvent<'_>) -> String {
    let mut line = format!("{}: {}", event.level, event.event_type);
    if let Value::Object(fields) = &event.payload {
        for (key, value) in fields {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            if rendered.contains('\n') {
                line.push_str(&format!("\n{key}:\n{rendered}"));
            } else {
                line.push_str(&format!(" {key}={rendered}"));
            }
        }
    }
    line
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut cut = max_bytes.saturating_sub(3);
    while !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    Value::String(format!("{}...", &rendered[..cut]))
}
