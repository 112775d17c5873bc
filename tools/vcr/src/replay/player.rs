//! Fixture playback.

use crate::codec::decode_response;
use crate::errors::VcrError;
use crate::message::HttpResponse;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load the fixture at `path`. No network access, no retries.
pub fn play(path: &Path) -> Result<HttpResponse, VcrError> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => VcrError::NotFound(path.to_path_buf()),
        _ => VcrError::Io(format!("{}: {e}", path.display())),
    })?;
    decode_response(&data)
}
