//! Live call + persist.

use crate::codec::encode_response;
use crate::errors::VcrError;
use crate::logging::DiagnosticSink;
use crate::message::HttpResponse;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct Recorder<'a> {
    pub debug: bool,
    pub diagnostics: &'a DiagnosticSink,
}

impl Recorder<'_> {
    /// Run `live`, write the serialized response to `path`, and hand back the
    /// live response.
    ///
    /// A transport failure is returned unchanged and nothing is written. The
    /// transport reports either a response or an error, never both, so a
    /// serialization or write error can only surface after a clean live call.
    pub fn record(
        &self,
        path: &Path,
        live: impl FnOnce() -> Result<HttpResponse, VcrError>,
    ) -> Result<HttpResponse, VcrError> {
        let mut response = live()?;
        let encoded = encode_response(&mut response)?;
        if self.debug {
            self.warn_on_overwrite(path, &encoded)?;
        }
        write_fixture(path, &encoded)?;
        Ok(response)
    }

    fn warn_on_overwrite(&self, path: &Path, encoded: &[u8]) -> Result<(), VcrError> {
        match fs::read(path) {
            Ok(existing) => {
                self.diagnostics.fixture_overwrite(path, &existing, encoded);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VcrError::persistence(path, e)),
        }
    }
}

/// Missing parent directories are not created.
pub fn write_fixture(path: &Path, encoded: &[u8]) -> Result<(), VcrError> {
    fs::write(path, encoded).map_err(|e| VcrError::persistence(path, e))
}
