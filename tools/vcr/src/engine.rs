//! The fixture engine: reserves a sequence number for each call, derives its
//! fixture path and routes it by mode.

use crate::config::VcrConfig;
use crate::errors::VcrError;
use crate::fingerprint::CallDescriptor;
use crate::fixture_path::resolve;
use crate::logging::DiagnosticSink;
use crate::message::{FormFields, HttpRequest, HttpResponse};
use crate::replay::player;
use crate::replay::recorder::Recorder;
use crate::sequence::SequenceCounter;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::Mode;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Record/replay front for HTTP calls.
///
/// Calls take `&self` so one engine can be shared across threads; each call
/// gets a distinct sequence number. Under concurrency the mapping from call to
/// sequence number follows scheduling order, so a concurrent replay only finds
/// the same fixtures as the recording when the calls are interchangeable.
pub struct Vcr {
    dir: PathBuf,
    mode: Mode,
    sequence: SequenceCounter,
    debug: bool,
    transport: Arc<dyn HttpTransport>,
    diagnostics: DiagnosticSink,
}

impl Vcr {
    /// Replay-mode engine over `dir` with the default reqwest transport.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, VcrError> {
        Ok(Self::with_transport(dir, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_transport(dir: impl Into<PathBuf>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            dir: dir.into(),
            mode: Mode::Replay,
            sequence: SequenceCounter::new(),
            debug: false,
            transport,
            diagnostics: DiagnosticSink::default(),
        }
    }

    pub fn from_config(cfg: &VcrConfig) -> Result<Self, VcrError> {
        let transport = Arc::new(cfg.build_transport()?);
        Ok(Self::from_config_with_transport(cfg, transport))
    }

    pub fn from_config_with_transport(cfg: &VcrConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let mut vcr = Self::with_transport(&cfg.fixtures.dir, transport);
        vcr.set_mode(cfg.mode);
        vcr.debug = cfg.diagnostics.debug;
        vcr.diagnostics = cfg.diagnostic_sink();
        vcr
    }

    // ── mode & session state ──────────────────────────────────────────────────

    /// Switch to replay and start a fresh session.
    pub fn play(&mut self) -> &mut Self {
        self.set_mode(Mode::Replay);
        self
    }

    pub fn record(&mut self) -> &mut Self {
        self.set_mode(Mode::Record);
        self
    }

    pub fn live(&mut self) -> &mut Self {
        self.set_mode(Mode::Live);
        self
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Replay {
            self.sequence.reset();
        }
    }

    /// Accepts the names understood by [`Mode`]'s `FromStr`.
    pub fn set_mode_named(&mut self, name: &str) -> Result<(), VcrError> {
        self.set_mode(name.parse()?);
        Ok(())
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
        self.sequence.reset();
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn set_diagnostics(&mut self, sink: DiagnosticSink) {
        self.diagnostics = sink;
    }

    pub fn set_transport(&mut self, transport: Arc<dyn HttpTransport>) {
        self.transport = transport;
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence.current()
    }

    // ── calls ─────────────────────────────────────────────────────────────────

    /// Issue a fully built request. A streaming body is buffered in place, so
    /// the same request value can be issued again.
    pub fn execute(&self, request: &mut HttpRequest) -> Result<HttpResponse, VcrError> {
        let sequence = self.sequence.advance();
        request.buffer_body()?;
        let request = &*request;
        self.dispatch(sequence, CallDescriptor::DirectRequest(request), |transport| {
            transport.execute(request)
        })
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse, VcrError> {
        let sequence = self.sequence.advance();
        self.dispatch(sequence, CallDescriptor::SimpleGet { url }, |transport| {
            transport.get(url)
        })
    }

    pub fn post_form(&self, url: &str, fields: &FormFields) -> Result<HttpResponse, VcrError> {
        let sequence = self.sequence.advance();
        self.dispatch(
            sequence,
            CallDescriptor::FormPost { url, fields },
            |transport| transport.post_form(url, fields),
        )
    }

    /// Path a call would use at `sequence`, without issuing it.
    pub fn fixture_path(
        &self,
        call: CallDescriptor<'_>,
        sequence: u64,
    ) -> Result<PathBuf, VcrError> {
        let fingerprint = call.fingerprint()?;
        Ok(resolve(call.kind(), &fingerprint, sequence, &self.dir))
    }

    fn dispatch(
        &self,
        sequence: u64,
        call: CallDescriptor<'_>,
        live: impl FnOnce(&dyn HttpTransport) -> Result<HttpResponse, VcrError>,
    ) -> Result<HttpResponse, VcrError> {
        match self.mode {
            Mode::Live => live(self.transport.as_ref()),
            Mode::Replay => player::play(&self.fixture_path(call, sequence)?),
            Mode::Record => {
                let path = self.fixture_path(call, sequence)?;
                let recorder = Recorder {
                    debug: self.debug,
                    diagnostics: &self.diagnostics,
                };
                recorder.record(&path, || live(self.transport.as_ref()))
            }
        }
    }
}
