//! Record/replay fixtures for outbound HTTP calls.
//!
//! A [`Vcr`] sits in front of an [`HttpTransport`]. In `Record` mode every
//! call runs live and its response is written under the fixture directory as
//! `{kind}_{fingerprint}_{sequence}.fixture`; in `Replay` mode the same calls
//! are answered from those files without touching the network; `Live` passes
//! calls straight through.

pub mod codec;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod fixture_path;
pub mod logging;
pub mod message;
pub mod replay;
pub mod sequence;
pub mod transport;
pub mod types;

pub use engine::Vcr;
pub use errors::VcrError;
pub use message::{FormFields, HttpRequest, HttpResponse};
pub use transport::{FakeTransport, HttpTransport, ReqwestTransport};
pub use types::{CallKind, Mode};
