//! Fixture persistence and playback.
//!
//! # Overview
//!
//! A fixture is one HTTP response serialized to its wire form and stored at a
//! path derived from the call's kind, fingerprint and sequence number:
//! 1. **Recorder** – runs the live call, serializes the response, writes it
//! 2. **Player** – reads a fixture back into a response with a readable body
//!
//! The engine picks between them per call based on its mode.

pub mod player;
pub mod recorder;
