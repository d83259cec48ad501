//! Daily rundown, meeting prep, search and quickstart tools over the
//! Attrove communications API.
//!
//! Each binary under `src/bin/` is a thin shell around one flow module
//! (`rundown`, `prep`, `search`, `quickstart`). The flows are written
//! against the `CommsApi` trait and report degradations through an
//! injected `DiagnosticSink`.

pub mod attrove;
pub mod cli;
pub mod config;
pub mod correlate;
pub mod delivery;
pub mod demo;
pub mod diagnostics;
pub mod digest;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod interact;
pub mod normalize;
pub mod prep;
pub mod quickstart;
pub mod rundown;
pub mod search;
pub mod timefmt;
