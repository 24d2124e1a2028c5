//! Demonstration workloads for the fitpool allocator.
//!
//! Drives [`fitpool_arena::FirstFitPool`] through the built-in
//! [`scenarios`] or a TOML [`script`], recording each run in a
//! [`session::Session`] and rendering the result with [`render`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod render;
pub mod scenarios;
pub mod script;
pub mod session;

pub use error::DemoError;
pub use script::{Script, ScriptOp};
pub use session::{Event, Phase, ScenarioReport, Session};
