//! RELGRID View Engine
//!
//! Per-session visibility and filter state for every table, and the state
//! machine that turns UI events into state changes plus the minimal set of
//! per-table updates a renderer has to apply.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod engine;
pub mod event;
pub mod layout;
pub mod output;
pub mod state;

pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticSink, MemorySink, TracingSink};
pub use engine::{ActionEngine, EngineConfig};
pub use event::{ActiveCell, UiEvent};
pub use layout::{Layout, LayoutConfig, TableLayout};
pub use output::{EventOutput, OutputBuilder, TableDelta, Visibility};
pub use state::ViewState;
