// src/lib.rs — Library root for agentdeck

pub mod api;
pub mod infra;
pub mod overview;
pub mod parse;
pub mod reader;
pub mod signal;
pub mod util;
