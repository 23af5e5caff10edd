// src/parse/mod.rs — Pure parsers for the agent's persisted state
//
// Every parser here takes raw text and returns a typed, possibly-empty
// structure. None of them can fail: lines that do not match a grammar are
// free-form narrative and are dropped silently. That tolerance is the
// contract, not a shortcut.

pub mod docs;
pub mod heartbeat;
pub mod todo;
