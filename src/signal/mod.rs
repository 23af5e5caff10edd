// src/signal/mod.rs — Derived-signal engines
//
// Nothing in here is persisted: mood, health, and the cron view are all
// recomputed from scratch on every request.

pub mod cron;
pub mod health;
pub mod mood;
