//! Gesture Arcade core
//!
//! Turns per-frame hand landmarks into game commands and runs two arcade
//! games on top of them:
//! - gesture classification and per-hand tracking (`hand`)
//! - gesture → command binding (`control`)
//! - the authoritative simulation (`game`) and render frames (`render`)
//! - the host-facing session, driver and protocol (`app`, `feed`)

pub mod app;
pub mod config;
pub mod control;
pub mod feed;
pub mod game;
pub mod hand;
pub mod render;
pub mod store;
pub mod util;
