// lib.rs
// Library modules for the bingo hall

pub mod api_handlers;
pub mod config;
pub mod defs;
pub mod drawlog;
pub mod error;
pub mod game;
pub mod logging;
pub mod pattern;
pub mod payout;
pub mod planner;
pub mod pouch;
pub mod server;
pub mod store;
pub mod verify;
