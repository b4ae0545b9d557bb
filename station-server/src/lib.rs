//! Station arrivals board server.
//!
//! Tracks scheduled train arrivals at a station, narrows them to today's
//! subset, enriches them with externally sourced real-time delay data,
//! and serves a time-windowed, status-annotated arrivals view.

pub mod board;
pub mod domain;
pub mod provider;
pub mod realtime;
pub mod refresh;
pub mod schedule;
pub mod weather;
pub mod web;
