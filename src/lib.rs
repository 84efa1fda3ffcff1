//! Review Cycles - scheduling, fee allocation, and status lifecycle for
//! recurring reviews of contracted design services.
//!
//! Services are turned into dated review cycles, each cycle gets a fee from
//! the service's agreed fee, and statuses move through a fixed lifecycle in
//! which manual decisions are protected from the calendar-driven refresh.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
