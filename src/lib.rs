//! Fit Advisor - Photo-based body measurement and garment size recommendation
//!
//! This crate turns pose landmarks from a photo into calibrated body
//! measurements and scores those measurements against garment size charts.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
