//! Deck win/loss tracking from on-screen text.
//!
//! A capture loop reads the recognized text of a game window, a line
//! classifier spots match-start and outcome screens, and a small state
//! machine turns them into per-deck win/loss counters that are written
//! through to a CSV file and served on a live status page.

pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod logging;
pub mod ocr;
pub mod runner;
pub mod status;
pub mod store;
