#![forbid(unsafe_code)]

//! Core domain model and business logic for perishable inventory tracking.
//!
//! This crate provides:
//! - Domain types (lots with optional expiration dates, goods)
//! - The inventory aggregate with add / find / amount / expire operations
//! - Free-text note parsing with pluggable grammars
//! - Configuration and logging setup for embedding applications

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod note;
pub mod inventory;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use clock::{Clock, FixedClock, SystemClock};
pub use note::{DelimitedNoteParser, GreedyNoteParser, NoteGrammar, NoteParser, ParsedNote};
pub use inventory::Inventory;
pub use rust_decimal::Decimal;
