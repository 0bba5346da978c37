//! Domain model for the three widgets and the navigation shell.
//!
//! # Responsibility
//! - Define calculator state transitions and display projection.
//! - Define persisted task records and due-date rules.
//! - Define gallery catalog entries and navigation sections.
//!
//! # Invariants
//! - Model types never touch storage or logging.

pub mod calculator;
pub mod due_date;
pub mod gallery;
pub mod number;
pub mod section;
pub mod task;
