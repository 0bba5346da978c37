//! Widget use-case services.
//!
//! # Responsibility
//! - Orchestrate model state and repository calls into widget-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod calculator_service;
pub mod completion_timeline;
pub mod gallery_service;
pub mod navigation_service;
pub mod task_list_service;
