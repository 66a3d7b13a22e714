//! Utility modules.
//!
//! # Modules
//!
//! - [`ids`]: Stable node ids from bound values

pub mod ids;
