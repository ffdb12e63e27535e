//! API Routes
//!
//! Route handlers organized by functionality.

pub mod analytics;
pub mod health;
pub mod products;
pub mod sales;
pub mod session;
