//! Application layer services implementing business logic.
//!
//! Services consume the store and cache traits and provide a clean API for
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::allocator::Allocator`] - Collision-checked short code allocation
//! - [`services::link_service::LinkService`] - Shortening and cached resolution

pub mod services;
