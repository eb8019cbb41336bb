//! Business logic services for the application layer.

pub mod allocator;
pub mod link_service;

pub use allocator::{
    AllocationError, AllocationStrategy, Allocator, AllocatorConfig, DEFAULT_MAX_ATTEMPTS,
    ExhaustionPolicy,
};
pub use link_service::LinkService;
