//! Business logic services, separated from HTTP concerns.

pub mod form_service;

pub use form_service::FormService;
