//! Use-case entry points for the request-handling layer.
//!
//! # Responsibility
//! - Hold the injected Connection Provider.
//! - Keep callers decoupled from query module construction.

pub mod workforce_service;
