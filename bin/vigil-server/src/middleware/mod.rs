//! HTTP middleware stack.

pub mod auth;
pub mod trace;
