//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements the backend contract from `gallery::api` over `gloo-net`.

pub mod api;
