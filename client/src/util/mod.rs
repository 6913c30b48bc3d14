//! Browser-side helpers for the pages.
//!
//! `auth` holds the protected-route wrapper around `gallery::authorize`;
//! `file` turns the picker's selected `File` into an upload payload.

pub mod auth;
pub mod file;
