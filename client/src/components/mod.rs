//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard pieces from plain props; pages own the state
//! and pass callbacks down.

pub mod analysis_dialog;
pub mod image_card;
pub mod zoom_dialog;
