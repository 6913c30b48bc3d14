//! Session lifecycle and image workspace model for the imagelens client.
//!
//! This crate owns everything the browser app and the CLI share: the token
//! session, the route guard, login/registration flows, the image workspace
//! state machine, and the `ImageApi` seam the frontends implement over their
//! own HTTP stacks. Nothing here depends on a UI framework or an HTTP client.

pub mod actions;
pub mod api;
pub mod auth;
pub mod guard;
pub mod session;
pub mod state;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ImageApi};
pub use guard::{Access, Route, authorize};
pub use session::{MemoryStore, Session, StoreError, Token, TokenStore};
pub use state::{ClientState, StateHandle};
pub use types::{Credentials, ImageRecord, UploadFile};
pub use workspace::{Workspace, WorkspaceError};
