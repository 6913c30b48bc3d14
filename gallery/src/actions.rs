//! Async workspace workflows shared by the browser app and the CLI.
//!
//! Each driver is `begin_*` -> await backend -> `apply_*`/`finish_*`, with
//! the shared state touched only in the synchronous steps. None of them
//! retries. A driver whose state disappears mid-flight reports
//! [`Outcome::Stale`].

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use crate::api::ImageApi;
use crate::guard::Route;
use crate::session::{StoreError, TokenStore};
use crate::state::StateHandle;
use crate::workspace::{Outcome, UploadStep, WorkspaceError};

/// Workspace entry: redirect without a token, otherwise load the collection.
///
/// # Errors
///
/// Returns the view to redirect to when no token is present.
pub async fn enter<S, H, A>(state: &H, api: &A) -> Result<Outcome, Route>
where
    S: TokenStore,
    H: StateHandle<S>,
    A: ImageApi + ?Sized,
{
    let ticket = match state.update(|s| s.workspace.enter(&s.session)) {
        Some(ticket) => ticket?,
        None => return Err(Route::Login),
    };
    let result = api.list_images(ticket.token()).await;
    Ok(state.update(|s| s.workspace.apply_list(ticket, result)).unwrap_or(Outcome::Stale))
}

/// Re-fetch the whole collection.
///
/// # Errors
///
/// Returns [`WorkspaceError::NotAuthenticated`] without issuing a request
/// when no token is present.
pub async fn refresh<S, H, A>(state: &H, api: &A) -> Result<Outcome, WorkspaceError>
where
    S: TokenStore,
    H: StateHandle<S>,
    A: ImageApi + ?Sized,
{
    let Some(ticket) = state.update(|s| s.workspace.begin_list(&s.session)) else {
        return Ok(Outcome::Stale);
    };
    let ticket = ticket?;
    let result = api.list_images(ticket.token()).await;
    Ok(state.update(|s| s.workspace.apply_list(ticket, result)).unwrap_or(Outcome::Stale))
}

/// Upload the selected file, then re-list once the upload has resolved.
///
/// # Errors
///
/// Fails locally, without a request, when no file is selected, an upload is
/// already pending, or no token is present.
pub async fn upload<S, H, A>(state: &H, api: &A) -> Result<Outcome, WorkspaceError>
where
    S: TokenStore,
    H: StateHandle<S>,
    A: ImageApi + ?Sized,
{
    let Some(ticket) = state.update(|s| s.workspace.begin_upload(&s.session)) else {
        return Ok(Outcome::Stale);
    };
    let ticket = ticket?;
    let result = api.upload_image(ticket.token(), ticket.file()).await;
    let Some(step) = state.update(|s| s.workspace.finish_upload(ticket, result)) else {
        return Ok(Outcome::Stale);
    };
    match step {
        UploadStep::Finished(outcome) => Ok(outcome),
        UploadStep::Relist(list) => {
            let result = api.list_images(list.token()).await;
            Ok(state.update(|s| s.workspace.apply_list(list, result)).unwrap_or(Outcome::Stale))
        }
    }
}

/// Analyze the image at `index` of the current collection.
///
/// # Errors
///
/// Fails locally, without a request, when no token is present, the position
/// is unknown, or that image is already being analyzed.
pub async fn analyze<S, H, A>(state: &H, api: &A, index: usize) -> Result<Outcome, WorkspaceError>
where
    S: TokenStore,
    H: StateHandle<S>,
    A: ImageApi + ?Sized,
{
    let Some(ticket) = state.update(|s| s.workspace.begin_analyze(index, &s.session)) else {
        return Ok(Outcome::Stale);
    };
    let ticket = ticket?;
    let result = api.analyze_image(ticket.token(), ticket.image_url()).await;
    Ok(state.update(|s| s.workspace.finish_analyze(ticket, result)).unwrap_or(Outcome::Stale))
}

/// Log out regardless of outstanding requests. Returns the view to show.
///
/// # Errors
///
/// Returns the store error when the persisted token could not be removed.
/// Memory and workspace are cleared either way.
pub fn logout<S, H>(state: &H) -> Result<Route, StoreError>
where
    S: TokenStore,
    H: StateHandle<S>,
{
    state.update(|s| s.logout()).unwrap_or(Ok(Route::Login))
}
