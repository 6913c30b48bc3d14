//! Authenticated workspace: the image collection and the requests that
//! change it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every network operation is split into a synchronous `begin_*` step that
//! validates locally and hands out a ticket, and a synchronous
//! `apply_*`/`finish_*` step that consumes the ticket together with the
//! response. The await happens in between, outside this type (see
//! [`crate::actions`]).
//!
//! STALE RESPONSES
//! ===============
//! Tickets carry the workspace generation. [`Workspace::reset`] (logout,
//! leaving the view) bumps it, and a response whose ticket is from an older
//! generation is dropped without touching any state. List tickets also carry
//! a sequence number so only the newest list may replace the collection.
//!
//! Analysis results are matched to records by storage path rather than by
//! position, so a list that lands while an analyze is outstanding cannot
//! redirect the result onto a different image.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use std::collections::BTreeSet;

use crate::api::ApiError;
use crate::guard::Route;
use crate::session::{Session, Token, TokenStore};
use crate::types::{ImageRecord, UploadFile, UploadReceipt};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const ANALYZE_FAILED: &str = "Error analyzing image. Please try again.";

/// Local validation failure; no request was issued.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Please log in first.")]
    NotAuthenticated,
    #[error("Please select an image first!")]
    NoFileSelected,
    #[error("An upload is already in progress.")]
    UploadInFlight,
    #[error("This image is already being analyzed.")]
    AnalysisInFlight,
    #[error("No image at position {0}.")]
    UnknownImage(usize),
}

/// What happened to a response handed back to the workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response was applied.
    Applied,
    /// The request failed; the message is in [`Workspace::error`] and the
    /// collection is unchanged.
    Failed,
    /// The backend rejected the token. The user has to log in again.
    ReauthRequired,
    /// The workspace was reset after the request was issued; dropped.
    Stale,
    /// A newer list was issued, or the analyzed record is gone; dropped.
    Superseded,
}

/// Second half of an upload.
#[derive(Debug)]
pub enum UploadStep {
    /// Upload succeeded; issue this list next.
    Relist(ListTicket),
    Finished(Outcome),
}

/// Analysis shown in the detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisDetail {
    pub url: String,
    pub analysis: String,
}

/// Permission to issue one `GET /api/images`.
#[derive(Debug)]
pub struct ListTicket {
    generation: u64,
    seq: u64,
    token: Token,
}

impl ListTicket {
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// Permission to issue one `POST /api/upload`.
#[derive(Debug)]
pub struct UploadTicket {
    generation: u64,
    token: Token,
    file: UploadFile,
}

impl UploadTicket {
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub fn file(&self) -> &UploadFile {
        &self.file
    }
}

/// Permission to issue one `POST /api/analyze`.
#[derive(Debug)]
pub struct AnalyzeTicket {
    generation: u64,
    storage_path: String,
    image_url: String,
    token: Token,
}

impl AnalyzeTicket {
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

/// Image collection plus in-flight request bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    records: Vec<ImageRecord>,
    selected: Option<UploadFile>,
    uploading: bool,
    analyzing: BTreeSet<String>,
    detail: Option<AnalysisDetail>,
    error: Option<String>,
    loading: bool,
    generation: u64,
    list_seq: u64,
}

impl Workspace {
    #[must_use]
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    #[must_use]
    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the record at `index` has an analyze request outstanding.
    #[must_use]
    pub fn is_analyzing(&self, index: usize) -> bool {
        self.records
            .get(index)
            .is_some_and(|record| self.analyzing.contains(&record.storage_path))
    }

    #[must_use]
    pub fn detail(&self) -> Option<&AnalysisDetail> {
        self.detail.as_ref()
    }

    /// Last user-visible failure message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop the last failure message, e.g. once the user picks a new file.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Drop all view state and invalidate every outstanding ticket.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Entry check for the workspace view.
    ///
    /// With a token present this starts from empty state and returns the
    /// initial list ticket; without one it returns the view to redirect to,
    /// exactly as the route guard would.
    ///
    /// # Errors
    ///
    /// Returns [`Route::Login`] when the session holds no token.
    pub fn enter<S: TokenStore>(&mut self, session: &Session<S>) -> Result<ListTicket, Route> {
        self.reset();
        self.begin_list(session).map_err(|_| Route::Login)
    }

    /// Leaving the view: late responses for it are dropped.
    pub fn leave(&mut self) {
        self.reset();
    }

    /// Start a full list fetch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotAuthenticated`] without a token.
    pub fn begin_list<S: TokenStore>(&mut self, session: &Session<S>) -> Result<ListTicket, WorkspaceError> {
        let token = session.current_token().cloned().ok_or(WorkspaceError::NotAuthenticated)?;
        Ok(self.issue_list(token))
    }

    fn issue_list(&mut self, token: Token) -> ListTicket {
        self.list_seq = self.list_seq.wrapping_add(1);
        self.loading = true;
        ListTicket {
            generation: self.generation,
            seq: self.list_seq,
            token,
        }
    }

    /// Apply a list response. Success replaces the whole collection; failure
    /// leaves it untouched.
    pub fn apply_list(&mut self, ticket: ListTicket, result: Result<Vec<ImageRecord>, ApiError>) -> Outcome {
        if ticket.generation != self.generation {
            log::debug!("dropping stale image list");
            return Outcome::Stale;
        }
        if ticket.seq != self.list_seq {
            log::debug!("dropping superseded image list");
            return Outcome::Superseded;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                log::debug!("image list replaced ({} records)", records.len());
                self.records = records;
                self.error = None;
                Outcome::Applied
            }
            Err(e) => self.fail(&e, format!("Could not load images: {e}")),
        }
    }

    /// Choose (or clear) the file for the next upload.
    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.selected = file;
    }

    /// Start an upload of the selected file.
    ///
    /// # Errors
    ///
    /// Fails locally while another upload is pending, when no file is
    /// selected, or without a token.
    pub fn begin_upload<S: TokenStore>(&mut self, session: &Session<S>) -> Result<UploadTicket, WorkspaceError> {
        if self.uploading {
            return Err(WorkspaceError::UploadInFlight);
        }
        let file = self.selected.clone().ok_or(WorkspaceError::NoFileSelected)?;
        let token = session.current_token().cloned().ok_or(WorkspaceError::NotAuthenticated)?;
        self.uploading = true;
        Ok(UploadTicket {
            generation: self.generation,
            token,
            file,
        })
    }

    /// Finish an upload. The selected file is cleared either way; on success
    /// the caller must run the returned list rather than append locally.
    pub fn finish_upload(&mut self, ticket: UploadTicket, result: Result<UploadReceipt, ApiError>) -> UploadStep {
        if ticket.generation != self.generation {
            log::debug!("dropping stale upload response");
            return UploadStep::Finished(Outcome::Stale);
        }
        self.uploading = false;
        self.selected = None;
        match result {
            Ok(receipt) => {
                log::debug!(
                    "upload of {} accepted: {} stored at {} ({})",
                    ticket.file.name,
                    receipt.message.as_deref().unwrap_or("no message"),
                    receipt.uploaded_path.as_deref().unwrap_or("unknown path"),
                    receipt.file_url.as_deref().unwrap_or("no url"),
                );
                UploadStep::Relist(self.issue_list(ticket.token))
            }
            Err(e) => UploadStep::Finished(self.fail(&e, format!("Upload failed: {e}"))),
        }
    }

    /// Start analyzing the record at `index`.
    ///
    /// # Errors
    ///
    /// Fails locally without a token, for an unknown position, or when that
    /// record is already being analyzed.
    pub fn begin_analyze<S: TokenStore>(
        &mut self,
        index: usize,
        session: &Session<S>,
    ) -> Result<AnalyzeTicket, WorkspaceError> {
        let token = session.current_token().cloned().ok_or(WorkspaceError::NotAuthenticated)?;
        let record = self.records.get(index).ok_or(WorkspaceError::UnknownImage(index))?;
        if self.analyzing.contains(&record.storage_path) {
            return Err(WorkspaceError::AnalysisInFlight);
        }
        let ticket = AnalyzeTicket {
            generation: self.generation,
            storage_path: record.storage_path.clone(),
            image_url: record.url.clone(),
            token,
        };
        self.analyzing.insert(ticket.storage_path.clone());
        Ok(ticket)
    }

    /// Apply an analyze response to every record with the ticket's storage
    /// path and show it as the current detail.
    pub fn finish_analyze(&mut self, ticket: AnalyzeTicket, result: Result<String, ApiError>) -> Outcome {
        if ticket.generation != self.generation {
            log::debug!("dropping stale analysis");
            return Outcome::Stale;
        }
        self.analyzing.remove(&ticket.storage_path);
        let analysis = match result {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("analysis of {} failed: {e}", ticket.storage_path);
                return self.fail(&e, ANALYZE_FAILED.to_owned());
            }
        };
        let mut matched = false;
        for record in self.records.iter_mut().filter(|r| r.storage_path == ticket.storage_path) {
            record.analysis = Some(analysis.clone());
            matched = true;
        }
        if !matched {
            log::warn!("analyzed image {} is no longer listed", ticket.storage_path);
            return Outcome::Superseded;
        }
        self.detail = Some(AnalysisDetail {
            url: ticket.image_url,
            analysis,
        });
        Outcome::Applied
    }

    fn fail(&mut self, error: &ApiError, message: String) -> Outcome {
        if error.is_unauthorized() {
            self.error = Some(SESSION_EXPIRED.to_owned());
            Outcome::ReauthRequired
        } else {
            log::warn!("{message}");
            self.error = Some(message);
            Outcome::Failed
        }
    }
}
