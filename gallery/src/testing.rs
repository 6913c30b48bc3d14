//! Scripted `ImageApi` for workflow tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{ApiError, ImageApi};
use crate::session::{MemoryStore, StoreError, Token, TokenStore};
use crate::types::{Credentials, ImageRecord, LoginResponse, UploadFile, UploadReceipt};

/// One request as seen by the fake backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Register { email: String },
    Login { email: String },
    List { token: String },
    Upload { token: String, file: String },
    Analyze { token: String, url: String },
}

pub(crate) struct FakeApi {
    calls: RefCell<Vec<Call>>,
    login: RefCell<Result<String, ApiError>>,
    register: RefCell<Result<(), ApiError>>,
    upload: RefCell<Result<(), ApiError>>,
    lists: RefCell<VecDeque<Result<Vec<ImageRecord>, ApiError>>>,
    analyses: RefCell<VecDeque<Result<String, ApiError>>>,
    analyze_gate: RefCell<Option<oneshot::Receiver<()>>>,
    login_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: RefCell::default(),
            login: RefCell::new(Ok("T1".to_owned())),
            register: RefCell::new(Ok(())),
            upload: RefCell::new(Ok(())),
            lists: RefCell::default(),
            analyses: RefCell::default(),
            analyze_gate: RefCell::default(),
            login_gate: RefCell::default(),
        }
    }
}

impl FakeApi {
    pub(crate) fn login_returns(&self, result: Result<&str, ApiError>) {
        *self.login.borrow_mut() = result.map(str::to_owned);
    }

    pub(crate) fn register_returns(&self, result: Result<(), ApiError>) {
        *self.register.borrow_mut() = result;
    }

    pub(crate) fn upload_returns(&self, result: Result<(), ApiError>) {
        *self.upload.borrow_mut() = result;
    }

    pub(crate) fn push_list(&self, result: Result<Vec<ImageRecord>, ApiError>) {
        self.lists.borrow_mut().push_back(result);
    }

    pub(crate) fn push_analysis(&self, result: Result<&str, ApiError>) {
        self.analyses.borrow_mut().push_back(result.map(str::to_owned));
    }

    /// Hold the next analyze request open until the returned sender fires.
    pub(crate) fn gate_analyze(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.analyze_gate.borrow_mut() = Some(rx);
        tx
    }

    /// Hold the next login request open until the returned sender fires.
    pub(crate) fn gate_login(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.login_gate.borrow_mut() = Some(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// Store whose persisted token cannot be removed.
#[derive(Clone, Debug, Default)]
pub(crate) struct StickyStore(pub(crate) MemoryStore);

impl TokenStore for StickyStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        self.0.load()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.0.save(token)
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Write("read-only".to_owned()))
    }
}

pub(crate) fn record(url: &str, path: &str) -> ImageRecord {
    ImageRecord {
        url: url.to_owned(),
        storage_path: path.to_owned(),
        analysis: None,
    }
}

#[async_trait(?Send)]
impl ImageApi for FakeApi {
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Register {
            email: credentials.email.clone(),
        });
        self.register.borrow().clone()
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.calls.borrow_mut().push(Call::Login {
            email: credentials.email.clone(),
        });
        let gate = self.login_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.login.borrow().clone().map(|token| LoginResponse { token })
    }

    async fn list_images(&self, token: &Token) -> Result<Vec<ImageRecord>, ApiError> {
        self.calls.borrow_mut().push(Call::List {
            token: token.as_str().to_owned(),
        });
        self.lists.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn upload_image(&self, token: &Token, file: &UploadFile) -> Result<UploadReceipt, ApiError> {
        self.calls.borrow_mut().push(Call::Upload {
            token: token.as_str().to_owned(),
            file: file.name.clone(),
        });
        self.upload.borrow().clone().map(|()| UploadReceipt::default())
    }

    async fn analyze_image(&self, token: &Token, image_url: &str) -> Result<String, ApiError> {
        self.calls.borrow_mut().push(Call::Analyze {
            token: token.as_str().to_owned(),
            url: image_url.to_owned(),
        });
        let gate = self.analyze_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.analyses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted analysis".to_owned())))
    }
}
