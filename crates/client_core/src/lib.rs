use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Atm, protocol::ReportSubmission};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};
use url::Url;

pub mod error;
pub mod state;

pub use error::DirectoryError;
pub use state::{ReportField, SearchPhase, SessionEvent, SessionState};

/// Seam to the external ATM directory service. The real service is HTTP;
/// tests stand in doubles or in-process servers.
#[async_trait]
pub trait AtmDirectory: Send + Sync {
    async fn atms_near_pincode(&self, pincode: &str) -> Result<Vec<Atm>>;
    async fn submit_report(&self, submission: &ReportSubmission) -> Result<()>;
    async fn health_check(&self) -> Result<()>;
}

/// HTTP implementation of the directory contract.
pub struct HttpAtmDirectory {
    http: Client,
    base_url: String,
}

impl HttpAtmDirectory {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Builds the gateway on a caller-supplied client, which is where
    /// request timeouts are configured.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid directory base url: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "directory base url must be http or https: {base_url}"
            ));
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AtmDirectory for HttpAtmDirectory {
    async fn atms_near_pincode(&self, pincode: &str) -> Result<Vec<Atm>> {
        let atms: Vec<Atm> = self
            .http
            .get(format!("{}/api/atms", self.base_url))
            .query(&[("pincode", pincode)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(atms)
    }

    async fn submit_report(&self, submission: &ReportSubmission) -> Result<()> {
        self.http
            .post(format!("{}/api/report", self.base_url))
            .json(submission)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.http
            .get(format!("{}/api/test", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum SessionNotification {
    /// Emitted after every reduction with the new state snapshot.
    StateChanged(SessionState),
    /// Emitted alongside banner updates, with the underlying cause.
    Error(String),
}

/// Holds the session state and drives the two directory calls. All
/// mutation funnels through [`state::reduce`]; operations never poke
/// state fields directly.
pub struct SessionController {
    directory: Arc<dyn AtmDirectory>,
    inner: Mutex<SessionState>,
    search_seq: AtomicU64,
    events: broadcast::Sender<SessionNotification>,
}

impl SessionController {
    pub fn new(directory: Arc<dyn AtmDirectory>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            directory,
            inner: Mutex::new(SessionState::default()),
            search_seq: AtomicU64::new(0),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotification> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    async fn dispatch(&self, event: SessionEvent) -> SessionState {
        let next = {
            let mut guard = self.inner.lock().await;
            let next = state::reduce(&guard, event);
            *guard = next.clone();
            next
        };
        let _ = self
            .events
            .send(SessionNotification::StateChanged(next.clone()));
        next
    }

    /// Allocates the search token and applies the Started transition under
    /// one lock, so overlapping searches can never observe an older token
    /// as the latest one.
    async fn begin_search(&self, pincode: &str) -> u64 {
        let next = {
            let mut guard = self.inner.lock().await;
            let token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
            let next = state::reduce(
                &guard,
                SessionEvent::SearchStarted {
                    token,
                    pincode: pincode.to_string(),
                },
            );
            *guard = next.clone();
            next
        };
        let token = next.search_token;
        let _ = self.events.send(SessionNotification::StateChanged(next));
        token
    }

    pub async fn set_pincode_input(&self, text: &str) {
        self.dispatch(SessionEvent::PincodeEdited(text.to_string()))
            .await;
    }

    /// Fetches the listing for `pincode`. Issues exactly one directory
    /// request; a completion that has been superseded by a newer search is
    /// discarded by the reducer rather than cancelled in flight.
    pub async fn search(&self, pincode: &str) -> std::result::Result<(), DirectoryError> {
        let token = self.begin_search(pincode).await;

        match self.directory.atms_near_pincode(pincode).await {
            Ok(atms) => {
                info!(pincode, token, count = atms.len(), "atm search completed");
                self.dispatch(SessionEvent::SearchSucceeded { token, atms })
                    .await;
                Ok(())
            }
            Err(err) => {
                warn!(pincode, token, "atm search failed: {err:#}");
                let failure = DirectoryError::Fetch(err.to_string());
                self.dispatch(SessionEvent::SearchFailed {
                    token,
                    message: failure.banner_message().to_string(),
                })
                .await;
                let _ = self
                    .events
                    .send(SessionNotification::Error(failure.to_string()));
                Err(failure)
            }
        }
    }

    pub async fn select_atm(&self, atm: Atm) {
        self.dispatch(SessionEvent::AtmSelected(atm)).await;
    }

    /// Resolves an ATM from the current listing by its address, the
    /// contract's identity key, and selects it.
    pub async fn select_atm_by_address(&self, address: &str) -> Result<Atm> {
        let found = {
            let guard = self.inner.lock().await;
            guard.atms.iter().find(|atm| atm.address == address).cloned()
        };
        let atm = found.ok_or_else(|| {
            anyhow!("no atm with address '{address}' in the current listing")
        })?;
        self.dispatch(SessionEvent::AtmSelected(atm.clone())).await;
        Ok(atm)
    }

    pub async fn clear_selection(&self) {
        self.dispatch(SessionEvent::SelectionCleared).await;
    }

    /// Merges a single field into the report draft.
    pub async fn update_report_field(&self, field: ReportField) {
        self.dispatch(SessionEvent::DraftFieldSet(field)).await;
    }

    pub async fn reset_draft(&self) {
        self.dispatch(SessionEvent::DraftReset).await;
    }

    /// Submits the draft for the selected ATM. A call with no selection is
    /// a local no-op: no request leaves the client. On success the last
    /// search is re-run so the refreshed statuses become visible; on
    /// failure the draft stays intact for resubmission.
    pub async fn submit_report(&self) -> std::result::Result<(), DirectoryError> {
        let (submission, last_pincode) = {
            let guard = self.inner.lock().await;
            let Some(selected) = guard.selected.as_ref() else {
                return Ok(());
            };
            (
                ReportSubmission::for_atm(selected, &guard.draft),
                guard.last_pincode.clone(),
            )
        };

        if let Err(err) = self.directory.submit_report(&submission).await {
            warn!(address = %submission.address, "report submission failed: {err:#}");
            let failure = DirectoryError::Submit(err.to_string());
            self.dispatch(SessionEvent::SubmitFailed {
                message: failure.banner_message().to_string(),
            })
            .await;
            let _ = self
                .events
                .send(SessionNotification::Error(failure.to_string()));
            return Err(failure);
        }

        info!(name = %submission.name, address = %submission.address, "report submitted");
        self.dispatch(SessionEvent::SubmitSucceeded {
            notice: "Report Submitted!".to_string(),
        })
        .await;

        if let Some(pincode) = last_pincode {
            if let Err(err) = self.search(&pincode).await {
                warn!(%pincode, "post-submit refresh failed: {err}");
            }
        }

        Ok(())
    }

    pub async fn health_check(&self) -> std::result::Result<(), DirectoryError> {
        self.directory
            .health_check()
            .await
            .map_err(|err| DirectoryError::Health(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
