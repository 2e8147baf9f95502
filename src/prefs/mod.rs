//! User preferences (language and currency)
//!
//! A [`PreferencesStore`] is opened once at startup and cloned into whatever
//! needs it. It starts out Loading with default values while a background task
//! reads the persisted record, then becomes Ready and stays Ready. Every change
//! made after that is written back as one whole `{language, currency}` record
//! under [`STORAGE_KEY`].
//!
//! Nothing here ever fails loudly: a missing or corrupt record means defaults,
//! and a failed write is logged and forgotten. The in-memory state is what the
//! rest of the application sees.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use crate::storage::{KeyValueStore, StorageError};

/// Key the preferences record is persisted under
pub const STORAGE_KEY: &str = "prefs:v1";

/// Language used until the user picks one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Currency used until the user picks one
pub const DEFAULT_CURRENCY: &str = "eur";

/// The two user-selectable settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Language code passed to the API, e.g. `"en"`
    pub language: String,
    /// Currency code passed to the API, e.g. `"eur"`
    pub currency: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Persisted record as read back; either field may be absent
#[derive(Debug, Default, Deserialize)]
struct StoredPreferences {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Error)]
enum PreferencesError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lifecycle of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The persisted record has not been read yet
    Loading,
    /// The persisted record has been applied (or found missing)
    Ready,
}

/// Observable state of the store
#[derive(Debug, Clone)]
pub struct PreferencesState {
    preferences: Preferences,
    phase: Phase,
    /// Fields the user changed while still Loading; the load must not undo them
    language_touched: bool,
    currency_touched: bool,
}

impl PreferencesState {
    fn loading() -> Self {
        Self {
            preferences: Preferences::default(),
            phase: Phase::Loading,
            language_touched: false,
            currency_touched: false,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn language(&self) -> &str {
        &self.preferences.language
    }

    pub fn currency(&self) -> &str {
        &self.preferences.currency
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Applies a loaded record to every field the user has not touched.
    ///
    /// Returns true when a touched field means the merged record differs from
    /// what is on disk and must be written.
    fn finish_loading(&mut self, stored: StoredPreferences) -> bool {
        if !self.language_touched {
            if let Some(language) = stored.language.filter(|l| !l.is_empty()) {
                self.preferences.language = language;
            }
        }
        if !self.currency_touched {
            if let Some(currency) = stored.currency.filter(|c| !c.is_empty()) {
                self.preferences.currency = currency;
            }
        }

        let needs_persist = self.language_touched || self.currency_touched;
        self.language_touched = false;
        self.currency_touched = false;
        self.phase = Phase::Ready;
        needs_persist
    }
}

enum Command {
    Persist,
    Flush(oneshot::Sender<()>),
}

/// Handle to the process-wide preferences
///
/// Cheap to clone; all clones share the same state and writer task.
#[derive(Clone)]
pub struct PreferencesStore {
    state: Arc<watch::Sender<PreferencesState>>,
    commands: mpsc::UnboundedSender<Command>,
}

impl PreferencesStore {
    /// Opens the store and starts loading the persisted record
    ///
    /// Returns immediately in the Loading phase. Must be called from within a
    /// tokio runtime.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(PreferencesState::loading());
        let state = Arc::new(state);
        let (commands, receiver) = mpsc::unbounded_channel();

        tokio::spawn(run_writer(store, state.clone(), receiver));

        Self { state, commands }
    }

    /// Current state
    pub fn snapshot(&self) -> PreferencesState {
        self.state.borrow().clone()
    }

    /// Current language and currency
    pub fn preferences(&self) -> Preferences {
        self.state.borrow().preferences.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// Receiver notified on every change, including the switch to Ready
    pub fn subscribe(&self) -> watch::Receiver<PreferencesState> {
        self.state.subscribe()
    }

    /// Waits until the persisted record has been loaded
    pub async fn ready(&self) -> Preferences {
        let mut receiver = self.state.subscribe();
        let preferences = match receiver.wait_for(PreferencesState::is_ready).await {
            Ok(state) => state.preferences.clone(),
            // The sender lives in `self`, so it cannot be gone
            Err(_) => self.preferences(),
        };
        preferences
    }

    /// Sets the language; persisted once the store is Ready
    pub fn set_language(&self, code: impl Into<String>) {
        let code = code.into();
        self.update(move |state| {
            state.preferences.language = code;
            state.language_touched = true;
        });
    }

    /// Sets the currency; persisted once the store is Ready
    pub fn set_currency(&self, code: impl Into<String>) {
        let code = code.into();
        self.update(move |state| {
            state.preferences.currency = code;
            state.currency_touched = true;
        });
    }

    /// Waits until every write requested so far has been attempted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.commands.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    fn update(&self, change: impl FnOnce(&mut PreferencesState)) {
        let mut ready = false;
        self.state.send_modify(|state| {
            change(state);
            if state.is_ready() {
                // Touch flags only matter while Loading
                state.language_touched = false;
                state.currency_touched = false;
                ready = true;
            }
        });

        if ready {
            let _ = self.commands.send(Command::Persist);
        }
    }
}

/// Loads the persisted record, then performs writes in request order.
///
/// Ends when every [`PreferencesStore`] handle has been dropped.
async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    state: Arc<watch::Sender<PreferencesState>>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let stored = match load_record(store.as_ref()).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            tracing::info!("no stored preferences, using defaults");
            StoredPreferences::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load preferences, using defaults");
            StoredPreferences::default()
        }
    };

    let mut needs_persist = false;
    state.send_modify(|current| needs_persist = current.finish_loading(stored));
    tracing::debug!(preferences = ?state.borrow().preferences, "preferences ready");

    if needs_persist {
        persist(store.as_ref(), &state).await;
    }

    while let Some(command) = commands.recv().await {
        match command {
            Command::Persist => persist(store.as_ref(), &state).await,
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn load_record(
    store: &dyn KeyValueStore,
) -> Result<Option<StoredPreferences>, PreferencesError> {
    let Some(raw) = store.get(STORAGE_KEY).await? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Writes the current preferences; failures are logged and dropped.
async fn persist(store: &dyn KeyValueStore, state: &watch::Sender<PreferencesState>) {
    let preferences = state.borrow().preferences.clone();
    if let Err(e) = write_record(store, &preferences).await {
        tracing::warn!(error = %e, "failed to persist preferences");
    }
}

async fn write_record(
    store: &dyn KeyValueStore,
    preferences: &Preferences,
) -> Result<(), PreferencesError> {
    let json = serde_json::to_string(preferences)?;
    store.set(STORAGE_KEY, &json).await?;
    Ok(())
}
