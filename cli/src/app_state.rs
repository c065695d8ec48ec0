use fcb_ai::pipeline::FactChecker;
use fcb_core::domain::FactCheckResult;
use fcb_core::error::AppError;
use fcb_core::settings::Settings;
use fcb_core::store::{RecordStore, SqliteRecordStore};

/// Everything one session needs: settings, the record store, the lazily built
/// checker, the in-memory history and which entry is selected.
pub struct AppState {
    settings: Settings,
    store: SqliteRecordStore,
    checker: Option<FactChecker>,
    history: Option<Vec<FactCheckResult>>,
    selected: Option<usize>,
}

impl AppState {
    pub fn new(settings: Settings, store: SqliteRecordStore) -> Self {
        Self {
            settings,
            store,
            checker: None,
            history: None,
            selected: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SqliteRecordStore {
        &self.store
    }

    /// Use an already built checker instead of constructing one from settings.
    pub fn with_checker(mut self, checker: FactChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    fn checker(&mut self) -> Result<&mut FactChecker, AppError> {
        if self.checker.is_none() {
            let checker = FactChecker::from_settings(&self.settings, Box::new(self.store.clone()))?;
            tracing::info!(model = %self.settings.llm_model, "fact checker initialized");
            self.checker = Some(checker);
        }
        self.checker
            .as_mut()
            .ok_or_else(|| AppError::new("PIPELINE_INIT_FAILED", "Fact checker unavailable"))
    }

    fn history_mut(&mut self) -> &mut Vec<FactCheckResult> {
        let store = &self.store;
        self.history.get_or_insert_with(|| match store.load_all() {
            Ok(rows) => rows.into_iter().map(|r| r.result).collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %store.db_path().display(),
                    "could not load fact-check history; run `factcheck clear` to reset it"
                );
                Vec::new()
            }
        })
    }

    /// Run the claim through the pipeline, append it to history and select it.
    pub fn submit_claim(&mut self, claim: &str) -> Result<&FactCheckResult, AppError> {
        // Load before running so a first-use load never includes the new row twice.
        self.history_mut();
        let result = self.checker()?.process_claim(claim)?;

        let history = self.history_mut();
        history.push(result);
        let idx = history.len() - 1;
        self.selected = Some(idx);
        Ok(&self.history_mut()[idx])
    }

    pub fn history(&mut self) -> &[FactCheckResult] {
        self.history_mut().as_slice()
    }

    /// Select a history entry by zero-based index.
    pub fn select(&mut self, index: usize) -> Result<&FactCheckResult, AppError> {
        let len = self.history_mut().len();
        if index >= len {
            return Err(AppError::new("HISTORY_INDEX_OUT_OF_RANGE", "No such fact-check")
                .with_details(format!("index={}; entries={len}", index + 1)));
        }
        self.selected = Some(index);
        Ok(&self.history_mut()[index])
    }

    pub fn selected(&mut self) -> Option<&FactCheckResult> {
        let idx = self.selected?;
        self.history_mut().get(idx)
    }

    /// Delete every stored record and reset the session, including the search cache.
    pub fn clear_history(&mut self) -> Result<usize, AppError> {
        let removed = self.store.clear()?;
        self.history = Some(Vec::new());
        self.selected = None;
        self.checker = None;
        Ok(removed)
    }
}
