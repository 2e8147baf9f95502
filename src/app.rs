//! Application state management for esimstore
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between tabs and screens.

use crossterm::event::{KeyCode, KeyEvent};

use crate::api::{CountryDetail, CountryListItem, Params};
use crate::catalog::{filter_countries, Catalog};
use crate::cli::StartupConfig;
use crate::prefs::{Preferences, PreferencesStore};

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Language and currency preferences
    #[default]
    Homepage,
    /// Country browsing and plan details
    Countries,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Homepage, Tab::Countries];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Homepage => "Homepage",
            Tab::Countries => "Countries",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Homepage => Tab::Countries,
            Tab::Countries => Tab::Homepage,
        }
    }

    pub fn prev(&self) -> Self {
        // Two tabs: previous and next coincide
        self.next()
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Homepage => 0,
            Tab::Countries => 1,
        }
    }
}

/// Screen shown in the Countries tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountriesView {
    /// Searchable list of all countries
    List,
    /// Plans of one country, by ID
    Detail(String),
}

/// Which list has focus on the Homepage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeFocus {
    #[default]
    Languages,
    Currencies,
}

/// Loading state for async data
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Currently active tab
    pub active_tab: Tab,
    /// Current screen of the Countries tab
    pub countries_view: CountriesView,
    /// Language/currency lists
    pub params: LoadState<Params>,
    /// Country list for `countries_for`
    pub countries: LoadState<Vec<CountryListItem>>,
    /// Country detail for `detail_for`
    pub detail: LoadState<CountryDetail>,
    /// Preferences the country list was requested with
    countries_for: Option<Preferences>,
    /// Country and preferences the detail was requested with
    detail_for: Option<(String, Preferences)>,
    /// Index of the selected row in the filtered country list
    pub selected_index: usize,
    /// Country search text
    pub search_query: String,
    /// Whether typed characters go to the search box
    pub search_active: bool,
    /// Focused Homepage list
    pub home_focus: HomeFocus,
    /// Selected row in the language list
    pub language_index: usize,
    /// Selected row in the currency list
    pub currency_index: usize,
    /// Scroll offset for the country detail view
    pub detail_scroll_offset: u16,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    preferences: PreferencesStore,
    catalog: Catalog,
}

impl App {
    /// Creates a new App on the Homepage tab
    pub fn new(preferences: PreferencesStore, catalog: Catalog) -> Self {
        Self {
            active_tab: Tab::default(),
            countries_view: CountriesView::List,
            params: LoadState::Idle,
            countries: LoadState::Idle,
            detail: LoadState::Idle,
            countries_for: None,
            detail_for: None,
            selected_index: 0,
            search_query: String::new(),
            search_active: false,
            home_focus: HomeFocus::default(),
            language_index: 0,
            currency_index: 0,
            detail_scroll_offset: 0,
            show_help: false,
            should_quit: false,
            preferences,
            catalog,
        }
    }

    /// Creates a new App with the given startup configuration.
    ///
    /// A `--country` argument opens that country's plans directly.
    pub fn with_startup_config(
        config: &StartupConfig,
        preferences: PreferencesStore,
        catalog: Catalog,
    ) -> Self {
        let mut app = Self::new(preferences, catalog);
        if let Some(id) = &config.initial_country {
            app.active_tab = Tab::Countries;
            app.countries_view = CountriesView::Detail(id.clone());
        }
        app
    }

    /// Handle to the shared preferences
    pub fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    /// Countries matching the current search, in API order
    pub fn visible_countries(&self) -> Vec<&CountryListItem> {
        match self.countries.data() {
            Some(all) => filter_countries(all, &self.search_query),
            None => Vec::new(),
        }
    }

    /// Marks every load the current screen needs as Loading.
    ///
    /// Returns true if anything is pending, so the caller can draw the loading
    /// state before awaiting [`App::load_pending`]. Nothing loads until the
    /// preferences are ready, since every request depends on them.
    pub fn start_pending_loads(&mut self) -> bool {
        let state = self.preferences.snapshot();
        if !state.is_ready() {
            return false;
        }
        let current = state.preferences();
        let mut pending = false;

        if matches!(self.params, LoadState::Idle) {
            self.params = LoadState::Loading;
            pending = true;
        }

        if self.countries_for.as_ref() != Some(current) {
            self.countries_for = Some(current.clone());
            self.countries = LoadState::Loading;
            pending = true;
        }

        if let CountriesView::Detail(id) = &self.countries_view {
            let wanted = (id.clone(), current.clone());
            if self.detail_for.as_ref() != Some(&wanted) {
                self.detail_for = Some(wanted);
                self.detail = LoadState::Loading;
                pending = true;
            }
        }

        pending
    }

    /// Performs every load marked by [`App::start_pending_loads`] concurrently.
    ///
    /// Failures are kept as `LoadState::Failed` for the screens to show.
    pub async fn load_pending(&mut self) {
        let catalog = self.catalog.clone();
        let countries_for = self.countries_for.clone();
        let detail_for = self.detail_for.clone();

        let params_future = async {
            if self.params.is_loading() {
                Some(catalog.params().await)
            } else {
                None
            }
        };
        let countries_future = async {
            match (&countries_for, self.countries.is_loading()) {
                (Some(prefs), true) => Some(catalog.countries(prefs).await),
                _ => None,
            }
        };
        let detail_future = async {
            match (&detail_for, self.detail.is_loading()) {
                (Some((id, prefs)), true) => Some(catalog.country_detail(id, prefs).await),
                _ => None,
            }
        };

        let (params, countries, detail) =
            futures::join!(params_future, countries_future, detail_future);

        if let Some(result) = params {
            self.params = match result {
                Ok(params) => {
                    self.sync_home_selection(&params);
                    LoadState::Loaded(params)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load parameters");
                    LoadState::Failed(e.to_string())
                }
            };
        }

        if let Some(result) = countries {
            self.countries = match result {
                Ok(list) => {
                    tracing::info!(count = list.len(), "loaded countries");
                    LoadState::Loaded(list)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load countries");
                    LoadState::Failed(e.to_string())
                }
            };
            self.clamp_selection();
        }

        if let Some(result) = detail {
            self.detail = match result {
                Ok(detail) => LoadState::Loaded(detail),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load country detail");
                    LoadState::Failed(e.to_string())
                }
            };
        }
    }

    /// Forgets the data of the current screen so it is loaded again
    pub fn request_reload(&mut self) {
        match (&self.active_tab, &self.countries_view) {
            (Tab::Homepage, _) => self.params = LoadState::Idle,
            (Tab::Countries, CountriesView::List) => self.countries_for = None,
            (Tab::Countries, CountriesView::Detail(_)) => self.detail_for = None,
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (except while typing a search)
    /// - `Tab`/`Shift-Tab`, `1`/`2`: Switch tabs
    /// - `Up`/`k`, `Down`/`j`: Move selection or scroll
    /// - `Left`/`h`, `Right`/`l` (Homepage): Switch between languages and currencies
    /// - `Enter`: Apply selection (Homepage) or open country plans (Countries)
    /// - `/` (Countries): Search
    /// - `Esc`: Leave search, clear search, or go back to the list
    /// - `r`: Reload current screen
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.search_active {
            self.handle_search_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_tab = if key_event.code == KeyCode::Tab {
                    self.active_tab.next()
                } else {
                    self.active_tab.prev()
                };
                return;
            }
            KeyCode::Char('1') => {
                self.active_tab = Tab::Homepage;
                return;
            }
            KeyCode::Char('2') => {
                self.active_tab = Tab::Countries;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char('r') => {
                self.request_reload();
                return;
            }
            _ => {}
        }

        match (self.active_tab, self.countries_view.clone()) {
            (Tab::Homepage, _) => self.handle_homepage_key(key_event),
            (Tab::Countries, CountriesView::List) => self.handle_list_key(key_event),
            (Tab::Countries, CountriesView::Detail(_)) => self.handle_detail_key(key_event),
        }
    }

    fn handle_homepage_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                self.home_focus = match self.home_focus {
                    HomeFocus::Languages => HomeFocus::Currencies,
                    HomeFocus::Currencies => HomeFocus::Languages,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_home_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_home_selection(true),
            KeyCode::Enter => self.apply_home_selection(),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Esc => {
                self.search_query.clear();
                self.clamp_selection();
            }
            KeyCode::Enter => {
                let id = self
                    .visible_countries()
                    .get(self.selected_index)
                    .map(|c| c.id.clone());
                if let Some(id) = id {
                    self.open_country(id);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.detail_scroll_offset = 0;
                self.countries_view = CountriesView::List;
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => self.search_active = false,
            KeyCode::Backspace => {
                self.search_query.pop();
                self.selected_index = 0;
            }
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.selected_index = 0;
            }
            _ => {}
        }
    }

    /// Switches to the detail screen of country `id`
    pub fn open_country(&mut self, id: String) {
        // Never show another country's plans while this one loads
        let same_country = matches!(&self.detail_for, Some((loaded, _)) if *loaded == id);
        if !same_country {
            self.detail = LoadState::Loading;
        }
        self.detail_scroll_offset = 0;
        self.active_tab = Tab::Countries;
        self.countries_view = CountriesView::Detail(id);
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_countries().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_countries().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_countries().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    fn move_home_selection(&mut self, down: bool) {
        let Some(params) = self.params.data() else {
            return;
        };
        let (index, count) = match self.home_focus {
            HomeFocus::Languages => (&mut self.language_index, params.languages.len()),
            HomeFocus::Currencies => (&mut self.currency_index, params.currencies.len()),
        };
        if count == 0 {
            return;
        }
        *index = if down {
            (*index + 1) % count
        } else if *index == 0 {
            count - 1
        } else {
            *index - 1
        };
    }

    /// Stores the highlighted language or currency as the preference
    fn apply_home_selection(&mut self) {
        let Some(params) = self.params.data() else {
            return;
        };
        match self.home_focus {
            HomeFocus::Languages => {
                if let Some(code) = params.languages.keys().nth(self.language_index) {
                    tracing::info!(language = %code, "language selected");
                    self.preferences.set_language(code.clone());
                }
            }
            HomeFocus::Currencies => {
                if let Some(code) = params.currencies.keys().nth(self.currency_index) {
                    tracing::info!(currency = %code, "currency selected");
                    self.preferences.set_currency(code.clone());
                }
            }
        }
    }

    /// Points the Homepage selections at the current preferences
    fn sync_home_selection(&mut self, params: &Params) {
        let current = self.preferences.preferences();
        if let Some(i) = params.languages.keys().position(|c| *c == current.language) {
            self.language_index = i;
        }
        if let Some(i) = params.currencies.keys().position(|c| *c == current.currency) {
            self.currency_index = i;
        }
    }

    /// Scrolls up in the detail view, stopping at 0
    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view; the renderer clamps to the content
    pub fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 500;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EsimClient;
    use crate::cache::CacheManager;
    use crate::catalog::{countries_key, country_key, PARAMS_KEY};
    use crate::storage::MemoryStore;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(key_event(*code));
        }
    }

    fn sample_params() -> Params {
        serde_json::from_value(serde_json::json!({
            "languages": {"de": "Deutsch", "en": "English", "fr": "Français"},
            "currencies": {"eur": "Euro", "usd": "US Dollar"}
        }))
        .unwrap()
    }

    fn sample_countries() -> Vec<CountryListItem> {
        serde_json::from_value(serde_json::json!([
            {"id": "jp", "name": "Japan", "region": "Asia", "searchTerms": ["tokyo"]},
            {"id": "fr", "name": "France", "region": "Europe"},
            {"id": "it", "name": "Italy", "region": "Europe"}
        ]))
        .unwrap()
    }

    fn sample_detail(id: &str) -> CountryDetail {
        serde_json::from_value(serde_json::json!({
            "country": {"id": id, "name": "Japan", "region": "Asia"},
            "plans": [{"id": 1, "name": "Japan 5GB", "price": 10, "gb": 5, "days": 7}]
        }))
        .unwrap()
    }

    /// App whose API is unreachable, with a cache seeded for `en`/`eur`
    async fn test_app() -> App {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheManager::new(store.clone());
        let prefs = Preferences::default();
        cache.set(PARAMS_KEY, &sample_params()).await.unwrap();
        cache.set(&countries_key(&prefs), &sample_countries()).await.unwrap();
        cache.set(&country_key("jp", &prefs), &sample_detail("jp")).await.unwrap();

        let preferences = PreferencesStore::open(store);
        preferences.ready().await;
        let catalog = Catalog::new(cache, EsimClient::with_base_url("http://127.0.0.1:9"));
        App::new(preferences, catalog)
    }

    async fn load(app: &mut App) {
        while app.start_pending_loads() {
            app.load_pending().await;
        }
    }

    #[tokio::test]
    async fn test_initial_state() {
        let app = test_app().await;
        assert_eq!(app.active_tab, Tab::Homepage);
        assert_eq!(app.countries_view, CountriesView::List);
        assert_eq!(app.params, LoadState::Idle);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_nothing_loads_before_preferences_are_ready() {
        let store = Arc::new(MemoryStore::new());
        let preferences = PreferencesStore::open(store.clone());
        let catalog = Catalog::new(
            CacheManager::new(store),
            EsimClient::with_base_url("http://127.0.0.1:9"),
        );
        let mut app = App::new(preferences, catalog);

        assert!(!app.start_pending_loads());
        assert_eq!(app.countries, LoadState::Idle);
    }

    #[tokio::test]
    async fn test_loads_from_cache() {
        let mut app = test_app().await;
        load(&mut app).await;

        assert_eq!(app.params.data(), Some(&sample_params()));
        assert_eq!(app.countries.data().map(Vec::len), Some(3));
        assert_eq!(app.detail, LoadState::Idle, "no detail screen open");
        // Current preferences are highlighted
        assert_eq!(app.language_index, 1);
        assert_eq!(app.currency_index, 0);
    }

    #[tokio::test]
    async fn test_tab_switching() {
        let mut app = test_app().await;

        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.active_tab, Tab::Countries);
        press(&mut app, &[KeyCode::BackTab]);
        assert_eq!(app.active_tab, Tab::Homepage);
        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(app.active_tab, Tab::Countries);
        press(&mut app, &[KeyCode::Char('1')]);
        assert_eq!(app.active_tab, Tab::Homepage);
    }

    #[tokio::test]
    async fn test_q_quits() {
        let mut app = test_app().await;
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_help_overlay_intercepts_keys() {
        let mut app = test_app().await;

        press(&mut app, &[KeyCode::Char('?'), KeyCode::Tab]);
        assert!(app.show_help);
        assert_eq!(app.active_tab, Tab::Homepage);

        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_selecting_language_updates_preferences_and_reloads() {
        let mut app = test_app().await;
        load(&mut app).await;

        // English -> Français, then apply
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.preferences().preferences().language, "fr");

        // The fr/eur list is not cached and the API is unreachable
        assert!(app.start_pending_loads());
        assert!(app.countries.is_loading());
        app.load_pending().await;
        assert!(matches!(app.countries, LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_selecting_currency() {
        let mut app = test_app().await;
        load(&mut app).await;

        press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Enter]);

        assert_eq!(app.home_focus, HomeFocus::Currencies);
        assert_eq!(app.preferences().preferences().currency, "usd");
        assert_eq!(app.preferences().preferences().language, "en");
    }

    #[tokio::test]
    async fn test_home_selection_wraps() {
        let mut app = test_app().await;
        load(&mut app).await;

        press(&mut app, &[KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.language_index, 0);
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.language_index, 2);
    }

    #[tokio::test]
    async fn test_search_filters_list() {
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('/')]);
        assert!(app.search_active);

        // 'q' is text while searching, not quit
        for c in "euroq".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        assert!(!app.should_quit);
        assert!(app.visible_countries().is_empty());

        press(&mut app, &[KeyCode::Backspace, KeyCode::Enter]);
        assert!(!app.search_active);
        let ids: Vec<&str> = app.visible_countries().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["fr", "it"]);

        press(&mut app, &[KeyCode::Esc]);
        assert!(app.search_query.is_empty());
        assert_eq!(app.visible_countries().len(), 3);
    }

    #[tokio::test]
    async fn test_list_selection_wraps() {
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2')]);

        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected_index, 2);
        press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_esc_returns() {
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Enter]);

        assert_eq!(app.countries_view, CountriesView::Detail("jp".to_string()));
        load(&mut app).await;
        assert_eq!(app.detail.data(), Some(&sample_detail("jp")));

        press(&mut app, &[KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.detail_scroll_offset, 2);

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.countries_view, CountriesView::List);
        assert_eq!(app.detail_scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_opening_another_country_hides_previous_plans() {
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Enter]);
        load(&mut app).await;
        assert!(app.detail.data().is_some());

        // Back to the list, then France
        press(&mut app, &[KeyCode::Esc, KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.countries_view, CountriesView::Detail("fr".to_string()));
        assert!(app.detail.is_loading(), "Japan's plans must not be shown for France");

        // Reopening the loaded country keeps its plans
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Enter]);
        load(&mut app).await;
        press(&mut app, &[KeyCode::Esc, KeyCode::Enter]);
        assert_eq!(app.detail.data(), Some(&sample_detail("jp")));
    }

    #[tokio::test]
    async fn test_startup_country_opens_detail() {
        let base = test_app().await;
        let config = StartupConfig {
            initial_country: Some("jp".to_string()),
            ..Default::default()
        };
        let mut app = App::with_startup_config(&config, base.preferences.clone(), base.catalog.clone());

        assert_eq!(app.active_tab, Tab::Countries);
        load(&mut app).await;
        assert!(app.detail.data().is_some());
    }

    #[tokio::test]
    async fn test_reload_refetches_current_screen_only() {
        let mut app = test_app().await;
        load(&mut app).await;
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('r')]);

        assert!(app.start_pending_loads());
        assert!(app.countries.is_loading());
        assert!(!app.params.is_loading());
        app.load_pending().await;
        assert!(app.countries.data().is_some(), "served from the fresh cache");
    }

    #[test]
    fn test_tab_titles() {
        assert_eq!(Tab::Homepage.title(), "Homepage");
        assert_eq!(Tab::Countries.title(), "Countries");
        assert_eq!(Tab::Homepage.next(), Tab::Countries);
        assert_eq!(Tab::Countries.prev(), Tab::Homepage);
        assert_eq!(Tab::ALL.iter().map(Tab::index).collect::<Vec<_>>(), vec![0, 1]);
    }
}
