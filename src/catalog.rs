//! Read-through loaders for the screens
//!
//! Each loader checks the cache first, goes to the API on a miss, and writes
//! the fresh response back. A failed write-back only costs a future network
//! request, so it is logged and otherwise ignored.

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::api::{ApiError, CountryDetail, CountryListItem, EsimClient, Params};
use crate::cache::CacheManager;
use crate::prefs::Preferences;

const HOUR: u64 = 60 * 60;

/// How long the language/currency lists stay fresh
pub const PARAMS_MAX_AGE: Duration = Duration::from_secs(24 * HOUR);

/// How long a country list stays fresh
pub const COUNTRIES_MAX_AGE: Duration = Duration::from_secs(6 * HOUR);

/// How long a country's plans stay fresh
pub const COUNTRY_DETAIL_MAX_AGE: Duration = Duration::from_secs(24 * HOUR);

/// Cache key for the language/currency lists
pub const PARAMS_KEY: &str = "params:v1";

/// Cache key for a country list in one language and currency
pub fn countries_key(preferences: &Preferences) -> String {
    format!(
        "countries:v1:{}:{}",
        preferences.language, preferences.currency
    )
}

/// Cache key for one country's plans in one language and currency
pub fn country_key(id: &str, preferences: &Preferences) -> String {
    format!(
        "country:v1:{}:{}:{}",
        id, preferences.language, preferences.currency
    )
}

/// Countries matching `query`, in their original order
pub fn filter_countries<'a>(countries: &'a [CountryListItem], query: &str) -> Vec<&'a CountryListItem> {
    countries.iter().filter(|c| c.matches(query)).collect()
}

/// Cached access to the storefront API
#[derive(Clone)]
pub struct Catalog {
    cache: CacheManager,
    client: EsimClient,
}

impl Catalog {
    pub fn new(cache: CacheManager, client: EsimClient) -> Self {
        Self { cache, client }
    }

    /// Languages and currencies the user can choose from
    pub async fn params(&self) -> Result<Params, ApiError> {
        self.read_through(PARAMS_KEY, PARAMS_MAX_AGE, || async {
            Ok(self.client.get_params().await?.data)
        })
        .await
    }

    /// All countries, localized and priced for `preferences`
    pub async fn countries(&self, preferences: &Preferences) -> Result<Vec<CountryListItem>, ApiError> {
        let key = countries_key(preferences);
        self.read_through(&key, COUNTRIES_MAX_AGE, || async {
            let response = self
                .client
                .get_countries(Some(&preferences.language), Some(&preferences.currency))
                .await?;
            Ok(response.data)
        })
        .await
    }

    /// One country and its plans, localized and priced for `preferences`
    pub async fn country_detail(
        &self,
        id: &str,
        preferences: &Preferences,
    ) -> Result<CountryDetail, ApiError> {
        let key = country_key(id, preferences);
        self.read_through(&key, COUNTRY_DETAIL_MAX_AGE, || async {
            let response = self
                .client
                .get_country_detail(id, Some(&preferences.language), Some(&preferences.currency))
                .await?;
            Ok(response.data)
        })
        .await
    }

    async fn read_through<T, F, Fut>(&self, key: &str, max_age: Duration, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(cached) = self.cache.get::<T>(key, max_age).await {
            return Ok(cached);
        }

        let fresh = fetch().await?;
        if let Err(e) = self.cache.set(key, &fresh).await {
            tracing::warn!(key, error = %e, "failed to cache response");
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::cell::Cell;
    use std::sync::Arc;

    /// Catalog whose client can never reach a server
    fn offline_catalog() -> (Catalog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheManager::new(store.clone());
        let client = EsimClient::with_base_url("http://127.0.0.1:9");
        (Catalog::new(cache, client), store)
    }

    fn prefs(language: &str, currency: &str) -> Preferences {
        Preferences {
            language: language.to_string(),
            currency: currency.to_string(),
        }
    }

    fn countries() -> Vec<CountryListItem> {
        serde_json::from_str(
            r#"[
                {"id": "jp", "name": "Japan", "region": "Asia", "searchTerms": ["tokyo"]},
                {"id": "fr", "name": "France", "region": "Europe"},
                {"id": "eu", "name": "Europe", "region": "Europe", "isRegion": true}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_cache_keys_include_language_and_currency() {
        let p = prefs("fr", "usd");
        assert_eq!(countries_key(&p), "countries:v1:fr:usd");
        assert_eq!(country_key("jp", &p), "country:v1:jp:fr:usd");
        assert_ne!(countries_key(&p), countries_key(&prefs("fr", "eur")));
    }

    #[test]
    fn test_filter_countries() {
        let all = countries();

        let ids: Vec<&str> = filter_countries(&all, "europe").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["fr", "eu"]);

        let ids: Vec<&str> = filter_countries(&all, "TOK").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["jp"]);

        assert_eq!(filter_countries(&all, "").len(), 3);
        assert!(filter_countries(&all, "brazil").is_empty());
    }

    #[tokio::test]
    async fn test_cached_countries_skip_the_network() {
        let (catalog, _store) = offline_catalog();
        let p = prefs("en", "eur");
        catalog.cache.set(&countries_key(&p), &countries()).await.unwrap();

        let loaded = catalog.countries(&p).await.expect("served from cache");
        assert_eq!(loaded, countries());
    }

    #[tokio::test]
    async fn test_cache_miss_goes_to_the_network() {
        let (catalog, _store) = offline_catalog();

        // Cached for another currency only
        catalog
            .cache
            .set(&countries_key(&prefs("en", "usd")), &countries())
            .await
            .unwrap();

        let result = catalog.countries(&prefs("en", "eur")).await;
        assert!(matches!(result, Err(ApiError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_read_through_writes_back_on_miss() {
        let (catalog, store) = offline_catalog();
        let calls = Cell::new(0);

        for _ in 0..2 {
            let value: Vec<u32> = catalog
                .read_through("numbers", Duration::from_secs(60), || async {
                    calls.set(calls.get() + 1);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(calls.get(), 1, "second read is a cache hit");
        assert!(store.get("numbers").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_read_through_does_not_cache_failures() {
        let (catalog, store) = offline_catalog();

        let result: Result<u32, ApiError> = catalog
            .read_through("broken", Duration::from_secs(60), || async {
                Err(ApiError::InvalidUrl("nope".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_falls_back_to_fetch() {
        let (catalog, store) = offline_catalog();
        store.set(PARAMS_KEY, "garbage").await.unwrap();

        let value: Params = catalog
            .read_through(PARAMS_KEY, PARAMS_MAX_AGE, || async { Ok(Params::default()) })
            .await
            .unwrap();

        assert_eq!(value, Params::default());
        let cached: Option<Params> = catalog.cache.get(PARAMS_KEY, PARAMS_MAX_AGE).await;
        assert_eq!(cached, Some(Params::default()));
    }
}
