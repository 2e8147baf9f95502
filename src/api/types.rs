//! API response types
//!
//! Field names follow the API's camelCase JSON. Optional or loosely typed
//! fields default instead of failing the whole response, whether they are
//! missing or `null`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Reads `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `GET /params`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    pub data: Params,
}

/// Selectable languages and currencies, code → display label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: BTreeMap<String, String>,
}

/// A country (or multi-country region) offering plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryListItem {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    /// Lowest plan price, already formatted by the API
    #[serde(default, deserialize_with = "null_as_default")]
    pub starting_from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_region: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Absent in country detail responses
    #[serde(default, deserialize_with = "null_as_default")]
    pub search_terms: Vec<String>,
    /// Flag image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub flag: String,
    /// Banner image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub banner: String,
}

impl CountryListItem {
    /// Case-insensitive match of `query` against name, region and search terms
    ///
    /// A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.region.to_lowercase().contains(&query)
            || self
                .search_terms
                .iter()
                .any(|term| term.to_lowercase().contains(&query))
    }
}

/// Response of `GET /countries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    pub data: Vec<CountryListItem>,
}

/// A data plan sold for a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryPlan {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mb: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sale_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gb: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub carriers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_unlimited: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_top_ups: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_refundable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_tethering_allowed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_speed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activation_days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_url: String,
}

impl CountryPlan {
    /// Price the customer pays: the sale price when there is one
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale > 0.0 => sale,
            _ => self.price,
        }
    }

    /// Whether a sale price undercuts the list price
    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Data allowance, e.g. "Unlimited" or "5 GB"
    pub fn data_label(&self) -> String {
        if self.is_unlimited {
            "Unlimited".to_string()
        } else {
            format!("{} GB", self.gb)
        }
    }

    /// Feature badges in display order
    pub fn badges(&self) -> Vec<&str> {
        let mut badges = Vec::new();
        if self.is_refundable {
            badges.push("Refundable");
        }
        if self.is_tethering_allowed {
            badges.push("Tethering");
        }
        if self.has_top_ups {
            badges.push("Top-ups");
        }
        if !self.network_speed.is_empty() {
            badges.push(self.network_speed.as_str());
        }
        badges
    }
}

/// Country header plus its plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub country: CountryListItem,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plans: Vec<CountryPlan>,
}

/// Response of `GET /countries?id=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryDetailResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    pub data: CountryDetail,
}
