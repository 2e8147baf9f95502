//! eSIM storefront API
//!
//! Client and response types for the JSON API that supplies the language and
//! currency lists, the country list, and per-country plan details.

pub mod client;
pub mod types;

pub use client::{ApiError, EsimClient, DEFAULT_BASE_URL};
pub use types::{
    CountriesResponse, CountryDetail, CountryDetailResponse, CountryListItem, CountryPlan, Params,
    ParamsResponse,
};
