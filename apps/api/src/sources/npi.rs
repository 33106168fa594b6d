//! NPI Registry search for licensed healthcare providers.
//!
//! The registry pages at most 200 records per call and offers no sorting, so
//! the full result set is pulled in batches, filtered, sorted by first name
//! and cached, then paginated locally.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::candidate::CandidateSource;
use crate::sources::{get_json, non_empty, total_pages, SourceCandidate, SourceError, SourcePage};
use crate::xray::cache::{Clock, TtlCache};

pub const NPI_API_URL: &str = "https://npiregistry.cms.hhs.gov/api/";
pub const BATCH_SIZE: usize = 200;
/// The registry refuses `skip` beyond this.
pub const MAX_SKIP: usize = 2100;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;
const API_VERSION: &str = "2.1";
const SERVICE: &str = "NPI Registry";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpiSearchParams {
    pub specialty: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub active_only: Option<String>,
}

impl NpiSearchParams {
    /// Only an explicit `false` disables the licence filter.
    pub fn active_only(&self) -> bool {
        self.active_only.as_deref().map(str::trim) != Some("false")
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        match self.limit {
            Some(0) | None => DEFAULT_LIMIT,
            Some(n) => n.min(MAX_LIMIT),
        }
    }

    /// Registry query parameters, in a fixed order so they double as a cache key.
    fn registry_filters(&self) -> Vec<(&'static str, String)> {
        let field = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let mut filters = Vec::new();
        if let Some(v) = field(&self.specialty) {
            filters.push(("taxonomy_description", v));
        }
        if let Some(v) = field(&self.state) {
            filters.push(("state", v.to_uppercase()));
        }
        if let Some(v) = field(&self.city) {
            filters.push(("city", v));
        }
        if let Some(v) = field(&self.first_name) {
            filters.push(("first_name", v));
        }
        if let Some(v) = field(&self.last_name) {
            filters.push(("last_name", v));
        }
        filters
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NpiRecord {
    pub number: Value,
    pub basic: NpiBasic,
    pub addresses: Vec<NpiAddress>,
    pub taxonomies: Vec<NpiTaxonomy>,
    pub endpoints: Vec<NpiEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NpiBasic {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub credential: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub last_updated: Option<String>,
    pub enumeration_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NpiAddress {
    pub address_purpose: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub telephone_number: Option<String>,
    pub fax_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NpiTaxonomy {
    pub code: Option<String>,
    pub desc: Option<String>,
    pub primary: bool,
    pub state: Option<String>,
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NpiEndpoint {
    #[serde(rename = "endpointType")]
    pub endpoint_type: Option<String>,
    #[serde(rename = "endpointTypeDescription")]
    pub endpoint_type_description: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

impl NpiRecord {
    pub fn npi_number(&self) -> String {
        match &self.number {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Status `A` and at least one licensed taxonomy.
    pub fn has_active_license(&self) -> bool {
        self.basic.status.as_deref() == Some("A")
            && self.taxonomies.iter().any(NpiTaxonomy::is_licensed)
    }

    fn sort_key(&self) -> String {
        self.basic.first_name.clone().unwrap_or_default().to_lowercase()
    }
}

impl NpiTaxonomy {
    fn is_licensed(&self) -> bool {
        self.license.as_deref().is_some_and(|l| !l.trim().is_empty())
    }
}

impl NpiEndpoint {
    fn is_email(&self) -> bool {
        self.endpoint_type.as_deref() == Some("EMAIL")
            || self
                .endpoint_type_description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains("email"))
            || self.endpoint.as_deref().is_some_and(|e| e.contains('@'))
    }
}

fn zip5(postal_code: Option<&str>) -> Option<String> {
    postal_code.map(|p| p.chars().take(5).collect::<String>())
}

/// Normalises a registry record into the common candidate shape.
pub fn transform_provider(record: &NpiRecord) -> SourceCandidate {
    let basic = &record.basic;
    let number = record.npi_number();
    let default_address = NpiAddress::default();
    let address = record
        .addresses
        .iter()
        .find(|a| a.address_purpose.as_deref() == Some("LOCATION"))
        .or_else(|| record.addresses.first())
        .unwrap_or(&default_address);
    let primary = record
        .taxonomies
        .iter()
        .find(|t| t.primary)
        .or_else(|| record.taxonomies.first());

    let full_name = [&basic.first_name, &basic.middle_name, &basic.last_name]
        .into_iter()
        .filter_map(|p| p.as_deref().map(str::trim).filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(" ");
    let credential = non_empty(basic.credential.clone());
    let name = match &credential {
        Some(c) => format!("{full_name}, {c}"),
        None => full_name,
    };

    let zip = zip5(address.postal_code.as_deref());
    let location = [address.city.clone(), address.state.clone(), zip.clone()]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(", ");
    let full_address = [
        non_empty(address.address_1.clone()),
        non_empty(address.address_2.clone()),
        Some(format!(
            "{}, {} {}",
            address.city.as_deref().unwrap_or_default(),
            address.state.as_deref().unwrap_or_default(),
            zip.as_deref().unwrap_or_default()
        )),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n");

    let email = record
        .endpoints
        .iter()
        .find(|e| e.is_email())
        .and_then(|e| non_empty(e.endpoint.clone()));

    let licenses: Vec<Value> = record
        .taxonomies
        .iter()
        .filter(|t| t.is_licensed())
        .map(|t| {
            json!({
                "number": t.license,
                "state": t.state.clone().unwrap_or_default(),
                "specialty": t.desc.clone().unwrap_or_default(),
            })
        })
        .collect();

    let gender = match basic.gender.as_deref() {
        Some("M") => "Male",
        Some("F") => "Female",
        _ => "",
    };
    let status = match basic.status.as_deref() {
        Some("A") => "Active".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "Unknown".to_string(),
    };

    SourceCandidate {
        id: number.clone(),
        source: CandidateSource::Npi,
        name,
        title: Some(
            primary
                .and_then(|t| non_empty(t.desc.clone()))
                .unwrap_or_else(|| "Healthcare Professional".to_string()),
        ),
        location: Some(location).filter(|l| !l.is_empty()),
        bio: None,
        profile_url: format!("https://npiregistry.cms.hhs.gov/provider-view/{number}"),
        email,
        phone: non_empty(address.telephone_number.clone()),
        extra: json!({
            "npiNumber": number,
            "firstName": basic.first_name.clone().unwrap_or_default(),
            "lastName": basic.last_name.clone().unwrap_or_default(),
            "credential": credential.unwrap_or_default(),
            "taxonomyCode": primary.and_then(|t| t.code.clone()).unwrap_or_default(),
            "licenseNumber": primary.and_then(|t| t.license.clone()).unwrap_or_default(),
            "licenseState": primary.and_then(|t| t.state.clone()).unwrap_or_default(),
            "licenses": licenses,
            "fullAddress": full_address,
            "fax": non_empty(address.fax_number.clone()),
            "gender": gender,
            "lastUpdated": basic.last_updated.clone().unwrap_or_default(),
            "enumerationDate": basic.enumeration_date.clone().unwrap_or_default(),
            "status": status,
            "allSpecialties": record.taxonomies.iter().filter_map(|t| t.desc.clone()).collect::<Vec<_>>(),
            "endpoints": record.endpoints.iter().map(|e| json!({
                "type": e.endpoint_type_description,
                "value": e.endpoint,
            })).collect::<Vec<_>>(),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

pub struct NpiClient {
    http: Client,
    base_url: String,
    batch_delay: Duration,
    cache: TtlCache<String, Arc<Vec<NpiRecord>>>,
}

impl NpiClient {
    pub fn new(http: Client, base_url: impl Into<String>, cache_ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            batch_delay: Duration::from_millis(100),
            cache: TtlCache::new(cache_ttl_secs, clock),
        }
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub async fn search(&self, params: &NpiSearchParams) -> Result<SourcePage, SourceError> {
        let page = params.page();
        let per_page = params.limit();
        let active_only = params.active_only();

        let records = self.fetch_all(params.registry_filters(), active_only).await?;
        let total = records.len() as u64;

        if records.is_empty() {
            let message = if active_only {
                "No healthcare professionals with active licenses found matching your criteria"
            } else {
                "No healthcare professionals found matching your criteria"
            };
            return Ok(SourcePage {
                candidates: Vec::new(),
                total: 0,
                page,
                per_page,
                total_pages: 0,
                message: Some(message.to_string()),
            });
        }

        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let candidates = records
            .iter()
            .skip(start)
            .take(per_page as usize)
            .map(transform_provider)
            .collect();

        Ok(SourcePage {
            candidates,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
            message: None,
        })
    }

    /// Every matching record, filtered and sorted, served from cache when fresh.
    ///
    /// A failed first batch is an error; a failure later keeps what was fetched.
    async fn fetch_all(
        &self,
        filters: Vec<(&'static str, String)>,
        active_only: bool,
    ) -> Result<Arc<Vec<NpiRecord>>, SourceError> {
        let cache_key = format!("{filters:?}|active={active_only}");
        if let Some(hit) = self.cache.get(&cache_key) {
            info!(total = hit.len(), "npi results served from cache");
            return Ok(hit);
        }

        let mut records = Vec::new();
        let mut skip = 0;
        while skip < MAX_SKIP {
            if skip > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let batch = match self.fetch_batch(&filters, skip).await {
                Ok(batch) => batch,
                Err(e) if skip == 0 => return Err(e),
                Err(e) => {
                    warn!(skip, error = %e, "npi batch failed, keeping partial results");
                    break;
                }
            };
            let fetched = batch.len();
            if fetched == 0 {
                break;
            }

            if active_only {
                records.extend(batch.into_iter().filter(NpiRecord::has_active_license));
            } else {
                records.extend(batch);
            }

            if fetched < BATCH_SIZE {
                break;
            }
            skip += BATCH_SIZE;
        }

        records.sort_by_cached_key(NpiRecord::sort_key);
        info!(total = records.len(), active_only, "npi results fetched");

        let records = Arc::new(records);
        self.cache.insert(cache_key, records.clone());
        Ok(records)
    }

    async fn fetch_batch(
        &self,
        filters: &[(&'static str, String)],
        skip: usize,
    ) -> Result<Vec<NpiRecord>, SourceError> {
        let mut query: Vec<(&str, String)> = filters.to_vec();
        query.push(("version", API_VERSION.to_string()));
        query.push(("limit", BATCH_SIZE.to_string()));
        query.push(("skip", skip.to_string()));
        query.push(("enumeration_type", "NPI-1".to_string()));

        let response: RegistryResponse<NpiRecord> =
            get_json(SERVICE, self.http.get(&self.base_url).query(&query)).await?;
        Ok(response.results)
    }

    /// Forgets every cached result set; returns how many were dropped.
    pub fn clear_cache(&self) -> usize {
        let dropped = self.cache.clear();
        info!(dropped, "npi cache cleared");
        dropped
    }

    /// The raw registry record for one NPI number, if it exists.
    pub async fn provider(&self, npi: &str) -> Result<Option<Value>, SourceError> {
        let response: RegistryResponse<Value> = get_json(
            SERVICE,
            self.http
                .get(&self.base_url)
                .query(&[("version", API_VERSION), ("number", npi)]),
        )
        .await?;
        Ok(response.results.into_iter().next())
    }
}
