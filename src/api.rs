//! Synchronous client for the **ONS dataset API** (`https://api.beta.ons.gov.uk/v1`).
//!
//! A dataset is published in editions, each with numbered versions. Every query here
//! targets one version URL, resolved from the dataset id via
//! [`Client::version_url`]: the latest version of the preferred edition
//! (`time-series` by default), or the dataset's own latest version otherwise.
//!
//! ### Notes
//! - Listings (datasets, editions, dimensions, options) are paged with `offset`/`limit`
//!   until `total_count` is reached.
//! - The observations endpoint is a single request; the service rejects selections that
//!   omit a dimension, and that rejection is surfaced as [`ApiError::BadSelection`].
//! - Nothing is retried.
//!
//! Typical usage:
//! ```no_run
//! # use ons_rs::{Client, Selection};
//! let client = Client::default();
//! let _dims = client.get_dimensions("cpih01")?;
//! let sel = Selection::new()
//!     .with("geography", "K02000001")
//!     .with("aggregate", "cpih1dim1A0")
//!     .with_wildcard("time");
//! let _obs = client.get_observations("cpih01", &sel)?;
//! # Ok::<(), ons_rs::ApiError>(())
//! ```
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{
    Choice, Dataset, Dimension, DimensionEntry, DimensionOption, Dimensions, Edition,
    Observations, Page, Selection, TimeSeries,
};
use crate::transport::{HttpResponse, HttpTransport, Transport};
use log::{debug, info};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

// Allow -, _, . unescaped in ids (dataset and dimension ids use them)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment.trim(), SAFE).to_string()
}

/// Safety cap for paged listings.
const MAX_PAGES: u32 = 1000;

/// Which endpoint answered; decides how a 4xx is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Metadata,
    Observations,
}

#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    pub config: ClientConfig,
    transport: T,
}

impl Default for Client<HttpTransport> {
    fn default() -> Self {
        Self::with_transport(ClientConfig::default(), HttpTransport::default())
    }
}

impl Client<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// All published datasets, across every page of `/datasets`.
    pub fn list_datasets(&self) -> Result<Vec<Dataset>, ApiError> {
        let url = format!("{}/datasets", self.config.base_url);
        let datasets: Vec<Dataset> = self.collect_pages(&url)?;
        for d in &datasets {
            debug!("dataset {}: {}", d.id, d.title);
        }
        info!("found {} datasets", datasets.len());
        Ok(datasets)
    }

    pub fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, ApiError> {
        let id = require_id(dataset_id)?;
        let url = format!("{}/datasets/{}", self.config.base_url, enc(id));
        self.get_json(&url, &[], Endpoint::Metadata)
    }

    /// URL of the dataset version that dimension and observation queries go to.
    ///
    /// Prefers the latest version of `config.preferred_edition`; when the dataset
    /// has no such edition, uses the dataset's `latest_version` link.
    pub fn version_url(&self, dataset_id: &str) -> Result<String, ApiError> {
        let id = require_id(dataset_id)?;
        let url = format!("{}/datasets/{}/editions", self.config.base_url, enc(id));
        let editions: Vec<Edition> = self.collect_pages(&url)?;

        let preferred = editions
            .iter()
            .find(|e| e.edition == self.config.preferred_edition)
            .and_then(|e| e.links.latest_version.as_ref());
        if let Some(link) = preferred {
            debug!("{id}: using edition {}", self.config.preferred_edition);
            return Ok(link.href.trim_end_matches('/').to_string());
        }

        info!(
            "{id}: no '{}' edition, falling back to latest version",
            self.config.preferred_edition
        );
        let dataset = self.get_dataset(id)?;
        dataset
            .links
            .latest_version
            .map(|l| l.href.trim_end_matches('/').to_string())
            .ok_or_else(|| ApiError::parse(&url, format!("dataset {id} has no latest_version link")))
    }

    /// Every dimension of the dataset with all of its valid options.
    pub fn get_dimensions(&self, dataset_id: &str) -> Result<Dimensions, ApiError> {
        let version = self.version_url(dataset_id)?;
        self.dimensions_at(&version)
    }

    /// Like [`Client::get_dimensions`], for an already resolved version URL.
    pub fn dimensions_at(&self, version_url: &str) -> Result<Dimensions, ApiError> {
        let url = format!("{}/dimensions", version_url);
        let entries: Vec<DimensionEntry> = self.collect_pages(&url)?;

        let mut out = Dimensions::new();
        for entry in entries {
            info!(
                "{}: {}",
                entry.name,
                entry.label.as_deref().unwrap_or_default()
            );
            let options_url = format!("{}/dimensions/{}/options", version_url, enc(entry.options_id()));
            let options: Vec<DimensionOption> = self.collect_pages(&options_url)?;
            info!("{} has {} options", entry.name, options.len());
            out.insert(
                entry.name.clone(),
                Dimension {
                    name: entry.name,
                    label: entry.label,
                    options,
                },
            );
        }
        Ok(out)
    }

    /// Observations for one selection, in the order the service returns them.
    pub fn get_observations(
        &self,
        dataset_id: &str,
        selection: &Selection,
    ) -> Result<Observations, ApiError> {
        let version = self.version_url(dataset_id)?;
        self.observations_at(&version, selection)
    }

    /// Like [`Client::get_observations`], for an already resolved version URL.
    pub fn observations_at(
        &self,
        version_url: &str,
        selection: &Selection,
    ) -> Result<Observations, ApiError> {
        let url = format!("{}/observations", version_url);
        let obs: Observations = self.get_json(&url, &selection.to_query(), Endpoint::Observations)?;
        info!("{} observations from {}", obs.observations.len(), url);
        Ok(obs)
    }

    /// Resolve the version, list dimensions, choose them with
    /// [`choose_dimensions`], and fetch the observations.
    pub fn get_timeseries(
        &self,
        dataset_id: &str,
        overrides: &Selection,
    ) -> Result<TimeSeries, ApiError> {
        let version_url = self.version_url(dataset_id)?;
        let dims = self.dimensions_at(&version_url)?;
        let selection = choose_dimensions(&dims, overrides);
        let observations = self.observations_at(&version_url, &selection)?;
        Ok(TimeSeries {
            version_url,
            selection,
            observations,
        })
    }

    fn get_json<D: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
        endpoint: Endpoint,
    ) -> Result<D, ApiError> {
        debug!("GET {} {:?}", url, query);
        let resp = self.transport.get(url, query)?;
        if !resp.is_success() {
            return Err(classify(url, endpoint, resp));
        }
        serde_json::from_str(&resp.body).map_err(|e| ApiError::parse(url, e))
    }

    fn collect_pages<D: DeserializeOwned>(&self, url: &str) -> Result<Vec<D>, ApiError> {
        let limit = self.config.page_size.to_string();
        let mut out = Vec::new();
        let mut offset = 0u32;
        for _ in 0..MAX_PAGES {
            let query = [
                ("offset".to_string(), offset.to_string()),
                ("limit".to_string(), limit.clone()),
            ];
            let page: Page<D> = self.get_json(url, &query, Endpoint::Metadata)?;
            let n = page.items.len() as u32;
            out.extend(page.items);
            offset += n;
            if n == 0 || offset >= page.total_count {
                return Ok(out);
            }
        }
        Err(ApiError::parse(url, format!("page limit exceeded ({MAX_PAGES})")))
    }
}

fn require_id(dataset_id: &str) -> Result<&str, ApiError> {
    let id = dataset_id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidInput("dataset id must not be empty".into()));
    }
    Ok(id)
}

fn classify(url: &str, endpoint: Endpoint, resp: HttpResponse) -> ApiError {
    let message = {
        let m = resp.body.trim();
        if m.is_empty() {
            format!("HTTP {}", resp.status)
        } else {
            m.to_string()
        }
    };
    let url = url.to_string();
    match (endpoint, resp.status) {
        (_, 404) => ApiError::NotFound { url, message },
        (Endpoint::Observations, 400) => ApiError::BadSelection { url, message },
        (Endpoint::Metadata, 400..=499) => ApiError::NotFound { url, message },
        (_, status) => ApiError::Transport {
            url,
            reason: format!("HTTP {status}: {message}"),
        },
    }
}

/// Find the first dataset whose title contains `name`, ignoring case.
pub fn find_dataset_by_name<'a>(datasets: &'a [Dataset], name: &str) -> Option<&'a Dataset> {
    let needle = name.to_lowercase();
    let found = datasets
        .iter()
        .find(|d| d.title.to_lowercase().contains(&needle));
    match found {
        Some(d) => info!("found dataset '{}'", d.title),
        None => info!("no dataset found containing '{name}'"),
    }
    found
}

/// Build a full selection: first listed option of every dimension, the time
/// dimension wildcarded, then `overrides` on top.
///
/// Dimensions without options are left out; the service reports them as missing.
pub fn choose_dimensions(dimensions: &Dimensions, overrides: &Selection) -> Selection {
    let mut sel = Selection::new();
    for (name, dim) in dimensions {
        if name.eq_ignore_ascii_case("time") {
            sel.set(name.clone(), Choice::Wildcard);
        } else if let Some(first) = dim.options.first() {
            sel.set(name.clone(), first.option.as_str());
        }
    }
    for (name, choice) in overrides.iter() {
        sel.set(name.clone(), choice.clone());
    }
    sel
}
