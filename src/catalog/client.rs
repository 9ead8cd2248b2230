use sgp4::Elements;

use crate::catalog::{Catalog, CatalogError, Satellite};

pub const DEFAULT_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Client for a CelesTrak-style GP catalog endpoint.
///
/// Element sets decay in accuracy over days, so callers are expected to
/// re-fetch instead of holding a catalog indefinitely. No retry here;
/// retry and backoff policy belongs to the caller.
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch every element set in a named group ("stations", "weather",
    /// ...) as OMM JSON and index it by object name.
    pub async fn fetch_group(&self, group: &str) -> Result<Catalog, CatalogError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("GROUP", group), ("FORMAT", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "catalog returned {}",
                response.status()
            )));
        }

        let sets: Vec<Elements> = response.json().await?;
        log::info!("Fetched {} element sets for group {:?}", sets.len(), group);
        Catalog::from_elements(sets)
    }

    /// Fetch the freshest element set for one satellite, selected from
    /// its group by exact name match.
    pub async fn fetch_satellite(
        &self,
        group: &str,
        name: &str,
    ) -> Result<Satellite, CatalogError> {
        self.fetch_group(group).await?.take(name)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_GP_URL)
    }
}
