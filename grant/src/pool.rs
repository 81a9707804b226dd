use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{error::GrantError, round::BLOCKS_PER_DAY};

pub const DEFAULT_AUTHORITY_SET_URL: &str = "https://luciap.ca/api/v1/authority-set/summary";

/// One entry of the authority-set summary. Fields we do not consume are left
/// out; entries without a contribution figure simply contribute nothing.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorityEntry {
    #[serde(default)]
    pub entity: Option<AuthorityEntity>,
    #[serde(rename = "factoidsPerDay", default)]
    pub factoids_per_day: Option<FactoidsPerDay>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthorityEntity {
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FactoidsPerDay {
    #[serde(rename = "grantPool", default)]
    pub grant_pool: f64,
}

/// Sum of the daily grant-pool contributions of all enabled authority
/// entities.
pub fn daily_pool_contribution(entries: &[AuthorityEntry]) -> f64 {
    entries
        .iter()
        .filter(|entry| !entry.entity.as_ref().map(|e| e.disabled).unwrap_or(false))
        .filter_map(|entry| entry.factoids_per_day.map(|f| f.grant_pool))
        .sum()
}

/// Client for the authority-set summary endpoint.
pub struct AuthoritySetClient {
    http: Client,
    url: Url,
}

impl AuthoritySetClient {
    pub fn new(url: &str) -> Result<Self, GrantError> {
        Ok(Self {
            http: Client::new(),
            url: Url::parse(url)?,
        })
    }

    pub async fn daily_grant_pool_contribution(&self) -> Result<f64, GrantError> {
        let entries: Vec<AuthorityEntry> = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .json()
            .await?;
        let daily = daily_pool_contribution(&entries);
        log::debug!(
            target: "grant",
            "Authority set: {} entries, {} FCT/day to the grant pool",
            entries.len(),
            daily
        );
        Ok(daily)
    }
}

/// Grant-pool growth between `current_height` and `payout_height`, given the
/// daily contribution rate.
pub fn contribution_until_height(daily: f64, current_height: u32, payout_height: u32) -> f64 {
    let blocks = payout_height.saturating_sub(current_height);
    (daily / f64::from(BLOCKS_PER_DAY) * f64::from(blocks)).round()
}
