use serde::{Deserialize, Serialize};

use super::fixture::Fixture;
use super::lenient;

/// Competition header used to group match lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub country: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
}

/// One league and its matches, as grouped by the live/tomorrow endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueFixtures {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub league: League,

    /// Entries that are not match objects are dropped
    #[serde(default, deserialize_with = "lenient::vec_lossy")]
    pub matches: Vec<Fixture>,
}

impl LeagueFixtures {
    /// "Country / League" heading
    pub fn heading(&self) -> String {
        format!("{} / {}", self.league.country, self.league.name)
    }
}

/// Server-side pagination of a league list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            total_items: 0,
            total_pages: 1,
        }
    }
}

impl PageInfo {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
