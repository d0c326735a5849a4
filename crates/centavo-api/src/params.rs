//! Shared query-parameter shapes for count and list endpoints.

use centavo_core::store::ListQuery;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CountParams {
  pub term: Option<String>,
}

/// `?page=&size=&term=` with the contract's defaults (page 0, size 20).
#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub page: u32,
  #[serde(default = "default_size")]
  pub size: u32,
  pub term: Option<String>,
}

fn default_size() -> u32 {
  20
}

impl ListParams {
  pub fn into_query(self) -> ListQuery {
    ListQuery {
      page: self.page,
      size: self.size,
      term: self.term,
    }
  }
}
