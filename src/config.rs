use super::*;

pub(crate) const DEFAULT_API_BASE: &str =
  "https://hacker-news.firebaseio.com/v0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
  pub(crate) api_base: String,
  pub(crate) concurrency: usize,
  pub(crate) item_ttl: Duration,
  pub(crate) list_ttl: Duration,
  pub(crate) max_auto_depth: usize,
  pub(crate) page_size: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_base: DEFAULT_API_BASE.into(),
      concurrency: 15,
      item_ttl: Duration::from_secs(5 * 60),
      list_ttl: Duration::from_secs(2 * 60),
      max_auto_depth: 3,
      page_size: 30,
    }
  }
}
