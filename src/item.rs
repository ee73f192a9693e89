use super::*;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct Item {
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) by: Option<String>,
  #[serde(default)]
  pub(crate) dead: bool,
  #[serde(default)]
  pub(crate) deleted: bool,
  pub(crate) descendants: Option<u64>,
  pub(crate) id: u64,
  #[serde(default)]
  pub(crate) kids: Vec<u64>,
  pub(crate) parent: Option<u64>,
  pub(crate) score: Option<u64>,
  pub(crate) text: Option<String>,
  pub(crate) time: Option<u64>,
  pub(crate) title: Option<String>,
  pub(crate) r#type: Option<String>,
  pub(crate) url: Option<String>,
}

impl Item {
  pub(crate) fn is_live(&self) -> bool {
    !self.dead && !self.deleted
  }

  pub(crate) fn permalink(&self) -> String {
    format!("https://news.ycombinator.com/item?id={}", self.id)
  }
}
