use super::*;

/// One page of a story list.
#[derive(Debug)]
pub(crate) struct Page {
  pub(crate) entries: Vec<ListEntry>,
  pub(crate) has_more: bool,
}
