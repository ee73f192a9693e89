use super::*;

#[derive(Clone, Debug)]
pub(crate) enum Effect {
  ClearCache,
  FetchComments {
    item_id: u64,
    request_id: u64,
  },
  FetchReplies {
    entry: usize,
    item: Item,
    request_id: u64,
  },
  FetchTabItems {
    tab_index: usize,
    category: Category,
    offset: usize,
  },
  OpenUrl {
    url: String,
  },
}
