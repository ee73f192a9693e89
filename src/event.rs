use super::*;

pub(crate) enum Event {
  Comments {
    request_id: u64,
    result: Result<CommentThread>,
  },
  Replies {
    entry: usize,
    replies: Vec<Node>,
    request_id: u64,
  },
  TabItems {
    tab_index: usize,
    result: Result<Page>,
  },
}
