use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReplyState {
  Loaded,
  Loading,
  Unloaded,
}

pub(crate) struct CommentEntry {
  pub(crate) body: String,
  pub(crate) children: Vec<usize>,
  pub(crate) depth: usize,
  pub(crate) expanded: bool,
  pub(crate) item: Item,
  pub(crate) op: bool,
  pub(crate) parent: Option<usize>,
  pub(crate) replies: ReplyState,
}

impl CommentEntry {
  pub(crate) fn body(&self) -> &str {
    self.body.as_str()
  }

  pub(crate) fn can_load_replies(&self) -> bool {
    self.replies == ReplyState::Unloaded && !self.item.kids.is_empty()
  }

  /// Index into the thread colour palette. Depth wraps around so arbitrarily
  /// deep threads reuse colours.
  pub(crate) fn color_index(&self) -> usize {
    self.depth % THREAD_COLORS.len()
  }

  pub(crate) fn has_children(&self) -> bool {
    !self.children.is_empty()
  }

  pub(crate) fn header(&self, now: u64) -> String {
    if self.parent.is_none()
      && let Some(title) = &self.item.title
    {
      return title.clone();
    }

    let mut header = self
      .item
      .by
      .clone()
      .unwrap_or_else(|| "[deleted]".to_string());

    if self.op {
      header.push_str(" [OP]");
    }

    if let Some(time) = self.item.time {
      header.push_str(" · ");
      header.push_str(&format_age(now, time));
    }

    header
  }

  /// Whether collapsing would hide anything: a body, replies, or the
  /// prompt to load them.
  pub(crate) fn is_collapsible(&self) -> bool {
    !self.body.is_empty() || self.has_children() || self.can_load_replies()
  }

  /// A story whose replies are loaded and turned out to be empty.
  pub(crate) fn is_empty_thread(&self) -> bool {
    self.parent.is_none()
      && self.replies == ReplyState::Loaded
      && self.children.is_empty()
  }

  pub(crate) fn new(
    item: Item,
    depth: usize,
    parent: Option<usize>,
    op: bool,
    replies: ReplyState,
  ) -> Self {
    let body = item.text.as_deref().map(html_to_text).unwrap_or_default();

    Self {
      body,
      children: Vec::new(),
      depth,
      expanded: true,
      item,
      op,
      parent,
      replies,
    }
  }

  pub(crate) fn permalink(&self) -> String {
    self.item.permalink()
  }

  pub(crate) fn replies_label(&self) -> Option<String> {
    match (self.replies, self.item.kids.len()) {
      (ReplyState::Loaded, _) | (ReplyState::Unloaded, 0) => None,
      (ReplyState::Loading, _) => Some("loading replies...".to_string()),
      (ReplyState::Unloaded, 1) => Some("load 1 reply".to_string()),
      (ReplyState::Unloaded, count) => Some(format!("load {count} replies")),
    }
  }

  pub(crate) fn summary(&self, now: u64) -> Option<String> {
    if self.parent.is_some() {
      return None;
    }

    ListEntry::from_item(self.item.clone(), now).detail
  }
}
