use super::*;

/// Flattened, navigable projection of a comment tree.
///
/// Entries live in an arena and refer to each other by index. Lazily loaded
/// replies are appended to the end of the arena and linked under their
/// parent, so visible order comes from walking the tree rather than from
/// arena order.
pub(crate) struct CommentView {
  pub(crate) entries: Vec<CommentEntry>,
  pub(crate) item_id: u64,
  pub(crate) link: String,
  pub(crate) offset: usize,
  op: Option<String>,
  pub(crate) request_id: u64,
  pub(crate) selected: Option<usize>,
}

impl CommentView {
  /// Links freshly loaded replies under `index`. Returns `false` when the
  /// entry is gone or its replies are already loaded, so a repeated result
  /// never appends the same replies twice.
  pub(crate) fn attach_replies(&mut self, index: usize, nodes: Vec<Node>) -> bool {
    let Some(entry) = self.entries.get(index) else {
      return false;
    };

    if entry.replies == ReplyState::Loaded {
      return false;
    }

    let depth = entry.depth.saturating_add(1);

    let op = self.op.clone();

    let children = nodes
      .into_iter()
      .map(|node| {
        Self::push_node(&mut self.entries, node, Some(index), depth, op.as_deref())
      })
      .collect::<Vec<_>>();

    if let Some(entry) = self.entries.get_mut(index) {
      entry.children = children;
      entry.expanded = true;
      entry.replies = ReplyState::Loaded;
    }

    true
  }

  /// Marks the selected entry as loading and returns what is needed to fetch
  /// its replies, or `None` when there is nothing to load.
  pub(crate) fn begin_loading_selected(&mut self) -> Option<(usize, Item)> {
    let selected = self.selected?;

    let entry = self.entries.get_mut(selected)?;

    if !entry.can_load_replies() {
      return None;
    }

    entry.replies = ReplyState::Loading;

    Some((selected, entry.item.clone()))
  }

  pub(crate) fn collapse_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
    {
      if entry.expanded && entry.is_collapsible() {
        entry.expanded = false;
      } else if let Some(parent) = entry.parent {
        self.selected = Some(parent);
      }
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn ensure_selection_visible(&mut self) {
    let mut current = self.selected;

    while let Some(idx) = current {
      if self.is_visible(idx) {
        self.selected = Some(idx);
        return;
      }

      current = self.entries.get(idx).and_then(|entry| entry.parent);
    }

    self.selected = self.visible_indexes().first().copied();
  }

  pub(crate) fn expand_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
    {
      if !entry.expanded {
        entry.expanded = true;
      } else if let Some(child) = entry.children.first().copied() {
        self.selected = Some(child);
      }
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn is_visible(&self, idx: usize) -> bool {
    let mut current = Some(idx);

    while let Some(i) = current {
      if let Some(parent) = self.entries.get(i).and_then(|entry| entry.parent) {
        if let Some(parent_entry) = self.entries.get(parent)
          && !parent_entry.expanded
        {
          return false;
        }

        current = Some(parent);
      } else {
        break;
      }
    }

    true
  }

  pub(crate) fn link(&self) -> &str {
    &self.link
  }

  pub(crate) fn move_by(&mut self, delta: isize) {
    let (visible, selected_pos) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let current = selected_pos.unwrap_or(0);
    let max_index = visible.len().saturating_sub(1);

    let target = if delta >= 0 {
      let delta_usize = usize::try_from(delta).unwrap_or(usize::MAX);
      current.saturating_add(delta_usize).min(max_index)
    } else {
      let magnitude = delta
        .checked_abs()
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(usize::MAX);

      current.saturating_sub(magnitude)
    };

    self.selected = Some(visible[target]);
  }

  pub(crate) fn new(
    thread: CommentThread,
    fallback_link: String,
    request_id: u64,
  ) -> Self {
    let CommentThread { root, url } = thread;

    let item_id = root.item.id;

    let op = root.item.by.clone();

    let mut entries = Vec::new();

    Self::push_node(&mut entries, root, None, 0, op.as_deref());

    let selected = (!entries.is_empty()).then_some(0);

    Self {
      entries,
      item_id,
      link: url.unwrap_or(fallback_link),
      offset: 0,
      op,
      request_id,
      selected,
    }
  }

  pub(crate) fn page_down(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    let delta = isize::try_from(step).unwrap_or(isize::MAX);
    self.move_by(delta);
  }

  pub(crate) fn page_up(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    let delta = isize::try_from(step).unwrap_or(isize::MAX);
    self.move_by(-delta);
  }

  fn push_node(
    entries: &mut Vec<CommentEntry>,
    node: Node,
    parent: Option<usize>,
    depth: usize,
    op: Option<&str>,
  ) -> usize {
    let Node { item, replies } = node;

    let is_op = parent.is_some() && op.is_some() && item.by.as_deref() == op;

    let (state, children) = match replies {
      Replies::Loaded(children) => (ReplyState::Loaded, children),
      Replies::Unloaded => (ReplyState::Unloaded, Vec::new()),
    };

    let idx = entries.len();

    entries.push(CommentEntry::new(item, depth, parent, is_op, state));

    let child_indices = children
      .into_iter()
      .map(|child| {
        Self::push_node(entries, child, Some(idx), depth.saturating_add(1), op)
      })
      .collect::<Vec<_>>();

    if let Some(entry) = entries.get_mut(idx) {
      entry.children = child_indices;
    }

    idx
  }

  pub(crate) fn select_index_at(&mut self, pos: usize) {
    let (visible, _) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let index = pos.min(visible.len().saturating_sub(1));

    self.selected = Some(visible[index]);
  }

  pub(crate) fn select_next(&mut self) {
    let (visible, selected_pos) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let current = selected_pos.unwrap_or(0);
    let next = (current + 1).min(visible.len().saturating_sub(1));

    self.selected = Some(visible[next]);
  }

  pub(crate) fn select_previous(&mut self) {
    let (visible, selected_pos) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let current = selected_pos.unwrap_or(0);
    let previous = current.saturating_sub(1);

    self.selected = Some(visible[previous]);
  }

  pub(crate) fn selected_can_load_replies(&self) -> bool {
    self.selected_entry().is_some_and(CommentEntry::can_load_replies)
  }

  pub(crate) fn selected_comment_link(&self) -> Option<String> {
    self
      .selected_entry()
      .filter(|entry| entry.parent.is_some())
      .map(CommentEntry::permalink)
  }

  pub(crate) fn selected_entry(&self) -> Option<&CommentEntry> {
    self.selected.and_then(|selected| self.entries.get(selected))
  }

  /// Hides or shows the selected entry's body and replies. Purely local.
  pub(crate) fn toggle_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
    {
      entry.expanded = !entry.expanded;
    }

    self.ensure_selection_visible();
  }

  /// Entries in display order: a pre-order walk following original reply
  /// order, skipping replies of collapsed entries.
  pub(crate) fn visible_indexes(&self) -> Vec<usize> {
    let mut visible = Vec::new();

    let mut stack = self
      .entries
      .iter()
      .enumerate()
      .filter(|(_, entry)| entry.parent.is_none())
      .map(|(idx, _)| idx)
      .rev()
      .collect::<Vec<_>>();

    while let Some(idx) = stack.pop() {
      let Some(entry) = self.entries.get(idx) else {
        continue;
      };

      visible.push(idx);

      if entry.expanded {
        stack.extend(entry.children.iter().rev().copied());
      }
    }

    visible
  }

  pub(crate) fn visible_with_selection(&self) -> (Vec<usize>, Option<usize>) {
    let visible = self.visible_indexes();

    let selected_pos = self
      .selected
      .and_then(|selected| visible.iter().position(|&idx| idx == selected));

    (visible, selected_pos)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: u64, by: &str, kids: Vec<u64>) -> Item {
    Item {
      by: Some(by.to_string()),
      id,
      kids,
      text: Some(format!("comment {id}")),
      ..Item::default()
    }
  }

  fn loaded(id: u64, by: &str, children: Vec<Node>) -> Node {
    let kids = children.iter().map(|child| child.item.id).collect();
    Node::loaded(item(id, by, kids), children)
  }

  /// story(1) -> [2 -> [3], 4 (unloaded, kids [5, 6])]
  fn make_view() -> CommentView {
    let unloaded = Node::unloaded(item(4, "op", vec![5, 6]));

    let story = loaded(
      1,
      "op",
      vec![loaded(2, "user2", vec![loaded(3, "user3", Vec::new())]), unloaded],
    );

    CommentView::new(CommentThread::from(story), "fallback".to_string(), 7)
  }

  fn ids(view: &CommentView) -> Vec<u64> {
    view
      .visible_indexes()
      .into_iter()
      .map(|idx| view.entries[idx].item.id)
      .collect()
  }

  #[test]
  fn new_flattens_tree_in_reply_order() {
    let view = make_view();

    assert_eq!(ids(&view), vec![1, 2, 3, 4]);
    assert_eq!(view.selected, Some(0));
    assert_eq!(view.link(), "fallback");
    assert_eq!(view.item_id, 1);
    assert_eq!(view.entries[2].depth, 2);
  }

  #[test]
  fn replies_by_story_author_are_marked() {
    let view = make_view();

    assert!(!view.entries[0].op);
    assert!(!view.entries[1].op);
    assert!(view.entries[3].op);
  }

  #[test]
  fn toggle_selected_collapses_and_expands_comments() {
    let mut view = make_view();
    view.select_index_at(1);

    view.toggle_selected();
    assert!(!view.entries[1].expanded);
    assert_eq!(ids(&view), vec![1, 2, 4]);

    view.toggle_selected();
    assert!(view.entries[1].expanded);
    assert_eq!(ids(&view), vec![1, 2, 3, 4]);
  }

  #[test]
  fn collapse_selected_moves_to_parent_when_leaf_selected() {
    let mut view = make_view();
    view.select_index_at(2);
    assert_eq!(view.selected, Some(2));

    view.collapse_selected();
    assert_eq!(view.selected, Some(1));
  }

  #[test]
  fn leaf_and_unloaded_comments_collapse_in_place() {
    let mut view = make_view();

    for index in [2, 3] {
      view.select_index_at(index);
      let selected = view.selected;

      view.collapse_selected();
      assert_eq!(view.selected, selected);
      assert!(!view.entries[index].expanded);

      view.expand_selected();
      assert_eq!(view.selected, selected);
      assert!(view.entries[index].expanded);
    }
  }

  #[test]
  fn expand_selected_moves_into_first_child() {
    let mut view = make_view();
    view.select_index_at(1);

    view.expand_selected();
    assert_eq!(view.selected, Some(2));
  }

  #[test]
  fn ensure_selection_visible_promotes_hidden_selection() {
    let mut view = make_view();
    view.select_index_at(2);
    view.entries[1].expanded = false;
    view.ensure_selection_visible();
    assert_eq!(view.selected, Some(1));
  }

  #[test]
  fn begin_loading_selected_only_fires_for_unloaded_replies() {
    let mut view = make_view();

    view.select_index_at(1);
    assert!(view.begin_loading_selected().is_none());

    view.select_index_at(3);
    assert!(view.selected_can_load_replies());

    let (index, item) = view.begin_loading_selected().unwrap();
    assert_eq!(index, 3);
    assert_eq!(item.kids, vec![5, 6]);
    assert_eq!(view.entries[3].replies, ReplyState::Loading);

    assert!(view.begin_loading_selected().is_none());
  }

  #[test]
  fn attach_replies_links_children_without_disturbing_ancestors() {
    let mut view = make_view();
    view.select_index_at(3);
    let (index, _) = view.begin_loading_selected().unwrap();

    let attached = view.attach_replies(
      index,
      vec![
        Node::loaded(item(5, "op", Vec::new()), Vec::new()),
        Node::loaded(item(6, "user6", Vec::new()), Vec::new()),
      ],
    );

    assert!(attached);
    assert_eq!(ids(&view), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(view.entries[3].replies, ReplyState::Loaded);
    assert_eq!(view.entries[4].depth, 2);
    assert!(view.entries[4].op);
    assert_eq!(view.entries[1].children, vec![2]);
  }

  #[test]
  fn attaching_twice_does_not_duplicate_replies() {
    let mut view = make_view();
    view.select_index_at(3);
    let (index, _) = view.begin_loading_selected().unwrap();

    let replies = vec![Node::loaded(item(5, "user5", Vec::new()), Vec::new())];

    assert!(view.attach_replies(index, replies.clone()));
    assert!(!view.attach_replies(index, replies));

    assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn replies_appended_mid_thread_render_before_later_siblings() {
    let story = loaded(
      1,
      "op",
      vec![
        Node::unloaded(item(2, "user2", vec![3])),
        loaded(4, "user4", Vec::new()),
      ],
    );

    let mut view =
      CommentView::new(CommentThread::from(story), "fallback".to_string(), 0);

    view.select_index_at(1);
    let (index, _) = view.begin_loading_selected().unwrap();

    view.attach_replies(
      index,
      vec![Node::loaded(item(3, "user3", Vec::new()), Vec::new())],
    );

    assert_eq!(ids(&view), vec![1, 2, 3, 4]);
  }

  #[test]
  fn selected_comment_link_uses_permalink() {
    let mut view = make_view();

    assert_eq!(view.selected_comment_link(), None);

    view.select_index_at(1);

    assert_eq!(
      view.selected_comment_link().as_deref(),
      Some("https://news.ycombinator.com/item?id=2")
    );
  }

  #[test]
  fn visible_indexes_respect_collapsed_ancestors() {
    let mut view = make_view();
    view.entries[0].expanded = false;
    assert_eq!(view.visible_indexes(), vec![0]);
  }
}
