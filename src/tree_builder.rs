use super::*;

/// Fetches comment trees, hydrating replies down to an auto-expand depth and
/// leaving deeper subtrees for lazy expansion.
pub(crate) struct TreeBuilder<S> {
  concurrency: usize,
  source: S,
}

impl<S: ItemSource> TreeBuilder<S> {
  /// Fetches `root_id` and grows its subtree. Returns `None` when the root
  /// cannot be fetched or is dead; failures further down drop that reply.
  pub(crate) async fn build(
    &self,
    root_id: u64,
    depth: usize,
    max_auto_depth: usize,
  ) -> Option<Node> {
    let item = match self.source.item(root_id).await {
      Ok(item) if item.is_live() => item,
      Ok(_) => {
        debug!(root_id, "thread root is dead or deleted");
        return None;
      }
      Err(error) => {
        warn!(root_id, %error, "thread root unavailable");
        return None;
      }
    };

    Some(self.grow(item, depth, max_auto_depth).await)
  }

  /// Loads the replies of an already fetched node that was left unloaded,
  /// counting depth from that node.
  pub(crate) async fn expand_subtree(
    &self,
    item: &Item,
    max_auto_depth: usize,
  ) -> Vec<Node> {
    self.hydrate(&item.kids, 0, max_auto_depth).await
  }

  fn grow(
    &self,
    item: Item,
    depth: usize,
    max_auto_depth: usize,
  ) -> BoxFuture<'_, Node> {
    Box::pin(async move {
      if item.kids.is_empty() {
        return Node::loaded(item, Vec::new());
      }

      if depth >= max_auto_depth {
        return Node::unloaded(item);
      }

      let children = self.hydrate(&item.kids, depth, max_auto_depth).await;

      Node::loaded(item, children)
    })
  }

  async fn hydrate(
    &self,
    kids: &[u64],
    depth: usize,
    max_auto_depth: usize,
  ) -> Vec<Node> {
    let ids = unique_ids(kids);

    let fetched =
      fetch_all(ids.clone(), self.concurrency, |id| self.source.item(id))
        .await;

    let live = ids
      .into_iter()
      .zip(fetched)
      .filter_map(|(id, result)| match result {
        Ok(item) if item.is_live() => Some(item),
        Ok(_) => None,
        Err(error) => {
          debug!(id, %error, "dropping reply");
          None
        }
      })
      .collect::<Vec<_>>();

    let next_depth = depth.saturating_add(1);

    stream::iter(
      live
        .into_iter()
        .map(|child| self.grow(child, next_depth, max_auto_depth)),
    )
    .buffered(self.concurrency.max(1))
    .collect()
    .await
  }

  pub(crate) fn new(source: S, concurrency: usize) -> Self {
    Self {
      concurrency,
      source,
    }
  }
}

fn unique_ids(kids: &[u64]) -> Vec<u64> {
  let mut seen = HashSet::with_capacity(kids.len());

  let ids = kids
    .iter()
    .copied()
    .filter(|id| seen.insert(*id))
    .collect::<Vec<_>>();

  if ids.len() != kids.len() {
    warn!(
      duplicates = kids.len() - ids.len(),
      "reply list contains duplicate ids"
    );
  }

  ids
}

#[cfg(test)]
mod tests {
  use super::*;

  fn comment(id: u64, kids: Vec<u64>) -> Item {
    Item {
      by: Some(format!("user{id}")),
      id,
      kids,
      text: Some(format!("comment {id}")),
      ..Item::default()
    }
  }

  fn ids(nodes: &[Node]) -> Vec<u64> {
    nodes.iter().map(|node| node.item.id).collect()
  }

  fn builder(items: Vec<Item>) -> TreeBuilder<FakeSource> {
    let source = FakeSource::default();

    for item in items {
      source.insert(item);
    }

    TreeBuilder::new(source, 15)
  }

  #[tokio::test]
  async fn missing_root_yields_none() {
    let builder = builder(Vec::new());

    assert_eq!(builder.build(1, 0, 3).await, None);
  }

  #[tokio::test]
  async fn dead_or_deleted_root_yields_none() {
    let builder = builder(vec![
      Item {
        dead: true,
        ..comment(1, vec![3])
      },
      Item {
        deleted: true,
        ..comment(2, Vec::new())
      },
      comment(3, Vec::new()),
    ]);

    assert_eq!(builder.build(1, 0, 3).await, None);
    assert_eq!(builder.build(2, 0, 3).await, None);
    assert_eq!(builder.source.calls(), vec![1, 2]);
  }

  #[tokio::test]
  async fn root_without_children_has_empty_loaded_replies() {
    let builder = builder(vec![comment(1, Vec::new())]);

    let root = builder.build(1, 0, 3).await.unwrap();

    assert_eq!(root.replies, Replies::Loaded(Vec::new()));
  }

  #[tokio::test]
  async fn root_at_depth_limit_stays_unloaded() {
    let builder = builder(vec![comment(1, vec![2]), comment(2, Vec::new())]);

    let root = builder.build(1, 3, 3).await.unwrap();

    assert_eq!(root.replies, Replies::Unloaded);
    assert_eq!(root.item.kids, vec![2]);
    assert_eq!(builder.source.calls(), vec![1]);
  }

  #[tokio::test]
  async fn zero_auto_depth_fetches_only_the_root() {
    let builder = builder(vec![comment(1, vec![2]), comment(2, Vec::new())]);

    let root = builder.build(1, 0, 0).await.unwrap();

    assert!(!root.is_loaded());
    assert_eq!(builder.source.calls(), vec![1]);
  }

  #[tokio::test]
  async fn dead_and_failed_children_are_dropped_in_order() {
    let builder = builder(vec![
      comment(1, vec![10, 11, 12, 13]),
      Item {
        dead: true,
        ..comment(10, Vec::new())
      },
      comment(11, Vec::new()),
      Item {
        deleted: true,
        ..comment(13, Vec::new())
      },
    ]);

    let root = builder.build(1, 0, 1).await.unwrap();

    assert_eq!(root.children().map(ids), Some(vec![11]));
  }

  #[tokio::test]
  async fn transport_failures_are_dropped_like_missing_items() {
    let builder = builder(vec![
      comment(1, vec![2, 3]),
      comment(2, Vec::new()),
      comment(3, Vec::new()),
    ]);

    builder.source.fail(2);

    let root = builder.build(1, 0, 3).await.unwrap();

    assert_eq!(root.children().map(ids), Some(vec![3]));
  }

  #[tokio::test]
  async fn all_dead_children_yield_empty_loaded_replies() {
    let builder = builder(vec![
      comment(1, vec![2]),
      Item {
        dead: true,
        ..comment(2, Vec::new())
      },
    ]);

    let root = builder.build(1, 0, 3).await.unwrap();

    assert_eq!(root.replies, Replies::Loaded(Vec::new()));
  }

  #[tokio::test]
  async fn chain_is_hydrated_down_to_auto_depth() {
    let builder = builder(vec![
      comment(1, vec![2, 3]),
      comment(2, vec![4]),
      comment(3, Vec::new()),
      comment(4, vec![5]),
      comment(5, vec![6]),
      comment(6, Vec::new()),
    ]);

    let root = builder.build(1, 0, 3).await.unwrap();

    let level_one = root.children().unwrap();
    assert_eq!(ids(level_one), vec![2, 3]);

    let level_two = level_one[0].children().unwrap();
    assert_eq!(ids(level_two), vec![4]);

    let level_three = level_two[0].children().unwrap();
    assert_eq!(ids(level_three), vec![5]);

    assert_eq!(level_three[0].replies, Replies::Unloaded);
    assert!(!builder.source.calls().contains(&6));
  }

  #[tokio::test]
  async fn expand_subtree_loads_children_in_order() {
    let builder = builder(vec![
      comment(1, vec![2]),
      comment(2, vec![3, 4]),
      comment(3, Vec::new()),
      comment(4, Vec::new()),
    ]);

    let root = builder.build(1, 0, 1).await.unwrap();

    let pending = &root.children().unwrap()[0];
    assert_eq!(pending.replies, Replies::Unloaded);

    let first = builder.expand_subtree(&pending.item, 1).await;
    let second = builder.expand_subtree(&pending.item, 1).await;

    assert_eq!(ids(&first), vec![3, 4]);
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn expand_subtree_resets_depth_to_the_expanded_node() {
    let builder = builder(vec![
      comment(1, vec![2]),
      comment(2, vec![3]),
      comment(3, Vec::new()),
    ]);

    let root = Node::unloaded(comment(1, vec![2]));

    let children = builder.expand_subtree(&root.item, 2).await;

    assert_eq!(ids(&children), vec![2]);
    assert_eq!(children[0].children().map(ids), Some(vec![3]));
  }

  #[tokio::test]
  async fn duplicate_child_ids_are_fetched_once() {
    let builder = builder(vec![comment(1, vec![2, 2]), comment(2, Vec::new())]);

    let root = builder.build(1, 0, 3).await.unwrap();

    assert_eq!(root.children().map(ids), Some(vec![2]));
    assert_eq!(builder.source.calls(), vec![1, 2]);
  }

  #[tokio::test]
  async fn wide_threads_respect_the_concurrency_limit() {
    let source = FakeSource::default().with_latency(Duration::from_millis(2));

    source.insert(comment(1, (100..200).collect()));

    for id in 100..200 {
      source.insert(comment(id, Vec::new()));
    }

    let builder = TreeBuilder::new(source, 15);

    let root = builder.build(1, 0, 3).await.unwrap();

    assert_eq!(root.children().map(<[Node]>::len), Some(100));
    assert!(builder.source.peak() <= 15);
  }

  #[test]
  fn unique_ids_keeps_first_occurrence() {
    assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
  }
}
