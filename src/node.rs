use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Replies {
  Loaded(Vec<Node>),
  Unloaded,
}

/// A fetched item together with whatever part of its subtree is in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
  pub(crate) item: Item,
  pub(crate) replies: Replies,
}

impl Node {
  pub(crate) fn loaded(item: Item, children: Vec<Node>) -> Self {
    Self {
      item,
      replies: Replies::Loaded(children),
    }
  }

  pub(crate) fn unloaded(item: Item) -> Self {
    Self {
      item,
      replies: Replies::Unloaded,
    }
  }
}

#[cfg(test)]
impl Node {
  pub(crate) fn children(&self) -> Option<&[Node]> {
    match &self.replies {
      Replies::Loaded(children) => Some(children),
      Replies::Unloaded => None,
    }
  }

  pub(crate) fn is_loaded(&self) -> bool {
    matches!(self.replies, Replies::Loaded(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: u64, kids: Vec<u64>) -> Item {
    Item {
      id,
      kids,
      ..Item::default()
    }
  }

  #[test]
  fn no_replies_and_unloaded_replies_are_distinct() {
    let empty = Node::loaded(item(1, Vec::new()), Vec::new());
    let pending = Node::unloaded(item(2, vec![3]));

    assert_eq!(empty.children(), Some(&[][..]));
    assert_eq!(pending.children(), None);
  }
}
