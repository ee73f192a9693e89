use super::*;

#[derive(Clone, Debug)]
pub(crate) struct CommentThread {
  pub(crate) root: Node,
  pub(crate) url: Option<String>,
}

impl From<Node> for CommentThread {
  fn from(root: Node) -> Self {
    Self {
      url: root.item.url.clone().filter(|url| !url.is_empty()),
      root,
    }
  }
}
