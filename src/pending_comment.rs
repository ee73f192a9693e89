pub(crate) struct PendingComment {
  pub(crate) comment_link: String,
  pub(crate) item_id: u64,
  pub(crate) request_id: u64,
}
