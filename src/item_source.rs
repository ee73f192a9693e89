use super::*;

#[async_trait]
pub(crate) trait ItemSource: Send + Sync {
  async fn item(&self, id: u64) -> Result<Item, FetchError>;
}
