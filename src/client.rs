use super::*;

const ITEM_CACHE_CAPACITY: usize = 4096;

const LIST_CACHE_CAPACITY: usize = 16;

#[derive(Clone)]
pub(crate) struct Client {
  client: reqwest::Client,
  config: Arc<Config>,
  items: Arc<TtlCache<u64, Item>>,
  lists: Arc<TtlCache<&'static str, Vec<u64>>>,
}

#[async_trait]
impl ItemSource for Client {
  async fn item(&self, id: u64) -> Result<Item, FetchError> {
    if let Some(item) = self.items.get(&id) {
      trace!(id, "item cache hit");
      return Ok(item);
    }

    let url = format!("{}/item/{id}.json", self.config.api_base);

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|source| FetchError::Transport { id, source })?;

    let status = response.status();

    if !status.is_success() {
      return Err(FetchError::Status {
        id,
        status: status.as_u16(),
      });
    }

    let body = response
      .text()
      .await
      .map_err(|source| FetchError::Transport { id, source })?;

    let item = serde_json::from_str::<Option<Item>>(&body)
      .map_err(|source| FetchError::Malformed { id, source })?
      .ok_or(FetchError::NotFound { id })?;

    self.items.insert(id, item.clone());

    Ok(item)
  }
}

impl Client {
  pub(crate) fn clear_cache(&self) {
    self.items.clear();
    self.lists.clear();

    debug!("cleared item and story list caches");
  }

  pub(crate) fn config(&self) -> &Config {
    &self.config
  }

  pub(crate) async fn expand_replies(&self, item: Item) -> Vec<Node> {
    let children = self
      .tree_builder()
      .expand_subtree(&item, self.config.max_auto_depth)
      .await;

    debug!(
      id = item.id,
      loaded = children.len(),
      requested = item.kids.len(),
      "expanded replies"
    );

    children
  }

  pub(crate) async fn fetch_stories(
    &self,
    category: Category,
    offset: usize,
    count: usize,
  ) -> Result<Page> {
    let story_ids = self.story_ids(category).await.with_context(|| {
      format!("failed to load {} story ids", category.label)
    })?;

    let end = offset.saturating_add(count).min(story_ids.len());

    let page_ids = story_ids
      .get(offset..end)
      .map(<[u64]>::to_vec)
      .unwrap_or_default();

    let results =
      fetch_all(page_ids, self.config.concurrency, |id| self.item(id)).await;

    let entries = results
      .into_iter()
      .zip(offset + 1..)
      .filter_map(|(result, rank)| match result {
        Ok(item) => Some(ListEntry {
          rank,
          ..ListEntry::from(item)
        }),
        Err(error) => {
          debug!(%error, "dropping story from page");
          None
        }
      })
      .collect();

    Ok(Page {
      entries,
      has_more: end < story_ids.len(),
    })
  }

  pub(crate) async fn fetch_thread(&self, item_id: u64) -> Result<CommentThread> {
    let root = self
      .tree_builder()
      .build(item_id, 0, self.config.max_auto_depth)
      .await
      .with_context(|| format!("item {item_id} not found"))?;

    info!(item_id, "loaded thread");

    Ok(CommentThread::from(root))
  }

  pub(crate) async fn load_tabs(&self) -> Result<Vec<(Tab, ListView<ListEntry>)>> {
    let page_size = self.config.page_size;

    let tasks = Category::all().iter().map(|category| {
      let client = self.clone();

      let category = *category;

      async move {
        let page = client
          .fetch_stories(category, 0, page_size)
          .await
          .with_context(|| {
            format!("failed to load {} entries", category.label)
          })?;

        Ok::<_, anyhow::Error>((
          Tab::new(category, page.has_more),
          ListView::new(page.entries),
        ))
      }
    });

    join_all(tasks).await.into_iter().collect()
  }

  pub(crate) fn new(config: Config) -> Self {
    Self {
      client: reqwest::Client::new(),
      items: Arc::new(TtlCache::new(config.item_ttl, ITEM_CACHE_CAPACITY)),
      lists: Arc::new(TtlCache::new(config.list_ttl, LIST_CACHE_CAPACITY)),
      config: Arc::new(config),
    }
  }

  async fn story_ids(&self, category: Category) -> Result<Vec<u64>> {
    if let Some(ids) = self.lists.get(&category.endpoint) {
      trace!(endpoint = category.endpoint, "story list cache hit");
      return Ok(ids);
    }

    let ids = self
      .client
      .get(format!("{}/{}.json", self.config.api_base, category.endpoint))
      .send()
      .await?
      .error_for_status()?
      .json::<Vec<u64>>()
      .await?;

    self.lists.insert(category.endpoint, ids.clone());

    Ok(ids)
  }

  fn tree_builder(&self) -> TreeBuilder<Client> {
    TreeBuilder::new(self.clone(), self.config.concurrency)
  }
}
