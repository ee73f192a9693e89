use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListEntry {
  pub(crate) comments: u64,
  pub(crate) detail: Option<String>,
  pub(crate) id: u64,
  pub(crate) rank: usize,
  pub(crate) score: Option<u64>,
  pub(crate) time: u64,
  pub(crate) title: String,
  pub(crate) url: Option<String>,
}

impl From<Item> for ListEntry {
  fn from(item: Item) -> Self {
    Self::from_item(item, unix_now())
  }
}

impl ListEntry {
  pub(crate) fn from_item(item: Item, now: u64) -> Self {
    let mut parts = Vec::new();

    match (item.score, item.by.as_deref()) {
      (Some(score), Some(by)) => {
        parts.push(format!("{} by {by}", format_points(score)));
      }
      (Some(score), None) => parts.push(format_points(score)),
      (None, Some(by)) => parts.push(format!("by {by}")),
      (None, None) => {}
    }

    if let Some(time) = item.time {
      parts.push(format_age(now, time));
    }

    if let Some(descendants) = item.descendants {
      parts.push(pluralize(descendants, "comment"));
    }

    if let Some(domain) = item.url.as_deref().and_then(domain) {
      parts.push(domain);
    }

    let detail = if parts.is_empty() {
      item
        .text
        .as_deref()
        .map(sanitize_comment)
        .filter(|text| !text.is_empty())
        .map(|text| truncate(&text, 120))
    } else {
      Some(parts.join(" · "))
    };

    let title = item
      .title
      .clone()
      .unwrap_or_else(|| format!("Item {}", item.id));

    Self {
      comments: item.descendants.unwrap_or(0),
      detail,
      id: item.id,
      rank: 0,
      score: item.score,
      time: item.time.unwrap_or(0),
      title,
      url: item.url,
    }
  }

  pub(crate) fn permalink(&self) -> String {
    format!("https://news.ycombinator.com/item?id={}", self.id)
  }

  pub(crate) fn resolved_url(&self) -> String {
    self
      .url
      .clone()
      .filter(|url| !url.is_empty())
      .unwrap_or_else(|| self.permalink())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detail_joins_score_author_age_comments_and_domain() {
    let entry = ListEntry::from_item(
      Item {
        by: Some("dang".to_string()),
        descendants: Some(12),
        id: 1,
        score: Some(42),
        time: Some(1_000),
        title: Some("A story".to_string()),
        url: Some("https://www.example.com/post".to_string()),
        ..Item::default()
      },
      1_000 + 2 * 3600,
    );

    assert_eq!(entry.title, "A story");
    assert_eq!(
      entry.detail.as_deref(),
      Some("42 points by dang · 2h · 12 comments · example.com")
    );
  }

  #[test]
  fn text_only_items_fall_back_to_a_snippet() {
    let entry = ListEntry::from_item(
      Item {
        id: 9,
        text: Some("<p>Hello &amp; welcome</p>".to_string()),
        ..Item::default()
      },
      0,
    );

    assert_eq!(entry.title, "Item 9");
    assert_eq!(entry.detail.as_deref(), Some("Hello & welcome"));
  }

  #[test]
  fn resolved_url_prefers_story_link() {
    let mut entry = ListEntry::from_item(
      Item {
        id: 3,
        url: Some("https://example.com".to_string()),
        ..Item::default()
      },
      0,
    );

    assert_eq!(entry.resolved_url(), "https://example.com");

    entry.url = None;

    assert_eq!(
      entry.resolved_url(),
      "https://news.ycombinator.com/item?id=3"
    );
  }
}
