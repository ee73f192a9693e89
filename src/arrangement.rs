use super::*;

const TOP_STEPS: [usize; 3] = [10, 20, 30];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SortKey {
  Comments,
  #[default]
  Rank,
  Score,
  Time,
}

impl SortKey {
  /// Highest first for everything but rank; equal entries keep rank order.
  fn compare(self, a: &ListEntry, b: &ListEntry) -> Ordering {
    let primary = match self {
      Self::Comments => b.comments.cmp(&a.comments),
      Self::Rank => Ordering::Equal,
      Self::Score => b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0)),
      Self::Time => b.time.cmp(&a.time),
    };

    primary.then(a.rank.cmp(&b.rank))
  }

  pub(crate) fn label(self) -> &'static str {
    match self {
      Self::Comments => "comments",
      Self::Rank => "rank",
      Self::Score => "points",
      Self::Time => "newest",
    }
  }
}

/// How a story list is ordered and trimmed for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Arrangement {
  pub(crate) sort: SortKey,
  pub(crate) top: Option<usize>,
}

impl Arrangement {
  pub(crate) fn describe(self) -> String {
    match self.top {
      Some(top) => {
        format!("Sorted by {}, top {top} by points", self.sort.label())
      }
      None => format!("Sorted by {}", self.sort.label()),
    }
  }

  pub(crate) fn next_top(self) -> Option<usize> {
    match self.top {
      None => TOP_STEPS.first().copied(),
      Some(top) => TOP_STEPS.iter().copied().find(|step| *step > top),
    }
  }

  /// Indexes of `entries` to show, in display order. Stories without a
  /// score are never filtered out.
  pub(crate) fn order(self, entries: &[ListEntry]) -> Vec<usize> {
    let threshold = self.threshold(entries);

    let mut order = entries
      .iter()
      .enumerate()
      .filter(|(_, entry)| entry.score.is_none_or(|score| score >= threshold))
      .map(|(index, _)| index)
      .collect::<Vec<_>>();

    order.sort_by(|&a, &b| self.sort.compare(&entries[a], &entries[b]));

    order
  }

  pub(crate) fn short_label(self) -> Option<String> {
    match (self.sort, self.top) {
      (SortKey::Rank, None) => None,
      (sort, None) => Some(sort.label().to_string()),
      (sort, Some(top)) => Some(format!("{}, top {top}", sort.label())),
    }
  }

  fn threshold(self, entries: &[ListEntry]) -> u64 {
    let Some(top) = self.top.filter(|top| *top > 0) else {
      return 0;
    };

    let mut scores = entries
      .iter()
      .map(|entry| entry.score.unwrap_or(0))
      .collect::<Vec<_>>();

    if top >= scores.len() {
      return 0;
    }

    scores.sort_unstable_by(|a, b| b.cmp(a));

    scores[top - 1]
  }
}
