use super::*;

pub(crate) struct Tab {
  pub(crate) arrangement: Arrangement,
  pub(crate) category: Category,
  pub(crate) has_more: bool,
  pub(crate) loading: bool,
  pub(crate) pending_selection: Option<usize>,
}

impl Tab {
  pub(crate) fn new(category: Category, has_more: bool) -> Self {
    Self {
      arrangement: Arrangement::default(),
      category,
      has_more,
      loading: false,
      pending_selection: None,
    }
  }

  pub(crate) fn title(&self) -> String {
    let label = self.category.label.to_uppercase();

    match self.arrangement.short_label() {
      Some(arrangement) => format!("{label} ({arrangement})"),
      None => label,
    }
  }
}
