/// A scrollable list whose display order can differ from load order.
///
/// `selected` and `offset` are positions in `order`, which holds indexes
/// into `items`. Entries left out of `order` stay loaded but hidden.
pub(crate) struct ListView<T> {
  items: Vec<T>,
  offset: usize,
  order: Vec<usize>,
  selected: usize,
}

impl<T> Default for ListView<T> {
  fn default() -> Self {
    Self::new(Vec::new())
  }
}

impl<T> ListView<T> {
  /// Replaces the display order, keeping the selected entry selected when it
  /// is still shown.
  pub(crate) fn arrange<F>(&mut self, order: F)
  where
    F: FnOnce(&[T]) -> Vec<usize>,
  {
    let selected = self.selected_slot();

    self.order = order(&self.items);
    self.order.retain(|&slot| slot < self.items.len());

    self.selected = selected
      .and_then(|slot| self.order.iter().position(|&other| other == slot))
      .unwrap_or(0);

    self.offset = self.offset.min(self.selected);
  }

  pub(crate) fn clear(&mut self) {
    *self = Self::default();
  }

  /// Appends entries at the end of the display order.
  pub(crate) fn extend<I>(&mut self, items: I)
  where
    I: IntoIterator<Item = T>,
  {
    let start = self.items.len();

    self.items.extend(items);

    self.order.extend(start..self.items.len());
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub(crate) fn len(&self) -> usize {
    self.order.len()
  }

  /// Number of entries held, shown or not.
  pub(crate) fn loaded(&self) -> usize {
    self.items.len()
  }

  pub(crate) fn new(items: Vec<T>) -> Self {
    Self {
      order: (0..items.len()).collect(),
      items,
      offset: 0,
      selected: 0,
    }
  }

  pub(crate) fn offset(&self) -> usize {
    self
      .selected_index()
      .map_or(0, |selected| self.offset.min(selected))
  }

  pub(crate) fn selected_index(&self) -> Option<usize> {
    (!self.order.is_empty()).then(|| self.selected.min(self.order.len() - 1))
  }

  pub(crate) fn selected_item(&self) -> Option<&T> {
    self.selected_slot().and_then(|slot| self.items.get(slot))
  }

  pub(crate) fn selected_raw(&self) -> usize {
    self.selected
  }

  fn selected_slot(&self) -> Option<usize> {
    self
      .selected_index()
      .and_then(|index| self.order.get(index).copied())
  }

  pub(crate) fn set_offset(&mut self, offset: usize) {
    self.offset = offset.min(self.order.len().saturating_sub(1));
  }

  pub(crate) fn set_selected(&mut self, index: usize) {
    self.selected = index.min(self.order.len().saturating_sub(1));
  }

  pub(crate) fn visible(&self) -> impl Iterator<Item = &T> {
    self.order.iter().filter_map(|&slot| self.items.get(slot))
  }
}
