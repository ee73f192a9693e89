use super::*;

pub(crate) struct State {
  active_tab: usize,
  help: HelpView,
  list_height: usize,
  message: String,
  mode: Mode,
  next_request_id: u64,
  pending_comment: Option<PendingComment>,
  pending_effects: Vec<Effect>,
  tab_views: Vec<Option<ListView<ListEntry>>>,
  tabs: Vec<Tab>,
  transient_message: Option<TransientMessage>,
}

impl State {
  pub(crate) fn clear_pending_effects(&mut self) {
    self.pending_effects.clear();
  }

  fn close_comments(&mut self) {
    self.pending_comment = None;

    self.restore_active_list_view();

    if !self.help.is_visible() {
      self.message = LIST_STATUS.into();
    }
  }

  fn current_entry(&self) -> Option<&ListEntry> {
    self
      .list_view(self.active_tab)
      .and_then(|view| view.selected_item())
  }

  pub(crate) fn dispatch_command(
    &mut self,
    command: Command,
  ) -> Result<CommandDispatch> {
    debug_assert!(
      self.pending_effects.is_empty(),
      "command dispatch should start without pending effects"
    );

    let mut should_exit = false;

    let page = isize::try_from(self.list_height.saturating_sub(1).max(1))?;

    match command {
      Command::Quit => {
        should_exit = true;
      }
      Command::ShowHelp => self.help.show(&mut self.message),
      Command::HideHelp => self.help.hide(&mut self.message),
      Command::SwitchTabLeft => {
        self.switch_tab(self.tabs.len().saturating_sub(1));
      }
      Command::SwitchTabRight => self.switch_tab(1),
      Command::SelectNext => self.move_selection(1),
      Command::SelectPrevious => self.move_selection(-1),
      Command::PageDown => self.move_selection(page),
      Command::PageUp => self.move_selection(-page),
      Command::SelectFirst => {
        if let Some(tab_index) = self.resolved_active_tab() {
          self.select_index(tab_index, 0);
        }
      }
      Command::Sort(key) => self.rearrange(|arrangement| arrangement.sort = key),
      Command::Filter => {
        self.rearrange(|arrangement| arrangement.top = arrangement.next_top());
      }
      Command::OpenComments => self.open_comments(),
      Command::OpenCurrentInBrowser => self.open_current_in_browser(),
      Command::OpenCommentLink => self.open_comment_link(),
      Command::CloseComments => self.close_comments(),
      Command::LoadReplies => self.load_replies(),
      Command::ReloadComments => self.reload_comments(),
      Command::Refresh => self.refresh(),
      Command::None => {}
    }

    Ok(CommandDispatch {
      effects: std::mem::take(&mut self.pending_effects),
      should_exit,
    })
  }

  pub(crate) fn handle_event(&mut self, event: Event) {
    match event {
      Event::TabItems { tab_index, result } => {
        let Some(tab) = self.tabs.get_mut(tab_index) else {
          return;
        };

        tab.loading = false;

        let (arrangement, target) =
          (tab.arrangement, tab.pending_selection.take());

        match result {
          Ok(page) => {
            tab.has_more = page.has_more;

            if let Some(list) = self.list_view_mut(tab_index) {
              list.extend(page.entries);
              list.arrange(|entries| arrangement.order(entries));

              if let Some(target) = target {
                list.set_selected(target);
              }
            }

            if !self.help.is_visible() && matches!(self.mode, Mode::List(_)) {
              self.message = LIST_STATUS.into();
            }
          }
          Err(error) => {
            warn!(tab_index, error = %error, "could not load entries");

            if !self.help.is_visible() {
              self.set_transient_message(format!(
                "Could not load more entries: {error}"
              ));
            }
          }
        }
      }
      Event::Comments { request_id, result } => {
        let Some(pending) = self.pending_comment.as_ref() else {
          return;
        };

        if pending.request_id != request_id {
          return;
        }

        let Some(pending) = self.pending_comment.take() else {
          return;
        };

        match result {
          Ok(thread) => {
            let view =
              CommentView::new(thread, pending.comment_link, request_id);

            self.store_active_list_view();

            self.mode = Mode::Comments(view);

            if !self.help.is_visible() {
              self.message = COMMENTS_STATUS.into();
            }
          }
          Err(error) => {
            warn!(item_id = pending.item_id, error = %error, "could not load thread");

            if !self.help.is_visible() {
              self.set_transient_message(format!(
                "Could not load comments: {error} (press enter to retry)"
              ));
            }
          }
        }
      }
      Event::Replies {
        entry,
        replies,
        request_id,
      } => {
        let Mode::Comments(view) = &mut self.mode else {
          return;
        };

        if view.request_id != request_id {
          debug!(request_id, "discarding replies for a closed thread");
          return;
        }

        let count = replies.len();

        if view.attach_replies(entry, replies) && count == 0 {
          self.set_transient_message("No replies left to show".into());
        }
      }
    }
  }

  pub(crate) fn help(&self) -> &HelpView {
    &self.help
  }

  pub(crate) fn help_is_visible(&self) -> bool {
    self.help.is_visible()
  }

  pub(crate) fn help_mut(&mut self) -> &mut HelpView {
    &mut self.help
  }

  pub(crate) fn list_height(&self) -> usize {
    self.list_height
  }

  fn list_view(&self, index: usize) -> Option<&ListView<ListEntry>> {
    if index >= self.tabs.len() {
      return None;
    }

    if let Mode::List(view) = &self.mode
      && index == self.active_tab
    {
      return Some(view);
    }

    self.tab_views.get(index).and_then(|slot| slot.as_ref())
  }

  fn list_view_mut(
    &mut self,
    index: usize,
  ) -> Option<&mut ListView<ListEntry>> {
    if index >= self.tabs.len() {
      return None;
    }

    match &mut self.mode {
      Mode::List(view) if index == self.active_tab => Some(view),
      _ => self.tab_views.get_mut(index).and_then(|slot| slot.as_mut()),
    }
  }

  fn load_replies(&mut self) {
    let Mode::Comments(view) = &mut self.mode else {
      return;
    };

    let request_id = view.request_id;

    if let Some((entry, item)) = view.begin_loading_selected() {
      self.pending_effects.push(Effect::FetchReplies {
        entry,
        item,
        request_id,
      });
    }
  }

  pub(crate) fn message(&self) -> &str {
    &self.message
  }

  pub(crate) fn mode_mut(&mut self) -> &mut Mode {
    &mut self.mode
  }

  fn move_selection(&mut self, delta: isize) {
    let Some(tab_index) = self.resolved_active_tab() else {
      return;
    };

    let current = self
      .list_view(tab_index)
      .map_or(0, ListView::<ListEntry>::selected_raw);

    self.select_index(tab_index, current.saturating_add_signed(delta));
  }

  pub(crate) fn new(tabs: Vec<(Tab, ListView<ListEntry>)>) -> Self {
    let (tabs, mut tab_views): (Vec<Tab>, Vec<_>) = tabs
      .into_iter()
      .map(|(tab, view)| (tab, Some(view)))
      .unzip();

    let initial_view = tab_views
      .get_mut(0)
      .and_then(Option::take)
      .unwrap_or_default();

    Self {
      active_tab: 0,
      help: HelpView::new(),
      list_height: 0,
      message: LIST_STATUS.into(),
      mode: Mode::List(initial_view),
      next_request_id: 0,
      pending_comment: None,
      pending_effects: Vec::new(),
      tab_views,
      tabs,
      transient_message: None,
    }
  }

  fn next_request_id(&mut self) -> u64 {
    let request_id = self.next_request_id;

    self.next_request_id = self.next_request_id.wrapping_add(1);

    request_id
  }

  fn open_comment_link(&mut self) {
    if let Mode::Comments(view) = &self.mode {
      let url = view
        .selected_comment_link()
        .unwrap_or_else(|| view.link().to_string());

      self.pending_effects.push(Effect::OpenUrl { url });
    }
  }

  fn open_comments(&mut self) {
    let Some(entry) = self.current_entry() else {
      return;
    };

    let (item_id, comment_link) = (entry.id, entry.permalink());

    self.request_thread(item_id, comment_link);
  }

  fn open_current_in_browser(&mut self) {
    if let Some(entry) = self.current_entry() {
      self.pending_effects.push(Effect::OpenUrl {
        url: entry.resolved_url(),
      });
    }
  }

  /// Changes how the active tab is ordered and re-applies it to the stories
  /// already loaded.
  fn rearrange(&mut self, update: impl FnOnce(&mut Arrangement)) {
    let Some(tab_index) = self.resolved_active_tab() else {
      return;
    };

    let Some(tab) = self.tabs.get_mut(tab_index) else {
      return;
    };

    update(&mut tab.arrangement);

    let arrangement = tab.arrangement;

    if let Some(list) = self.list_view_mut(tab_index) {
      list.arrange(|entries| arrangement.order(entries));
    }

    self.set_transient_message(arrangement.describe());
  }

  /// Drops cached items and reloads the active tab from its first page.
  fn refresh(&mut self) {
    let Some(tab_index) = self.resolved_active_tab() else {
      return;
    };

    let Some(tab) = self.tabs.get_mut(tab_index) else {
      return;
    };

    if tab.loading {
      return;
    }

    tab.has_more = true;

    self.pending_effects.push(Effect::ClearCache);

    if let Some(list) = self.list_view_mut(tab_index) {
      list.clear();
    }

    self.start_load_for_tab(tab_index);
  }

  /// Rebuilds the open thread from its root, discarding the current tree.
  fn reload_comments(&mut self) {
    let Mode::Comments(view) = &self.mode else {
      return;
    };

    let (item_id, link) = (view.item_id, view.link().to_string());

    self.request_thread(item_id, link);
  }

  fn request_thread(&mut self, item_id: u64, comment_link: String) {
    if !self.help.is_visible() {
      self.message = LOADING_COMMENTS_STATUS.into();
    }

    let request_id = self.next_request_id();

    self.pending_comment = Some(PendingComment {
      comment_link,
      item_id,
      request_id,
    });

    self.pending_effects.push(Effect::FetchComments {
      item_id,
      request_id,
    });
  }

  pub(crate) fn resolved_active_tab(&self) -> Option<usize> {
    if self.tabs.is_empty() {
      None
    } else {
      Some(self.active_tab.min(self.tabs.len().saturating_sub(1)))
    }
  }

  fn restore_active_list_view(&mut self) {
    match self.tab_views.get_mut(self.active_tab).and_then(Option::take) {
      Some(view) => self.mode = Mode::List(view),
      None if !matches!(self.mode, Mode::List(_)) => {
        self.mode = Mode::List(ListView::default());
      }
      None => {}
    }
  }

  /// Selects the story at display position `target`, asking for the next
  /// page first when the position is past what is shown.
  fn select_index(&mut self, tab_index: usize, target: usize) {
    let shown = self.list_view(tab_index).map_or(0, ListView::len);

    let has_more = self.tabs.get(tab_index).is_some_and(|tab| tab.has_more);

    if target >= shown && has_more {
      if let Some(tab) = self.tabs.get_mut(tab_index) {
        tab.pending_selection = Some(target);
      }

      self.start_load_for_tab(tab_index);

      return;
    }

    if let Some(list) = self.list_view_mut(tab_index) {
      list.set_selected(target);
    }
  }

  pub(crate) fn set_list_height(&mut self, height: usize) {
    self.list_height = height;
  }

  pub(crate) fn set_transient_message(&mut self, message: String) {
    let original = self.transient_message.as_ref().map_or_else(
      || self.message.clone(),
      |transient| transient.original().to_string(),
    );

    self.transient_message =
      Some(TransientMessage::new(message.clone(), original));

    self.message = message;
  }

  /// Requests the page after everything loaded so far, hidden stories
  /// included.
  fn start_load_for_tab(&mut self, tab_index: usize) {
    let offset = self.list_view(tab_index).map_or(0, ListView::loaded);

    let Some(tab) = self.tabs.get_mut(tab_index) else {
      return;
    };

    if tab.loading || !tab.has_more {
      return;
    }

    tab.loading = true;

    let category = tab.category;

    if !self.help.is_visible() {
      self.message = LOADING_ENTRIES_STATUS.into();
    }

    self.pending_effects.push(Effect::FetchTabItems {
      tab_index,
      category,
      offset,
    });
  }

  fn store_active_list_view(&mut self) {
    if let Mode::List(view) = &mut self.mode
      && let Some(slot) = self.tab_views.get_mut(self.active_tab)
    {
      *slot = Some(std::mem::take(view));
    }
  }

  /// Moves `step` tabs to the right, wrapping around.
  fn switch_tab(&mut self, step: usize) {
    if self.tabs.is_empty() {
      return;
    }

    self.store_active_list_view();
    self.active_tab = (self.active_tab + step) % self.tabs.len();
    self.restore_active_list_view();
  }

  pub(crate) fn tabs(&self) -> &[Tab] {
    &self.tabs
  }

  pub(crate) fn update_transient_message(&mut self) {
    if let Some(transient) = self.transient_message.clone() {
      if self.message != transient.current() {
        self.transient_message = None;
      } else if transient.is_expired(Instant::now()) {
        self.message = transient.original().to_string();
        self.transient_message = None;
      }
    }
  }
}
