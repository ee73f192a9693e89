use super::*;

pub(crate) struct App {
  client: Client,
  event_rx: UnboundedReceiver<Event>,
  event_tx: UnboundedSender<Event>,
  handle: Handle,
  state: State,
}

impl App {
  fn comment_list_item(
    entry: &CommentEntry,
    available_width: u16,
    now: u64,
  ) -> ListItem<'static> {
    let color = THREAD_COLORS[entry.color_index()];

    let depth_indent = "  ".repeat(entry.depth.min(MAX_INDENT_DEPTH));

    let indent = format!("{BASE_INDENT}{depth_indent}");

    let bar = if entry.parent.is_some() { "▎" } else { "" };

    let prefix = || {
      vec![
        Span::raw(indent.clone()),
        Span::styled(bar, Style::default().fg(color)),
      ]
    };

    let toggle = entry.is_collapsible().then_some(if entry.expanded {
      "[-] "
    } else {
      "[+] "
    });

    let mut header = prefix();

    if let Some(symbol) = toggle {
      header.push(Span::raw(symbol));
    }

    let header_style = if entry.parent.is_none() {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else if entry.op {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(color)
    };

    header.push(Span::styled(entry.header(now), header_style));

    let mut lines = vec![Line::from(header)];

    if let Some(summary) = entry.summary(now) {
      let mut line = prefix();
      line.push(Span::styled(summary, Style::default().fg(Color::DarkGray)));
      lines.push(Line::from(line));
    }

    let prefix_width = indent.chars().count() + bar.chars().count();

    let wrap_width = usize::from(available_width)
      .saturating_sub(prefix_width)
      .max(1);

    if entry.expanded {
      for paragraph in entry.body().lines() {
        if paragraph.trim().is_empty() {
          lines.push(Line::from(prefix()));
          continue;
        }

        for text in wrap_text(paragraph, wrap_width) {
          let mut line = prefix();
          line.push(Span::styled(text, Style::default().fg(Color::Gray)));
          lines.push(Line::from(line));
        }
      }
    }

    if let Some(label) = entry.replies_label().filter(|_| entry.expanded) {
      let mut line = prefix();
      line.push(Span::styled(
        format!("[{label}]"),
        Style::default().fg(Color::Cyan),
      ));
      lines.push(Line::from(line));
    }

    if entry.is_empty_thread() {
      let mut line = prefix();
      line.push(Span::styled(
        "No comments yet.",
        Style::default().fg(Color::DarkGray),
      ));
      lines.push(Line::from(line));
    }

    lines.push(Line::from(Span::raw(indent)));

    ListItem::new(lines)
  }

  fn draw(&mut self, frame: &mut Frame) {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .margin(1)
      .constraints([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
      ])
      .split(frame.area());

    self.state.set_list_height(layout[1].height as usize);

    let tabs = self.state.tabs();
    let active_tab = self.state.resolved_active_tab().unwrap_or(0);

    let tab_titles: Vec<Line> = tabs
      .iter()
      .map(|tab| Line::from(tab.title()))
      .collect();

    let tabs_widget = Tabs::new(tab_titles)
      .select(active_tab)
      .style(Style::default().fg(Color::DarkGray))
      .highlight_style(
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      )
      .divider(Span::raw(" "));

    frame.render_widget(tabs_widget, layout[0]);

    let is_loading = tabs.get(active_tab).is_some_and(|tab| tab.loading);

    let now = unix_now();

    let (list_items, selected_index, offset) = match self.state.mode_mut() {
      Mode::List(view) => {
        let selected_index = view.selected_index();
        let offset = view.offset();

        let list_items: Vec<ListItem> = if view.is_empty() {
          let text = if is_loading {
            LOADING_ENTRIES_STATUS
          } else {
            "Nothing to show. Try another tab."
          };

          vec![ListItem::new(Line::from(vec![
            Span::raw(BASE_INDENT),
            Span::raw(text),
          ]))]
        } else {
          view
            .visible()
            .map(|entry| {
              let mut lines = vec![Line::from(vec![
                Span::raw(BASE_INDENT),
                Span::styled(
                  entry.title.clone(),
                  Style::default().fg(Color::White),
                ),
              ])];

              if let Some(detail) = &entry.detail {
                lines.push(Line::from(vec![
                  Span::raw(BASE_INDENT),
                  Span::styled(
                    detail.clone(),
                    Style::default().fg(Color::DarkGray),
                  ),
                ]));
              }

              lines.push(Line::from(Span::raw(BASE_INDENT)));

              ListItem::new(lines)
            })
            .collect()
        };

        (list_items, selected_index, offset)
      }
      Mode::Comments(view) => {
        let (visible, selected_pos) = view.visible_with_selection();

        let list_items: Vec<ListItem> = visible
          .iter()
          .map(|&idx| {
            Self::comment_list_item(&view.entries[idx], layout[1].width, now)
          })
          .collect();

        let offset = view.offset.min(selected_pos.unwrap_or(0));

        (list_items, selected_pos, offset)
      }
    };

    let mut list_state = ListState::default()
      .with_selected(selected_index)
      .with_offset(offset);

    let list = List::new(list_items)
      .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
      .highlight_symbol("");

    frame.render_stateful_widget(list, layout[1], &mut list_state);

    self.state.mode_mut().set_offset(list_state.offset());

    let status = Paragraph::new(self.state.message().to_string())
      .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, layout[2]);

    self.state.help().draw(frame);
  }

  fn execute_effect(&mut self, effect: Effect) {
    match effect {
      Effect::ClearCache => self.client.clear_cache(),
      Effect::FetchComments {
        item_id,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        self.handle.spawn(async move {
          let _ = sender.send(Event::Comments {
            request_id,
            result: client.fetch_thread(item_id).await,
          });
        });
      }
      Effect::FetchReplies {
        entry,
        item,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        self.handle.spawn(async move {
          let _ = sender.send(Event::Replies {
            entry,
            replies: client.expand_replies(item).await,
            request_id,
          });
        });
      }
      Effect::FetchTabItems {
        tab_index,
        category,
        offset,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        self.handle.spawn(async move {
          let page_size = client.config().page_size;

          let _ = sender.send(Event::TabItems {
            tab_index,
            result: client.fetch_stories(category, offset, page_size).await,
          });
        });
      }
      Effect::OpenUrl { url } => match webbrowser::open(&url) {
        Ok(()) => {
          self.state.set_transient_message(format!(
            "Opened in browser: {}",
            truncate(&url, 80)
          ));
        }
        Err(error) => {
          warn!(%url, %error, "could not open link");

          self
            .state
            .set_transient_message(format!("Could not open link: {error}"));
        }
      },
    }
  }

  pub(crate) fn new(
    client: Client,
    tabs: Vec<(Tab, ListView<ListEntry>)>,
  ) -> Self {
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let state = State::new(tabs);

    Self {
      client,
      event_rx,
      event_tx,
      handle: Handle::current(),
      state,
    }
  }

  fn process_pending_events(&mut self) {
    self.state.update_transient_message();

    while let Ok(event) = self.event_rx.try_recv() {
      self.state.handle_event(event);
    }
  }

  pub(crate) fn run(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
  ) -> Result {
    loop {
      self.process_pending_events();

      terminal.draw(|frame| self.draw(frame))?;

      if !crossterm_event::poll(Duration::from_millis(200))? {
        self.process_pending_events();
        continue;
      }

      let CrosstermEvent::Key(key) = crossterm_event::read()? else {
        self.process_pending_events();
        continue;
      };

      if key.kind != KeyEventKind::Press {
        self.process_pending_events();
        continue;
      }

      let command = if self.state.help_is_visible() {
        self.state.help_mut().handle_key(key)
      } else {
        let page = self.state.list_height().max(1);
        self.state.mode_mut().handle_key(key, page)
      };

      match self.state.dispatch_command(command) {
        Ok(dispatch) => {
          for effect in dispatch.effects {
            self.execute_effect(effect);
          }

          if dispatch.should_exit {
            break;
          }

          self.process_pending_events();
        }
        Err(error) => {
          self.state.clear_pending_effects();
          self.state.set_transient_message(format!("error: {error}"));
          self.process_pending_events();
        }
      }
    }

    Ok(())
  }
}
