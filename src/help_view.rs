use super::*;

pub(crate) struct HelpView {
  message_backup: Option<String>,
  scroll: u16,
  visible: bool,
}

impl HelpView {
  pub(crate) fn draw(&self, frame: &mut Frame) {
    if !self.visible {
      return;
    }

    let area = Self::help_area(frame.area());

    frame.render_widget(Clear, area);

    let help = Paragraph::new(HELP_TEXT)
      .block(Block::default().title(HELP_TITLE).borders(Borders::ALL))
      .scroll((self.scroll, 0));

    frame.render_widget(help, area);
  }

  pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Command {
    match key.code {
      KeyCode::Char('?') | KeyCode::Esc => Command::HideHelp,
      KeyCode::Char('q' | 'Q') => Command::Quit,
      KeyCode::Down | KeyCode::Char('j') => {
        self.scroll = self.scroll.saturating_add(1).min(Self::max_scroll());
        Command::None
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.scroll = self.scroll.saturating_sub(1);
        Command::None
      }
      _ => Command::None,
    }
  }

  fn help_area(area: Rect) -> Rect {
    let max_line_width = HELP_TEXT
      .lines()
      .map(|line| line.chars().count())
      .max()
      .unwrap_or(0);

    let desired_width =
      u16::try_from(max_line_width.saturating_add(2)).unwrap_or(u16::MAX);

    let desired_height =
      u16::try_from(HELP_TEXT.lines().count().saturating_add(2))
        .unwrap_or(u16::MAX);

    let width = desired_width.min(area.width.saturating_sub(2)).max(1);
    let height = desired_height.min(area.height.saturating_sub(2)).max(1);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width, height)
  }

  pub(crate) fn hide(&mut self, message: &mut String) {
    if !self.visible {
      return;
    }

    if let Some(backup) = self.message_backup.take() {
      *message = backup;
    }

    self.visible = false;
  }

  pub(crate) fn is_visible(&self) -> bool {
    self.visible
  }

  fn max_scroll() -> u16 {
    u16::try_from(HELP_TEXT.lines().count().saturating_sub(1))
      .unwrap_or(u16::MAX)
  }

  pub(crate) fn new() -> Self {
    Self {
      message_backup: None,
      scroll: 0,
      visible: false,
    }
  }

  pub(crate) fn show(&mut self, message: &mut String) {
    if self.visible {
      return;
    }

    self.message_backup = Some(std::mem::replace(message, HELP_STATUS.into()));
    self.scroll = 0;
    self.visible = true;
  }
}
