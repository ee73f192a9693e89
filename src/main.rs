use {
  anyhow::Context,
  app::App,
  arguments::Arguments,
  arrangement::{Arrangement, SortKey},
  async_trait::async_trait,
  batch::fetch_all,
  category::Category,
  clap::Parser,
  client::Client,
  command::Command,
  command_dispatch::CommandDispatch,
  comment_entry::{CommentEntry, ReplyState},
  comment_thread::CommentThread,
  comment_view::CommentView,
  config::{Config, DEFAULT_API_BASE},
  crossterm::{
    event as crossterm_event,
    event::{
      Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    style::Stylize,
    terminal::{
      EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
      enable_raw_mode,
    },
  },
  effect::Effect,
  event::Event,
  fetch_error::FetchError,
  futures::{
    future::{BoxFuture, join_all},
    stream::{self, StreamExt},
  },
  help_view::HelpView,
  item::Item,
  item_source::ItemSource,
  list_entry::ListEntry,
  list_view::ListView,
  mode::Mode,
  node::{Node, Replies},
  page::Page,
  pending_comment::PendingComment,
  ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
  },
  serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected},
  },
  serde_json::Value,
  state::State,
  std::{
    backtrace::BacktraceStatus,
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fs,
    hash::Hash,
    io::{self, IsTerminal, Stdout},
    path::{Path, PathBuf},
    process,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
  },
  tab::Tab,
  thiserror::Error,
  tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  },
  tracing::{debug, info, trace, warn},
  tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
  },
  transient_message::TransientMessage,
  tree_builder::TreeBuilder,
  ttl_cache::TtlCache,
  utils::{
    deserialize_optional_string, domain, format_age, format_points,
    html_to_text, pluralize, sanitize_comment, truncate, unix_now, wrap_text,
  },
};

#[cfg(test)]
use fake_source::FakeSource;

mod app;
mod arguments;
mod arrangement;
mod batch;
mod category;
mod client;
mod command;
mod command_dispatch;
mod comment_entry;
mod comment_thread;
mod comment_view;
mod config;
mod effect;
mod event;
#[cfg(test)]
mod fake_source;
mod fetch_error;
mod help_view;
mod item;
mod item_source;
mod list_entry;
mod list_view;
mod logging;
mod mode;
mod node;
mod page;
mod pending_comment;
mod state;
mod tab;
mod transient_message;
mod tree_builder;
mod ttl_cache;
mod utils;

const LIST_STATUS: &str = "↑/k up • ↓/j down • ←/→ tabs • enter comments • o open link • 1-4 sort • f top • r refresh • q quit • ? help";

const COMMENTS_STATUS: &str = "↑/k up • ↓/j down • ←/h collapse • →/l expand or load • enter toggle • o open comment • r reload • esc back";

const HELP_TITLE: &str = "Help";
const HELP_STATUS: &str = "Press ? or esc to close help, ↑/↓ to scroll";

const LOADING_ENTRIES_STATUS: &str = "Loading more entries...";
const LOADING_COMMENTS_STATUS: &str = "Loading comments...";

const BASE_INDENT: &str = " ";

/// Replies deeper than this keep the same indentation.
const MAX_INDENT_DEPTH: usize = 8;

const THREAD_COLORS: [Color; 6] = [
  Color::LightRed,
  Color::LightYellow,
  Color::LightGreen,
  Color::LightCyan,
  Color::LightBlue,
  Color::LightMagenta,
];

const HELP_TEXT: &str = "\
Stories:
  ← / h   previous tab
  → / l   next tab
  ↑ / k   move selection up
  ↓ / j   move selection down
  pg↓     page down
  pg↑     page up
  ctrl+d  page down
  ctrl+u  page up
  home    jump to first story
  end     jump to last loaded story
  enter   view comments for the selected story
  o       open the selected story in your browser
  1       sort by rank
  2       sort by points
  3       sort by comments
  4       sort by newest
  f       show the top 10, 20 or 30 by points, then everything
  r       refresh the current tab
  q       quit
  esc     close help or quit from the list
  scroll  keep going past the end to load more stories
  ?       toggle this help

Comments:
  ↑ / k   move selection up
  ↓ / j   move selection down
  pg↓     page down
  pg↑     page up
  ← / h   collapse or go to parent
  → / l   expand, go to first reply, or load replies
  enter   collapse or expand the selected entry
  space   same as enter
  o       open the selected comment in your browser
  r       reload the thread
  esc     return to the story list
";

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn initialize_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;

  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;

  Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(
  terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result {
  disable_raw_mode()?;

  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

  terminal.show_cursor()?;

  Ok(())
}

async fn run() -> Result {
  let arguments = Arguments::parse();

  logging::init(arguments.log_file.as_deref())?;

  let client = Client::new(arguments.config());

  let tabs = client
    .load_tabs()
    .await
    .context("could not load story lists")?;

  let mut terminal = initialize_terminal()?;

  let mut app = App::new(client, tabs);

  let result = app.run(&mut terminal);

  restore_terminal(&mut terminal)?;

  result
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
