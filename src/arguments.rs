use super::*;

#[derive(Debug, Parser)]
#[command(name = "hnr", version, about = "Read Hacker News in the terminal")]
pub(crate) struct Arguments {
  #[arg(long, env = "HNR_API_BASE", default_value = DEFAULT_API_BASE)]
  api_base: String,
  #[arg(
    long,
    env = "HNR_CONCURRENCY",
    default_value_t = 15,
    value_parser = clap::value_parser!(u16).range(1..),
    help = "Maximum number of item requests in flight per batch"
  )]
  concurrency: u16,
  #[arg(
    long,
    env = "HNR_ITEM_TTL",
    default_value_t = 300,
    help = "Seconds to keep fetched items cached"
  )]
  item_ttl: u64,
  #[arg(
    long,
    env = "HNR_LIST_TTL",
    default_value_t = 120,
    help = "Seconds to keep story id lists cached"
  )]
  list_ttl: u64,
  #[arg(long, env = "HNR_LOG_FILE", help = "Append logs to this file")]
  pub(crate) log_file: Option<PathBuf>,
  #[arg(
    long,
    env = "HNR_MAX_DEPTH",
    default_value_t = 3,
    help = "Reply depth loaded without asking"
  )]
  max_depth: usize,
  #[arg(
    long,
    env = "HNR_PAGE_SIZE",
    default_value_t = 30,
    value_parser = clap::value_parser!(u16).range(1..),
    help = "Stories fetched per page"
  )]
  page_size: u16,
}

impl Arguments {
  pub(crate) fn config(&self) -> Config {
    Config {
      api_base: self.api_base.trim_end_matches('/').to_string(),
      concurrency: usize::from(self.concurrency),
      item_ttl: Duration::from_secs(self.item_ttl),
      list_ttl: Duration::from_secs(self.list_ttl),
      max_auto_depth: self.max_depth,
      page_size: usize::from(self.page_size),
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    clap::{CommandFactory, FromArgMatches},
  };

  /// Parses flags with every `HNR_*` fallback switched off, so the caller's
  /// environment cannot leak into the result.
  fn parse(args: &[&str]) -> clap::error::Result<Arguments> {
    let mut command = Arguments::command();

    let ids = command
      .get_arguments()
      .map(|arg| arg.get_id().to_string())
      .collect::<Vec<_>>();

    for id in ids {
      command = command.mut_arg(id, |arg| arg.env(None::<&'static str>));
    }

    Arguments::from_arg_matches(&command.try_get_matches_from(args)?)
  }

  #[test]
  fn defaults_match_config_defaults() {
    let arguments = parse(&["hnr"]).unwrap();

    assert_eq!(arguments.config(), Config::default());
    assert_eq!(arguments.log_file, None);
  }

  #[test]
  fn flags_override_defaults() {
    let arguments = parse(&[
      "hnr",
      "--api-base",
      "http://localhost:8080/v0/",
      "--concurrency",
      "4",
      "--max-depth",
      "1",
      "--page-size",
      "10",
      "--item-ttl",
      "5",
    ])
    .unwrap();

    let config = arguments.config();

    assert_eq!(config.api_base, "http://localhost:8080/v0");
    assert_eq!(config.concurrency, 4);
    assert_eq!(config.max_auto_depth, 1);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.item_ttl, Duration::from_secs(5));
  }

  #[test]
  fn zero_concurrency_is_rejected() {
    assert!(parse(&["hnr", "--concurrency", "0"]).is_err());
  }

  #[test]
  fn environment_is_ignored_when_switched_off() {
    let command = Arguments::command();

    let concurrency = command
      .get_arguments()
      .find(|arg| arg.get_id() == "concurrency")
      .and_then(|arg| arg.get_env())
      .map(|name| name.to_string_lossy().into_owned());

    assert_eq!(concurrency.as_deref(), Some("HNR_CONCURRENCY"));

    let stripped = Arguments::command()
      .mut_arg("concurrency", |arg| arg.env(None::<&'static str>));

    assert!(
      stripped
        .get_arguments()
        .find(|arg| arg.get_id() == "concurrency")
        .and_then(|arg| arg.get_env())
        .is_none()
    );
  }
}
