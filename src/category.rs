#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Category {
  pub(crate) endpoint: &'static str,
  pub(crate) label: &'static str,
}

impl Category {
  pub(crate) fn all() -> &'static [Category] {
    &[
      Category {
        endpoint: "topstories",
        label: "top",
      },
      Category {
        endpoint: "newstories",
        label: "new",
      },
      Category {
        endpoint: "beststories",
        label: "best",
      },
      Category {
        endpoint: "askstories",
        label: "ask",
      },
      Category {
        endpoint: "showstories",
        label: "show",
      },
      Category {
        endpoint: "jobstories",
        label: "jobs",
      },
    ]
  }
}
