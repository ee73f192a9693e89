use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
  CloseComments,
  Filter,
  HideHelp,
  LoadReplies,
  None,
  OpenCommentLink,
  OpenComments,
  OpenCurrentInBrowser,
  PageDown,
  PageUp,
  Quit,
  Refresh,
  ReloadComments,
  SelectFirst,
  SelectNext,
  SelectPrevious,
  ShowHelp,
  Sort(SortKey),
  SwitchTabLeft,
  SwitchTabRight,
}
