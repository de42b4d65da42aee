pub(crate) const HELP_ID: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';

// Help text layout.
pub(crate) const HELP_TEXT_WIDTH: usize = 90;
pub(crate) const MAX_CONDENSED_NAME_WIDTH: usize = 24;
