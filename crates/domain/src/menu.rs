//! Menus and replies — what the conversation sends back to the chat transport.

use serde::Serialize;

/// Default number of buttons per menu row.
pub const MENU_COLUMNS: usize = 2;

/// A constrained set of reply options, laid out in rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    rows: Vec<Vec<String>>,
}

impl Menu {
    /// Lay `buttons` out in rows of `columns`, with optional header and
    /// footer rows.
    #[must_use]
    pub fn build<S: AsRef<str>>(
        buttons: &[S],
        columns: usize,
        header: Option<Vec<String>>,
        footer: Option<Vec<String>>,
    ) -> Self {
        let columns = columns.max(1);
        let mut rows: Vec<Vec<String>> = buttons
            .chunks(columns)
            .map(|chunk| chunk.iter().map(|b| b.as_ref().to_string()).collect())
            .collect();
        if let Some(header) = header.filter(|row| !row.is_empty()) {
            rows.insert(0, header);
        }
        if let Some(footer) = footer.filter(|row| !row.is_empty()) {
            rows.push(footer);
        }
        Self { rows }
    }

    /// Shorthand for a plain grid with [`MENU_COLUMNS`] columns.
    #[must_use]
    pub fn grid<S: AsRef<str>>(buttons: &[S]) -> Self {
        Self::build(buttons, MENU_COLUMNS, None, None)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Every option, row by row.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// What to do with the menu currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyMarkup {
    /// Leave whatever is displayed untouched.
    Keep,
    /// Present a new menu.
    Show(Menu),
    /// Clear any presented menu.
    Remove,
}

/// A message for the user plus its menu affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub markup: ReplyMarkup,
}

impl Reply {
    /// Plain text, menu untouched.
    #[must_use]
    pub fn keep(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Keep,
        }
    }

    /// Text plus a new menu.
    #[must_use]
    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Show(menu),
        }
    }

    /// Terminal reply: text and the menu is cleared.
    #[must_use]
    pub fn finish(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Remove,
        }
    }

    /// The menu presented by this reply, if any.
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        match &self.markup {
            ReplyMarkup::Show(menu) => Some(menu),
            ReplyMarkup::Keep | ReplyMarkup::Remove => None,
        }
    }
}
