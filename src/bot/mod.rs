//! Telegram chat command surface
//!
//! - [`BotCommand`] - `/name[@bot] args…` parsing
//! - [`handler::CommandHandler`] - executes commands and sends replies
//! - [`replies`] - reply texts shared with the CLI
//! - [`poller`] - `getUpdates` long-polling loop

pub mod handler;
pub mod poller;
pub mod replies;

pub use handler::CommandHandler;

use crate::notifications::channels::telegram::Message;

// ============================================================================
// Commands
// ============================================================================

/// A recognized chat command with its raw arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    /// `/employees`: first records of the whole directory
    Employees,
    /// `/list <type> [page]`
    List {
        kind: Option<String>,
        page: Option<String>,
    },
    /// `/teachers [page]`
    Teachers { page: Option<String> },
    /// `/staffs [page]`
    Staffs { page: Option<String> },
    /// `/employees_all [page]`
    EmployeesAll { page: Option<String> },
    /// `/search <text…>`
    Search { query: String },
    Sync,
    Types,
    SetChat,
    Status,
    Run,
}

impl BotCommand {
    /// Parse message text; `None` for plain text and unknown commands
    ///
    /// A `@botname` suffix on the command token is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;

        let (token, tail) = match rest.split_once(char::is_whitespace) {
            Some((token, tail)) => (token, tail.trim()),
            None => (rest, ""),
        };
        let name = token.split('@').next().unwrap_or(token);
        let mut args = tail.split_whitespace();
        let first = args.next().map(String::from);

        let command = match name {
            "start" => Self::Start,
            "employees" => Self::Employees,
            "list" => Self::List {
                kind: first,
                page: args.next().map(String::from),
            },
            "teachers" => Self::Teachers { page: first },
            "staffs" => Self::Staffs { page: first },
            "employees_all" => Self::EmployeesAll { page: first },
            "search" => Self::Search {
                query: tail.to_string(),
            },
            "sync" => Self::Sync,
            "types" => Self::Types,
            "setchat" => Self::SetChat,
            "status" => Self::Status,
            "run" => Self::Run,
            _ => return None,
        };
        Some(command)
    }

    /// Command name without the slash
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Employees => "employees",
            Self::List { .. } => "list",
            Self::Teachers { .. } => "teachers",
            Self::Staffs { .. } => "staffs",
            Self::EmployeesAll { .. } => "employees_all",
            Self::Search { .. } => "search",
            Self::Sync => "sync",
            Self::Types => "types",
            Self::SetChat => "setchat",
            Self::Status => "status",
            Self::Run => "run",
        }
    }

    /// Whether only admins may run the command
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Sync | Self::Types | Self::SetChat | Self::Status | Self::Run
        )
    }
}

// ============================================================================
// Context & Admins
// ============================================================================

/// Who sent a command, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub chat_id: String,
    pub user_id: Option<String>,
    pub text: String,
}

impl CommandContext {
    pub fn new(chat_id: impl Into<String>, user_id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            user_id,
            text: text.into(),
        }
    }

    /// Context of an incoming text message; `None` without text
    pub fn from_message(message: &Message) -> Option<Self> {
        let text = message.text.as_ref()?;
        Some(Self::new(
            message.chat.id.to_string(),
            message.from.as_ref().map(|u| u.id.to_string()),
            text.clone(),
        ))
    }
}

/// Users allowed to run admin commands
///
/// An empty list allows everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminList {
    ids: Vec<String>,
}

impl AdminList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }

    pub fn allows(&self, user_id: Option<&str>) -> bool {
        if self.ids.is_empty() {
            return true;
        }
        user_id.is_some_and(|id| self.ids.iter().any(|a| a == id))
    }
}
