//! Command-line surface.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use zenwatch_api::types::{ContentKind, LibraryKind, Reaction, SortOrder};
use zenwatch_auth::OAuthProvider;
use zenwatch_core::ViewMode;

#[derive(Parser, Debug)]
#[command(name = "zenwatch", version, about = "ZenWatch tech-news client", long_about = None)]
pub struct Cli {
    /// Backend origin, e.g. <https://zenwatch.example.com>
    #[arg(long, env = "ZENWATCH_API_URL")]
    pub api_url: Option<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "ZENWATCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password, or through an OAuth provider
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// End the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Article feed
    Feed(FeedArgs),
    /// Video feed
    Videos(VideoArgs),
    /// Best of the week
    Best {
        #[arg(long, value_enum, default_value_t = KindArg::Article)]
        kind: KindArg,
    },
    /// Saved articles and videos
    Library(LibraryArgs),
    /// Accept or reject unseen articles
    Triage {
        #[command(subcommand)]
        action: Option<TriageCmd>,
    },
    /// Toggle the bookmark on an item
    Bookmark(ItemArgs),
    /// Toggle the favorite flag on an item
    Favorite(ItemArgs),
    /// Like or dislike an item
    React {
        #[command(flatten)]
        item: ItemArgs,
        #[arg(value_enum)]
        reaction: ReactionArg,
    },
    /// Mark an item as read
    Read(ItemArgs),
    /// Hide an item from the feed
    Dismiss(ItemArgs),
    /// Comment threads
    Comments {
        #[command(subcommand)]
        action: CommentsCmd,
    },
    /// Personal feed keywords
    Keywords {
        #[command(subcommand)]
        action: KeywordsCmd,
    },
    /// Scraping jobs (admin)
    Scrape {
        #[command(subcommand)]
        action: ScrapeCmd,
    },
    /// Open an item in the browser
    Open(ItemArgs),
    /// Show or change stored preferences
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, conflicts_with = "oauth")]
    pub email: Option<String>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "ZENWATCH_PASSWORD")]
    pub password: Option<String>,

    /// Sign in through a provider instead
    #[arg(long, value_enum)]
    pub oauth: Option<ProviderArg>,

    /// Redirect URI registered with the provider
    #[arg(long, default_value = "http://localhost:3000/auth/callback")]
    pub redirect_uri: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: String,
    /// Password from env
    #[arg(hide = true, env = "ZENWATCH_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
    #[arg(long)]
    pub page: Option<u32>,
    /// Keep these filters as the default feed
    #[arg(long)]
    pub save: bool,
}

#[derive(Args, Debug)]
pub struct VideoArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub channel: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    pub sort: SortArg,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[arg(long, value_enum, default_value_t = LibraryKindArg::All)]
    pub kind: LibraryKindArg,
    #[arg(long)]
    pub unread: bool,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args, Debug)]
pub struct ItemArgs {
    /// Content id
    pub id: String,
    #[arg(long, value_enum, default_value_t = KindArg::Article)]
    pub kind: KindArg,
}

#[derive(Subcommand, Debug)]
pub enum TriageCmd {
    /// Show the next batch
    List,
    /// Reject an article
    Dismiss { id: String },
    /// Keep an article in the library
    Bookmark { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    /// Print the thread as a tree
    Show(ItemArgs),
    /// Post a comment or a reply
    Post {
        #[command(flatten)]
        item: ItemArgs,
        /// Comment id to reply to
        #[arg(long)]
        reply_to: Option<i64>,
        text: String,
    },
    /// Edit one of your comments
    Edit {
        #[command(flatten)]
        item: ItemArgs,
        #[arg(long)]
        comment: i64,
        text: String,
    },
    /// Delete one of your comments
    Delete {
        #[command(flatten)]
        item: ItemArgs,
        #[arg(long)]
        comment: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeywordsCmd {
    List,
    Add {
        keyword: String,
        #[arg(long, default_value_t = 1.0)]
        weight: f64,
    },
    Remove {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScrapeCmd {
    /// Start a scrape and wait for it to finish
    Run {
        /// Limit to these sources
        #[arg(long = "source")]
        sources: Vec<String>,
    },
    History,
    Stats,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,
    /// Drop the saved feed filters
    #[arg(long)]
    pub reset_filters: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Article,
    Video,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Article => Self::Article,
            KindArg::Video => Self::Video,
        }
    }
}

impl fmt::Display for KindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ContentKind::from(*self).as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortArg {
    Score,
    Newest,
    Popular,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Score => Self::Score,
            SortArg::Newest => Self::Newest,
            SortArg::Popular => Self::Popular,
        }
    }
}

impl fmt::Display for SortArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SortOrder::from(*self).as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LibraryKindArg {
    All,
    Article,
    Video,
}

impl From<LibraryKindArg> for LibraryKind {
    fn from(kind: LibraryKindArg) -> Self {
        match kind {
            LibraryKindArg::All => Self::All,
            LibraryKindArg::Article => Self::Article,
            LibraryKindArg::Video => Self::Video,
        }
    }
}

impl fmt::Display for LibraryKindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(LibraryKind::from(*self).as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReactionArg {
    Like,
    Dislike,
}

impl From<ReactionArg> for Reaction {
    fn from(reaction: ReactionArg) -> Self {
        match reaction {
            ReactionArg::Like => Self::Like,
            ReactionArg::Dislike => Self::Dislike,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProviderArg {
    Github,
    Google,
}

impl From<ProviderArg> for OAuthProvider {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Github => Self::Github,
            ProviderArg::Google => Self::Google,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ViewArg {
    Grid,
    List,
    Compact,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Grid => Self::Grid,
            ViewArg::List => Self::List,
            ViewArg::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_comment_reply() {
        let cli = Cli::try_parse_from([
            "zenwatch", "comments", "post", "a1", "--reply-to", "7", "Nice",
        ])
        .unwrap();
        let Commands::Comments {
            action: CommentsCmd::Post { item, reply_to, text },
        } = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(item.id, "a1");
        assert_eq!(item.kind, KindArg::Article);
        assert_eq!(reply_to, Some(7));
        assert_eq!(text, "Nice");
    }

    #[test]
    fn test_triage_defaults_to_listing() {
        let cli = Cli::try_parse_from(["zenwatch", "triage"]).unwrap();
        assert!(matches!(cli.command, Commands::Triage { action: None }));
    }

    #[test]
    fn test_email_and_oauth_conflict() {
        let result = Cli::try_parse_from([
            "zenwatch", "login", "--email", "a@b.co", "--oauth", "github",
        ]);
        assert!(result.is_err());
    }
}
