//! Request and response types of the backend JSON contract.

mod admin;
mod comment;
mod content;
mod keyword;
mod library;
mod page;
mod scraping;
mod triage;
mod user;

pub use admin::{Keyword, KeywordInput, KeywordUpdate, Source, SourceInput, SourceUpdate};
pub use comment::{Comment, CommentUpdate, NewComment};
pub use content::{
    Article, ArticleFilters, BookmarkResponse, ContentKind, Engagement, FavoriteResponse,
    FeedItem, Reaction, ReactionResponse, SortOrder, Video, VideoFilters,
};
pub use keyword::{NewUserKeyword, UserKeyword};
pub use library::{LibraryFilters, LibraryItem, LibraryKind, LibraryPage};
pub use page::Paginated;
pub use scraping::{ScrapeRequest, ScrapeRun, ScrapeStats, ScrapeTask, TaskState, TaskStatus};
pub use triage::TriageBatch;
pub use user::{AuthResponse, LoginRequest, ProfileUpdate, PublicProfile, RegisterRequest, User};
