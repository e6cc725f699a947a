//! Presentation state: theme, layout, filters and navigation.

use serde::{Deserialize, Serialize};
use zenwatch_api::types::{ArticleFilters, SortOrder};

use super::AuthState;

/// Color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

/// Feed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Cards in a grid.
    #[default]
    Grid,
    /// One item per row with summary.
    List,
    /// Titles only.
    Compact,
}

/// Screens of the application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Article feed.
    #[default]
    Feed,
    /// Video feed.
    Videos,
    /// Saved items.
    Library,
    /// Swipe-style triage.
    Triage,
    /// Personalization keywords.
    Keywords,
    /// Scraping statistics.
    Analytics,
    /// Admin console.
    Admin,
    /// Login screen.
    Login,
    /// Someone's public profile.
    Profile(String),
    /// One article with its comments.
    Article(String),
}

impl Route {
    /// Returns true if the screen needs a signed-in user.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Library | Self::Triage | Self::Keywords | Self::Analytics | Self::Admin
        )
    }

    /// Returns true if the screen needs an admin.
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// UI state with explicit setters.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    theme: ThemeMode,
    sidebar_open: bool,
    view_mode: ViewMode,
    filters: ArticleFilters,
    route: Route,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            sidebar_open: true,
            view_mode: ViewMode::default(),
            filters: ArticleFilters::default(),
            route: Route::default(),
        }
    }
}

impl UiState {
    /// Color scheme.
    #[must_use]
    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Changes the color scheme.
    pub const fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Whether the sidebar is shown.
    #[must_use]
    pub const fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Shows or hides the sidebar.
    pub const fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Feed layout.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Changes the feed layout.
    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Current feed filters.
    #[must_use]
    pub const fn filters(&self) -> &ArticleFilters {
        &self.filters
    }

    /// Replaces all feed filters.
    pub fn set_filters(&mut self, filters: ArticleFilters) {
        self.filters = filters;
    }

    /// Filters by category and goes back to the first page.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category;
        self.filters.page = 1;
    }

    /// Sets the search text and goes back to the first page.
    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.search = search.filter(|s| !s.trim().is_empty());
        self.filters.page = 1;
    }

    /// Changes the ordering and goes back to the first page.
    pub const fn set_sort(&mut self, sort: SortOrder) {
        self.filters.sort = sort;
        self.filters.page = 1;
    }

    /// Moves to a page (1-based).
    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page.max(1);
    }

    /// Clears every filter, keeping the page size.
    pub fn reset_filters(&mut self) {
        self.filters = ArticleFilters {
            per_page: self.filters.per_page,
            ..ArticleFilters::default()
        };
    }

    /// Current screen.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Navigates to `route`, redirecting when access is not allowed.
    ///
    /// Anonymous users are sent to the login screen; signed-in non-admins
    /// asking for the admin console land on the feed. Returns the route
    /// actually taken.
    pub fn navigate(&mut self, route: Route, auth: &AuthState) -> &Route {
        self.route = if route.requires_auth() && !auth.is_authenticated() {
            Route::Login
        } else if route.requires_admin() && !auth.is_admin() {
            Route::Feed
        } else {
            route
        };
        &self.route
    }
}
