//! Text rendering for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use zenwatch_api::types::{
    Article, Engagement, LibraryItem, ScrapeRun, ScrapeStats, TaskState, User, Video,
};
use zenwatch_core::{CommentNode, Toast, ToastLevel, ViewMode};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read/favorite/bookmark markers, e.g. `[r*b]`.
fn markers(e: &Engagement) -> String {
    let flag = |on: bool, c: char| if on { c } else { '-' };
    format!(
        "[{}{}{}]",
        flag(e.is_read, 'r'),
        flag(e.is_favorite, '*'),
        flag(e.is_bookmarked, 'b')
    )
}

fn date(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(|| "----------".to_string(), |t| t.format("%Y-%m-%d").to_string())
}

pub fn article(a: &Article, view: ViewMode) -> String {
    let e = &a.engagement;
    let mut out = format!("{:>5.1} {} {}  {}", a.score, markers(e), a.id, a.title);
    if view == ViewMode::Compact {
        return out;
    }
    let _ = write!(
        out,
        "\n      {} | {} | +{} -{}",
        a.source.as_deref().unwrap_or("unknown"),
        date(a.published_at),
        e.likes,
        e.dislikes
    );
    if view == ViewMode::Grid
        && let Some(summary) = &a.summary
    {
        let _ = write!(out, "\n      {}", truncate(summary, 160));
    }
    let _ = write!(out, "\n      {}", a.url);
    out
}

pub fn video(v: &Video, view: ViewMode) -> String {
    let mut out = format!(
        "{:>5.1} {} {}  {}",
        v.score,
        markers(&v.engagement),
        v.id,
        v.title
    );
    if view == ViewMode::Compact {
        return out;
    }
    let length = v
        .duration_seconds
        .map_or_else(String::new, |s| format!(" | {}:{:02}", s / 60, s % 60));
    let _ = write!(
        out,
        "\n      {}{} | {}\n      {}",
        v.channel.as_deref().unwrap_or("unknown"),
        length,
        date(v.published_at),
        v.url
    );
    out
}

pub fn library_item(item: &LibraryItem) -> String {
    format!(
        "{} {:<7} {}  {}",
        markers(item.engagement()),
        item.kind().as_str(),
        item.id(),
        item.title()
    )
}

/// Indents replies two spaces per level under their parent.
pub fn comment_tree(nodes: &[CommentNode]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&CommentNode, usize)> = nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let c = &node.comment;
        let indent = depth * 2;
        let _ = writeln!(
            out,
            "{:indent$}#{} {} ({})",
            "",
            c.id,
            c.username.as_deref().unwrap_or("anonymous"),
            c.created_at.format("%Y-%m-%d %H:%M"),
        );
        for line in node.display_content().lines() {
            let _ = writeln!(out, "{:indent$}  {line}", "");
        }
        stack.extend(node.replies.iter().rev().map(|r| (r, depth + 1)));
    }
    out
}

pub fn user(u: &User) -> String {
    let role = if u.is_admin { " (admin)" } else { "" };
    let mut out = format!("{} <{}>{role}", u.username, u.email);
    if let Some(bio) = &u.bio {
        let _ = write!(out, "\n{bio}");
    }
    out
}

pub fn scrape_run(run: &ScrapeRun) -> String {
    format!(
        "#{:<5} {} {:<15} {:>4} saved  {}",
        run.id,
        run.started_at.format("%Y-%m-%d %H:%M"),
        state(run.status),
        run.articles_saved,
        run.trigger.as_deref().unwrap_or("")
    )
}

pub fn scrape_stats(stats: &ScrapeStats) -> String {
    format!(
        "articles: {} ({} today)\nvideos:   {}\nruns:     {}\nlast run: {}",
        stats.total_articles,
        stats.articles_today,
        stats.total_videos,
        stats.total_runs,
        stats
            .last_run_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339())
    )
}

const fn state(s: TaskState) -> &'static str {
    match s {
        TaskState::Pending => "pending",
        TaskState::Running => "running",
        TaskState::Success => "success",
        TaskState::PartialSuccess => "partial_success",
        TaskState::Failed => "failed",
    }
}

pub fn toast(t: &Toast) -> String {
    let tag = match t.level {
        ToastLevel::Success => "ok",
        ToastLevel::Info => "info",
        ToastLevel::Warning => "warn",
        ToastLevel::Error => "error",
    };
    format!("[{tag}] {}", t.message)
}

fn truncate(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}
