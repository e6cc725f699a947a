//! Subcommand handlers.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};
use url::Url;
use zenwatch_api::types::{
    ContentKind, LibraryFilters, NewUserKeyword, Reaction, RegisterRequest, ScrapeRequest,
    SortOrder, VideoFilters,
};
use zenwatch_auth::OAuthFlow;
use zenwatch_core::{AppSettings, AppState, PollConfig, PollOutcome, Route, ZenWatch};

use crate::args::{
    Commands, CommentsCmd, FeedArgs, ItemArgs, KeywordsCmd, LibraryArgs, LoginArgs, RegisterArgs,
    ScrapeCmd, SettingsArgs, TriageCmd, VideoArgs,
};
use crate::print;

/// Everything a handler needs.
pub struct Ctx {
    pub zw: ZenWatch,
    pub state: AppState,
    pub settings: AppSettings,
    pub settings_path: PathBuf,
    pub json: bool,
}

impl Ctx {
    /// Enters `route`, loading the signed-in user first when the route is guarded.
    async fn enter(&mut self, route: Route) -> anyhow::Result<()> {
        if route.requires_auth()
            && !self.state.auth.is_authenticated()
            && self.zw.tokens().is_signed_in()
        {
            match self.zw.me().await {
                Ok(user) => self.state.auth.set_auth(user),
                Err(e) if e.is_unauthorized() => debug!("Stored session is no longer valid"),
                Err(e) => return Err(e.into()),
            }
        }
        let wanted = route.clone();
        let auth = self.state.auth.clone();
        match self.state.ui.navigate(route, &auth) {
            r if *r == wanted => Ok(()),
            Route::Login => bail!("Not signed in. Run `zenwatch login` first."),
            _ => bail!("This command needs an admin account."),
        }
    }

    /// Loads an item so toggles see its current state.
    async fn load_item(&self, kind: ContentKind, id: &str) -> anyhow::Result<String> {
        let url = match kind {
            ContentKind::Article => self.zw.article(id).await?.url,
            ContentKind::Video => self.zw.video(id).await?.url,
        };
        Ok(url)
    }

    fn view(&self) -> zenwatch_core::ViewMode {
        self.state.ui.view_mode()
    }
}

pub async fn handle(ctx: &mut Ctx, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login(args) => login(ctx, args).await,
        Commands::Register(args) => register(ctx, args).await,
        Commands::Logout => {
            ctx.zw.logout().await;
            ctx.state.auth.logout();
            Ok(())
        }
        Commands::Whoami => whoami(ctx).await,
        Commands::Feed(args) => feed(ctx, args).await,
        Commands::Videos(args) => videos(ctx, args).await,
        Commands::Best { kind } => best(ctx, kind.into()).await,
        Commands::Library(args) => library(ctx, args).await,
        Commands::Triage { action } => triage(ctx, action.unwrap_or(TriageCmd::List)).await,
        Commands::Bookmark(item) => {
            let kind = item.kind.into();
            ctx.load_item(kind, &item.id).await?;
            let saved = ctx.zw.toggle_bookmark(kind, &item.id).await?;
            debug!(id = %item.id, saved, "Bookmark toggled");
            Ok(())
        }
        Commands::Favorite(item) => {
            let kind = item.kind.into();
            ctx.load_item(kind, &item.id).await?;
            ctx.zw.toggle_favorite(kind, &item.id).await?;
            Ok(())
        }
        Commands::React { item, reaction } => react(ctx, &item, reaction.into()).await,
        Commands::Read(item) => {
            ctx.zw.mark_read(item.kind.into(), &item.id).await?;
            Ok(())
        }
        Commands::Dismiss(item) => {
            ctx.zw.dismiss(item.kind.into(), &item.id).await?;
            Ok(())
        }
        Commands::Comments { action } => comments(ctx, action).await,
        Commands::Keywords { action } => keywords(ctx, action).await,
        Commands::Scrape { action } => scrape(ctx, action).await,
        Commands::Open(item) => open(ctx, &item).await,
        Commands::Settings(args) => settings(ctx, &args),
    }
}

async fn login(ctx: &mut Ctx, args: LoginArgs) -> anyhow::Result<()> {
    let user = if let Some(provider) = args.oauth {
        let flow = OAuthFlow::new(provider.into());
        let url = flow.authorization_url(&ctx.zw.api().config().base_url, &args.redirect_uri)?;
        eprintln!("Opening {url}");
        if let Err(e) = opener::open(url.as_str()) {
            warn!(error = %e, "Could not open a browser");
            eprintln!("Open the URL above in your browser.");
        }
        let redirect = prompt("Paste the URL you were redirected to: ").await?;
        let redirect = Url::parse(redirect.trim()).context("invalid redirect URL")?;
        ctx.zw.complete_oauth(&flow, &redirect).await?
    } else {
        let email = match args.email {
            Some(email) => email,
            None => prompt("Email: ").await?,
        };
        let password = password(args.password).await?;
        ctx.zw.login(&email, &password).await?
    };
    ctx.state.auth.set_auth(user);
    Ok(())
}

async fn register(ctx: &mut Ctx, args: RegisterArgs) -> anyhow::Result<()> {
    let password = password(args.password).await?;
    let confirm = prompt("Confirm password: ").await?;
    let request = RegisterRequest {
        email: args.email,
        username: args.username,
        password,
    };
    let user = ctx.zw.register(&request, &confirm).await?;
    ctx.state.auth.set_auth(user);
    Ok(())
}

async fn whoami(ctx: &mut Ctx) -> anyhow::Result<()> {
    if !ctx.zw.tokens().is_signed_in() {
        bail!("Not signed in.");
    }
    let user = ctx.zw.me().await?;
    if ctx.json {
        print::print_json(&user)?;
    } else {
        println!("{}", print::user(&user));
    }
    ctx.state.auth.set_auth(user);
    Ok(())
}

async fn feed(ctx: &mut Ctx, args: FeedArgs) -> anyhow::Result<()> {
    ctx.enter(Route::Feed).await?;
    let ui = &mut ctx.state.ui;
    if args.category.is_some() {
        ui.set_category(args.category);
    }
    if args.search.is_some() {
        ui.set_search(args.search);
    }
    if let Some(sort) = args.sort {
        ui.set_sort(sort.into());
    }
    if let Some(page) = args.page {
        ui.set_page(page);
    }
    if args.save {
        ctx.state.store_settings(&mut ctx.settings);
    }

    let filters = ctx.state.ui.filters().clone();
    let page = ctx.zw.articles(&filters).await?;
    if ctx.json {
        return print::print_json(&page);
    }
    for a in &page.items {
        println!("{}", print::article(a, ctx.view()));
    }
    println!("page {}/{} ({} articles)", page.page, page.pages, page.total);
    Ok(())
}

async fn videos(ctx: &mut Ctx, args: VideoArgs) -> anyhow::Result<()> {
    ctx.enter(Route::Videos).await?;
    let filters = VideoFilters {
        page: args.page,
        category: args.category,
        channel: args.channel,
        search: args.search,
        sort: SortOrder::from(args.sort),
        ..VideoFilters::default()
    };
    let page = ctx.zw.videos(&filters).await?;
    if ctx.json {
        return print::print_json(&page);
    }
    for v in &page.items {
        println!("{}", print::video(v, ctx.view()));
    }
    println!("page {}/{} ({} videos)", page.page, page.pages, page.total);
    Ok(())
}

async fn best(ctx: &mut Ctx, kind: ContentKind) -> anyhow::Result<()> {
    match kind {
        ContentKind::Article => {
            let items = ctx.zw.best_articles_of_week().await?;
            if ctx.json {
                return print::print_json(&items);
            }
            for a in &items {
                println!("{}", print::article(a, ctx.view()));
            }
        }
        ContentKind::Video => {
            let items = ctx.zw.best_videos_of_week().await?;
            if ctx.json {
                return print::print_json(&items);
            }
            for v in &items {
                println!("{}", print::video(v, ctx.view()));
            }
        }
    }
    Ok(())
}

async fn library(ctx: &mut Ctx, args: LibraryArgs) -> anyhow::Result<()> {
    ctx.enter(Route::Library).await?;
    let filters = LibraryFilters {
        kind: args.kind.into(),
        unread_only: args.unread,
        page: args.page,
        ..LibraryFilters::default()
    };
    let page = ctx.zw.library(&filters).await?;
    if ctx.json {
        return print::print_json(&page);
    }
    for item in &page.items {
        println!("{}", print::library_item(item));
    }
    println!("{} saved, {} unread", page.total, page.unread_count);
    Ok(())
}

async fn triage(ctx: &mut Ctx, cmd: TriageCmd) -> anyhow::Result<()> {
    ctx.enter(Route::Triage).await?;
    match cmd {
        TriageCmd::List => {
            let batch = ctx.zw.triage().await?;
            if ctx.json {
                return print::print_json(&batch);
            }
            for a in &batch.articles {
                println!("{}", print::article(a, ctx.view()));
            }
            println!("{} left to triage", batch.remaining_count);
        }
        TriageCmd::Dismiss { id } => {
            ctx.zw.triage().await?;
            ctx.zw.triage_dismiss(&id).await?;
        }
        TriageCmd::Bookmark { id } => {
            ctx.zw.triage().await?;
            ctx.zw.triage_bookmark(&id).await?;
        }
    }
    Ok(())
}

async fn react(ctx: &mut Ctx, item: &ItemArgs, reaction: Reaction) -> anyhow::Result<()> {
    let kind = item.kind.into();
    ctx.load_item(kind, &item.id).await?;
    let counts = ctx.zw.react(kind, &item.id, reaction).await?;
    if ctx.json {
        return print::print_json(&counts);
    }
    println!("+{} -{}", counts.likes, counts.dislikes);
    Ok(())
}

async fn comments(ctx: &mut Ctx, cmd: CommentsCmd) -> anyhow::Result<()> {
    match cmd {
        CommentsCmd::Show(item) => {
            let kind = item.kind.into();
            if ctx.json {
                return print::print_json(&ctx.zw.comments(kind, &item.id).await?);
            }
            let tree = ctx.zw.comment_tree(kind, &item.id).await?;
            if tree.is_empty() {
                println!("No comments yet.");
            } else {
                print!("{}", print::comment_tree(&tree));
            }
        }
        CommentsCmd::Post {
            item,
            reply_to,
            text,
        } => {
            let kind = item.kind.into();
            ctx.zw.comments(kind, &item.id).await?;
            let comment = ctx.zw.post_comment(kind, &item.id, reply_to, &text).await?;
            println!("Posted comment #{}", comment.id);
        }
        CommentsCmd::Edit {
            item,
            comment,
            text,
        } => {
            ctx.zw
                .edit_comment(item.kind.into(), &item.id, comment, &text)
                .await?;
        }
        CommentsCmd::Delete { item, comment } => {
            ctx.zw
                .delete_comment(item.kind.into(), &item.id, comment)
                .await?;
        }
    }
    Ok(())
}

async fn keywords(ctx: &mut Ctx, cmd: KeywordsCmd) -> anyhow::Result<()> {
    ctx.enter(Route::Keywords).await?;
    match cmd {
        KeywordsCmd::List => {
            let list = ctx.zw.my_keywords().await?;
            if ctx.json {
                return print::print_json(&list);
            }
            for k in &list {
                println!("{:>5}  {:<30} x{:.1}", k.id, k.keyword, k.weight);
            }
        }
        KeywordsCmd::Add { keyword, weight } => {
            ctx.zw.my_keywords().await?;
            ctx.zw.add_keyword(NewUserKeyword { keyword, weight }).await?;
        }
        KeywordsCmd::Remove { id } => {
            ctx.zw.my_keywords().await?;
            ctx.zw.remove_keyword(id).await?;
        }
    }
    Ok(())
}

async fn scrape(ctx: &mut Ctx, cmd: ScrapeCmd) -> anyhow::Result<()> {
    ctx.enter(Route::Admin).await?;
    match cmd {
        ScrapeCmd::Run { sources } => {
            let outcome = ctx
                .zw
                .trigger_and_watch(&ScrapeRequest { sources }, &PollConfig::default())
                .await?;
            if let PollOutcome::Finished { status, .. } = &outcome {
                if ctx.json {
                    return print::print_json(status);
                }
                for error in &status.errors {
                    eprintln!("  {error}");
                }
            }
        }
        ScrapeCmd::History => {
            let runs = ctx.zw.scrape_history().await?;
            if ctx.json {
                return print::print_json(&runs);
            }
            for run in &runs {
                println!("{}", print::scrape_run(run));
            }
        }
        ScrapeCmd::Stats => {
            let stats = ctx.zw.scrape_stats().await?;
            if ctx.json {
                return print::print_json(&stats);
            }
            println!("{}", print::scrape_stats(&stats));
        }
    }
    Ok(())
}

async fn open(ctx: &mut Ctx, item: &ItemArgs) -> anyhow::Result<()> {
    let kind = item.kind.into();
    let url = ctx.load_item(kind, &item.id).await?;
    opener::open(&url).with_context(|| format!("could not open {url}"))?;
    if ctx.zw.tokens().is_signed_in()
        && let Err(e) = ctx.zw.mark_read(kind, &item.id).await
    {
        warn!(error = %e, "Could not mark item as read");
    }
    Ok(())
}

fn settings(ctx: &mut Ctx, args: &SettingsArgs) -> anyhow::Result<()> {
    if let Some(view) = args.view {
        ctx.state.ui.set_view_mode(view.into());
    }
    if args.reset_filters {
        ctx.state.ui.reset_filters();
    }
    ctx.state.store_settings(&mut ctx.settings);

    if ctx.json {
        let mut shown = ctx.settings.clone();
        shown.session_token = None;
        return print::print_json(&shown);
    }
    println!("settings file: {}", ctx.settings_path.display());
    println!("view:          {:?}", ctx.settings.view_mode);
    println!("theme:         {:?}", ctx.settings.theme);
    let f = &ctx.settings.default_filters;
    println!(
        "feed:          sort={} category={} search={}",
        f.sort.as_str(),
        f.category.as_deref().unwrap_or("-"),
        f.search.as_deref().unwrap_or("-")
    );
    Ok(())
}

async fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(label.as_bytes()).await?;
    stderr.flush().await?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn password(from_env: Option<String>) -> anyhow::Result<String> {
    match from_env {
        Some(p) => Ok(p),
        None => prompt("Password: ").await,
    }
}
