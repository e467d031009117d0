//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use quill_core::config;
use quill_core::logging::{self, LogTarget};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Terminal client for the Quill blog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend URL (overrides QUILL_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List registered users
    Users,
    /// Browse and manage posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Read and write comments
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum PostCommands {
    /// List posts
    ///
    /// Without --page, --tag or --author the full list is fetched and
    /// filtered locally (--tags, --search), and the local cache is refreshed.
    List {
        /// Server-side page number
        #[arg(long)]
        page: Option<u64>,
        /// Server-side page size (default: config page_size)
        #[arg(long)]
        limit: Option<u64>,
        /// Server-side single tag filter
        #[arg(long)]
        tag: Option<String>,
        /// Server-side author id filter
        #[arg(long)]
        author: Option<String>,
        /// Comma-separated tags a post must all carry
        #[arg(long, value_name = "TAGS", conflicts_with_all = ["page", "limit", "tag", "author"])]
        tags: Option<String>,
        /// Case-insensitive text search over title, content and tags
        #[arg(long, conflicts_with_all = ["page", "limit", "tag", "author"])]
        search: Option<String>,
        /// Render the cached list without contacting the server
        #[arg(long, conflicts_with_all = ["page", "limit", "tag", "author"])]
        offline: bool,
    },
    /// Show a post with its comments
    Show {
        #[arg(value_name = "POST_ID")]
        id: String,
    },
    /// List your own posts
    Mine {
        /// Only posts with this status (draft, published)
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Publish a new post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,
        /// Read the content from a file
        #[arg(long, value_name = "PATH")]
        content_file: Option<std::path::PathBuf>,
        /// Tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Publication status (draft, published)
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit one of your posts
    Edit {
        #[arg(value_name = "POST_ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// Delete one of your posts
    Delete {
        #[arg(value_name = "POST_ID")]
        id: String,
    },
    /// Like or unlike a post
    Like {
        #[arg(value_name = "POST_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum CommentCommands {
    /// List a post's comments
    List {
        #[arg(value_name = "POST_ID")]
        post: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Comment on a post, or reply with --parent
    Add {
        #[arg(value_name = "POST_ID")]
        post: String,
        #[arg(long)]
        content: String,
        /// Comment to reply to
        #[arg(long, value_name = "COMMENT_ID")]
        parent: Option<String>,
    },
    /// Edit one of your comments
    Edit {
        #[arg(value_name = "COMMENT_ID")]
        id: String,
        #[arg(long)]
        content: String,
    },
    /// Delete one of your comments
    Delete {
        #[arg(value_name = "COMMENT_ID")]
        id: String,
        /// Post the comment belongs to
        #[arg(long, value_name = "POST_ID")]
        post: String,
    },
    /// Like or unlike a comment
    Like {
        #[arg(value_name = "COMMENT_ID")]
        id: String,
        #[arg(long, value_name = "POST_ID")]
        post: String,
    },
    /// List replies to a comment
    Replies {
        #[arg(value_name = "COMMENT_ID")]
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from the built-in defaults
    Generate,
    /// Show the effective settings and file locations
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    let Cli { command, api_url } = cli;

    // default to the interactive UI
    let Some(command) = command else {
        let _log_guard = logging::init(&config.log, LogTarget::File)?;
        return commands::tui::run(&config, api_url.as_deref());
    };

    // Config commands must work without a session or a network.
    if let Commands::Config { command } = command {
        return run_config(&config, command);
    }

    let _log_guard = logging::init(&config.log, LogTarget::Stderr)?;
    let mut ctx = commands::CommandContext::new(config, api_url.as_deref())?;
    run_command(&mut ctx, command).await
}

fn run_config(config: &config::Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::Generate => commands::config::generate(),
        ConfigCommands::Show => commands::config::show(config),
    }
}

async fn run_command(ctx: &mut commands::CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::auth::login(ctx, email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(ctx, name, email, password).await,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx).await,
        Commands::Users => commands::auth::users(ctx).await,

        Commands::Posts { command } => match command {
            PostCommands::List {
                page,
                limit,
                tag,
                author,
                tags,
                search,
                offline,
            } => {
                if page.is_some() || limit.is_some() || tag.is_some() || author.is_some() {
                    let query = commands::posts::PageQuery {
                        page: page.unwrap_or(1),
                        limit,
                        tag,
                        author,
                    };
                    commands::posts::list_page(ctx, query).await
                } else {
                    let filters = commands::posts::LocalFilters {
                        tags: tags
                            .as_deref()
                            .map(quill_core::present::parse_tags)
                            .unwrap_or_default(),
                        search,
                    };
                    commands::posts::list_all(ctx, &filters, offline).await
                }
            }
            PostCommands::Show { id } => commands::posts::show(ctx, id).await,
            PostCommands::Mine {
                status,
                page,
                limit,
            } => commands::posts::mine(ctx, status, page, limit).await,
            PostCommands::Create {
                title,
                content,
                content_file,
                tags,
                status,
            } => {
                let content = match (content, content_file) {
                    (Some(content), _) => content,
                    (None, Some(path)) => std::fs::read_to_string(&path)
                        .with_context(|| format!("read content from {}", path.display()))?,
                    (None, None) => anyhow::bail!("Either --content or --content-file is required"),
                };
                commands::posts::create(ctx, title, content, tags, status).await
            }
            PostCommands::Edit {
                id,
                title,
                content,
                tags,
            } => commands::posts::edit(ctx, id, title, content, tags).await,
            PostCommands::Delete { id } => commands::posts::delete(ctx, id).await,
            PostCommands::Like { id } => commands::posts::like(ctx, id).await,
        },

        Commands::Comments { command } => match command {
            CommentCommands::List { post, page, limit } => {
                commands::comments::list(ctx, post, page, limit).await
            }
            CommentCommands::Add {
                post,
                content,
                parent,
            } => commands::comments::add(ctx, post, content, parent).await,
            CommentCommands::Edit { id, content } => {
                commands::comments::edit(ctx, id, content).await
            }
            CommentCommands::Delete { id, post } => {
                commands::comments::delete(ctx, id, post).await
            }
            CommentCommands::Like { id, post } => commands::comments::like(ctx, id, post).await,
            CommentCommands::Replies { id, page, limit } => {
                commands::comments::replies(ctx, id, page, limit).await
            }
        },

        Commands::Config { command } => run_config(&ctx.config, command),
    }
}
