use clap::{Parser, Subcommand};
use multisite::core::query;
use multisite::utils::{logger, validation::Validate};
use multisite::{ContentKind, ContentStore, DomainRouter, FsContentStore, SiteConfig, SiteError};

#[derive(Parser)]
#[command(name = "site-inspect")]
#[command(about = "Inspect routing decisions and content without starting the server")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "site.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how a host and path would be routed
    Route {
        #[arg(long)]
        host: String,
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        query: Option<String>,
    },
    /// List the entries of one collection, newest first
    List { kind: ContentKind },
    /// Print one entry as JSON
    Show { kind: ContentKind, slug: String },
    /// Parse every configured collection and report problems
    Check,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    if let Err(e) = run(&config, args.command).await {
        fail(&e);
    }
}

fn load_config(path: &str) -> Result<SiteConfig, SiteError> {
    tracing::debug!("📁 Loading configuration from: {}", path);
    let config = SiteConfig::from_file(path)?;
    config.validate()?;
    Ok(config)
}

fn fail(e: &SiteError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e);
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn store_for(config: &SiteConfig, kind: ContentKind) -> Result<FsContentStore, SiteError> {
    let source = config
        .content
        .source(kind)
        .ok_or_else(|| SiteError::MissingConfigError {
            field: format!("content.{}", kind),
        })?;
    let dir = config
        .content_dir(kind)
        .ok_or_else(|| SiteError::MissingConfigError {
            field: format!("content.{}.directory", kind),
        })?;
    Ok(FsContentStore::from_source(kind, dir, source))
}

async fn run(config: &SiteConfig, command: Command) -> Result<(), SiteError> {
    match command {
        Command::Route { host, path, query } => {
            let router = DomainRouter::new(config.root_domain(), &config.routing);
            if !router.should_route(&path) {
                println!("⏭️  {} is served directly, no routing", path);
                return Ok(());
            }
            let decision = router.route(&host, &path, query.as_deref());
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Command::List { kind } => {
            let mut entries = store_for(config, kind)?.list_all().await?;
            match kind {
                ContentKind::Portfolio => query::sort_highlighted_first(&mut entries, "highlighted"),
                ContentKind::Blog | ContentKind::Careers => query::sort_by_published_desc(&mut entries),
            }

            println!("📋 {} ({} entries)", kind, entries.len());
            for entry in &entries {
                println!(
                    "  {:<40} {:<12} {}",
                    entry.slug,
                    entry.published_at().unwrap_or("-"),
                    entry.title().unwrap_or("(untitled)")
                );
            }
        }
        Command::Show { kind, slug } => match store_for(config, kind)?.find_by_slug(&slug).await? {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => {
                eprintln!("🔍 No {} entry with slug '{}'", kind, slug);
                std::process::exit(4);
            }
        },
        Command::Check => {
            let mut first_error = None;
            for kind in ContentKind::ALL {
                if config.content.source(kind).is_none() {
                    println!("  {:<10} not configured", kind);
                    continue;
                }
                match store_for(config, kind)?.list_all().await {
                    Ok(entries) => println!("  ✅ {:<10} {} entries", kind, entries.len()),
                    Err(e) => {
                        println!("  ❌ {:<10} {}", kind, e);
                        first_error.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
            println!("✅ All content parsed successfully");
        }
    }
    Ok(())
}
