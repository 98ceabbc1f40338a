use super::render::{
    print_article, print_article_list, print_config, print_messages, print_progress,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use travelpress::api::{ConfigAction, ListQuery, PressPaths, TravelApi};
use travelpress::auth::LocalAuthenticator;
use travelpress::composer::{BlockId, Composer};
use travelpress::config::PressConfig;
use travelpress::error::{PressError, Result};
use travelpress::imaging::RustBackend;
use travelpress::manuscript;
use travelpress::model::ArticleId;
use travelpress::publisher::ArticleMeta;
use travelpress::store::fs::FileStore;
use travelpress::upload::{CloudinaryUploader, DisabledUploader, FileUploader};

const HOME_ENV: &str = "TRAVELPRESS_HOME";

struct AppContext {
    api: TravelApi<FileStore, LocalAuthenticator>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Login { email, password }) => handle_login(&mut ctx, email, password),
        Some(Commands::Logout) => handle_logout(&mut ctx),
        Some(Commands::Whoami) => handle_whoami(&ctx),
        Some(Commands::Publish {
            manuscript,
            title,
            province,
        }) => handle_publish(&mut ctx, &manuscript, title, province),
        Some(Commands::List {
            page,
            province,
            search,
        }) => handle_list(&ctx, page, province, search),
        Some(Commands::View { id }) => handle_view(&mut ctx, id),
        Some(Commands::Edit { id, manuscript }) => handle_edit(&mut ctx, id, &manuscript),
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, id),
        Some(Commands::Export { id, output }) => handle_export(&ctx, id, output),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, 1, None, None),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "travelpress=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "travelpress", "travelpress")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PressError::Api("Could not determine data directory".into()))
}

fn build_uploader(config: &PressConfig) -> Result<Box<dyn FileUploader>> {
    if config.upload_preset.is_empty() {
        return Ok(Box::new(DisabledUploader));
    }
    let uploader = match &config.upload_endpoint {
        Some(endpoint) => CloudinaryUploader::with_endpoint(endpoint.clone(), &config.upload_preset)?,
        None if !config.cloud_name.is_empty() => {
            CloudinaryUploader::new(&config.cloud_name, &config.upload_preset)?
        }
        None => return Ok(Box::new(DisabledUploader)),
    };
    tracing::debug!(endpoint = uploader.endpoint(), "Image uploads enabled");
    Ok(Box::new(uploader))
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let paths = PressPaths::new(&data_dir);
    let config = PressConfig::load(&data_dir)?;

    let store = FileStore::open(&data_dir);
    let auth = LocalAuthenticator::with_session_file(config.accounts.clone(), paths.session_file())?;
    let uploader = build_uploader(&config)?;
    let api = TravelApi::new(store, auth, paths, config, Box::new(RustBackend::new()), uploader);

    Ok(AppContext { api })
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map_err(PressError::Io)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_login(ctx: &mut AppContext, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let result = ctx.api.login(&email, &password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.whoami()?;
    print_messages(&result.messages);
    Ok(())
}

/// File names of pending uploads, for progress lines.
fn pending_names(composer: &Composer) -> HashMap<BlockId, String> {
    composer
        .blocks()
        .iter()
        .filter_map(|b| b.pending_file().map(|f| (b.id, f.name.clone())))
        .collect()
}

fn handle_publish(ctx: &mut AppContext, path: &Path, title: String, province: String) -> Result<()> {
    let mut composer = manuscript::load(path)?;
    let names = pending_names(&composer);
    let meta = ArticleMeta::new(title, province);

    let result = ctx.api.publish(&meta, &mut composer, &mut |id, pct| {
        if let Some(name) = names.get(&id) {
            print_progress(name, pct);
        }
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: String, path: &Path) -> Result<()> {
    let composer = manuscript::load(path)?;
    let names = pending_names(&composer);

    let result = ctx.api.revise(&ArticleId::new(id), composer, &mut |id, pct| {
        if let Some(name) = names.get(&id) {
            print_progress(name, pct);
        }
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    page: usize,
    province: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let query = ListQuery {
        page,
        province,
        search,
        ..ctx.api.list_query()
    };
    let result = ctx.api.list(&query)?;
    print_article_list(&result.listed_articles, result.page.as_ref());
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.view(&ArticleId::new(id))?;
    if let (Some(article), Some(body)) = (result.affected_articles.first(), &result.output) {
        print_article(article, body);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.delete(&ArticleId::new(id))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, id: String, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export(&ArticleId::new(id))?;
    let text = result.output.unwrap_or_default();
    match output {
        Some(path) => {
            fs::write(&path, text).map_err(PressError::Io)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
