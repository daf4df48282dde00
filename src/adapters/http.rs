//! HTTP front end: routes every request by hostname, then answers with the
//! JSON page model the renderer consumes.

use crate::adapters::fs_store::FsContentStore;
use crate::config::toml_config::SiteConfig;
use crate::core::pages::{self, PageRequest, SiteTree};
use crate::core::query;
use crate::core::router::DomainRouter;
use crate::domain::model::{
    BlogMetadata, CareerMetadata, ContentEntry, ContentKind, PortfolioMetadata, RouteDecision,
};
use crate::domain::ports::ContentStore;
use crate::utils::error::{Result, SiteError};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const REWRITTEN_PATH_HEADER: &str = "x-rewritten-path";

const HIGHLIGHT_FIELD: &str = "highlighted";
const RELATED_POSTS: usize = 3;
const MORE_POSTS: usize = 4;
const FEATURED_POSTS: usize = 3;

/// Everything a request handler needs; built once at startup.
pub struct SiteState {
    site_name: String,
    main_segment: String,
    router: DomainRouter,
    stores: HashMap<ContentKind, Arc<dyn ContentStore>>,
}

impl SiteState {
    pub fn new(site_name: impl Into<String>, main_segment: impl Into<String>, router: DomainRouter) -> Self {
        Self {
            site_name: site_name.into(),
            main_segment: main_segment.into(),
            router,
            stores: HashMap::new(),
        }
    }

    pub fn with_store(mut self, kind: ContentKind, store: Arc<dyn ContentStore>) -> Self {
        self.stores.insert(kind, store);
        self
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        let router = DomainRouter::new(config.root_domain(), &config.routing);
        let mut state = Self::new(&config.site.name, &config.routing.main_segment, router);

        for (kind, source) in config.content.configured() {
            if let Some(dir) = config.content_dir(kind) {
                tracing::info!("📁 {} content from {}", kind, dir.display());
                let store = FsContentStore::from_source(kind, dir, source);
                state = state.with_store(kind, Arc::new(store));
            }
        }

        state
    }

    pub fn router(&self) -> &DomainRouter {
        &self.router
    }

    pub fn store(&self, kind: ContentKind) -> Option<&Arc<dyn ContentStore>> {
        self.stores.get(&kind)
    }

    /// Builds the page model; content errors propagate and become a 500.
    pub async fn render(&self, page: &PageRequest, params: &ListingParams) -> Result<(StatusCode, Value)> {
        match page {
            PageRequest::Home { tree } => self.render_home(*tree).await,
            PageRequest::Section { tree, name } => Ok((
                StatusCode::OK,
                json!({ "page": "section", "site": self.site_name, "tree": tree, "name": name }),
            )),
            PageRequest::Listing { tree, kind } => self.render_listing(*tree, *kind, params).await,
            PageRequest::Detail { tree, kind, slug } => self.render_detail(*tree, *kind, slug).await,
            PageRequest::App { segment, rest } => Ok((
                StatusCode::OK,
                json!({ "page": "app", "site": self.site_name, "segment": segment, "rest": rest }),
            )),
            PageRequest::TenantPlaceholder { domain, rest } => Ok((
                StatusCode::OK,
                json!({
                    "page": "tenant_placeholder",
                    "domain": domain,
                    "rest": rest,
                    "message": format!("{} is still being built", domain),
                }),
            )),
            PageRequest::NotFound => Ok(not_found()),
        }
    }

    async fn render_home(&self, tree: SiteTree) -> Result<(StatusCode, Value)> {
        let (kind, featured) = match tree {
            SiteTree::Portfolio => (ContentKind::Portfolio, self.sorted(ContentKind::Portfolio).await?),
            SiteTree::Corporate => (ContentKind::Blog, self.sorted(ContentKind::Blog).await?),
        };
        let featured: Vec<ContentEntry> = featured.into_iter().take(FEATURED_POSTS).collect();

        Ok((
            StatusCode::OK,
            json!({
                "page": "home",
                "site": self.site_name,
                "tree": tree,
                "featured_kind": kind,
                "featured": featured,
            }),
        ))
    }

    async fn render_listing(
        &self,
        tree: SiteTree,
        kind: ContentKind,
        params: &ListingParams,
    ) -> Result<(StatusCode, Value)> {
        if self.store(kind).is_none() {
            tracing::warn!("No {} content configured", kind);
            return Ok(not_found());
        }

        let entries = self.sorted(kind).await?;
        let categories = query::categories(&entries);
        let entries = match &params.category {
            Some(category) => query::filter_by_category(entries, category),
            None => entries,
        };
        let limit = params.limit.unwrap_or(usize::MAX);
        let page = query::paginate(entries, params.offset.unwrap_or(0), limit);

        Ok((
            StatusCode::OK,
            json!({
                "page": "listing",
                "site": self.site_name,
                "tree": tree,
                "kind": kind,
                "categories": categories,
                "total": page.total,
                "has_more": page.has_more(),
                "entries": page.items,
            }),
        ))
    }

    async fn render_detail(&self, tree: SiteTree, kind: ContentKind, slug: &str) -> Result<(StatusCode, Value)> {
        let Some(store) = self.store(kind) else {
            return Ok(not_found());
        };

        let Some(entry) = store.find_by_slug(slug).await? else {
            tracing::info!("🔍 No {} entry for slug '{}'", kind, slug);
            return Ok(not_found());
        };

        // 型別化欄位在此檢查；缺欄位就是渲染錯誤
        let (schema, related, more) = match kind {
            ContentKind::Blog => (serde_json::to_value(entry.metadata_as::<BlogMetadata>()?)?, Vec::new(), Vec::new()),
            ContentKind::Careers => {
                let meta: CareerMetadata = entry.metadata_as()?;
                let mut value = serde_json::to_value(&meta)?;
                value["disclosedSalary"] = json!(meta.disclosed_salary());
                (value, Vec::new(), Vec::new())
            }
            ContentKind::Portfolio => {
                let meta: PortfolioMetadata = entry.metadata_as()?;
                let all = self.sorted(kind).await?;
                let related: Vec<ContentEntry> = query::related_posts(&entry, &all, RELATED_POSTS)
                    .into_iter()
                    .cloned()
                    .collect();
                let more: Vec<ContentEntry> = query::more_posts(&entry, &all, MORE_POSTS)
                    .into_iter()
                    .cloned()
                    .collect();
                (serde_json::to_value(meta)?, related, more)
            }
        };

        Ok((
            StatusCode::OK,
            json!({
                "page": "detail",
                "site": self.site_name,
                "tree": tree,
                "kind": kind,
                "entry": entry,
                "fields": schema,
                "related": related,
                "more": more,
            }),
        ))
    }

    /// Portfolio posts put highlighted ones first; everything else is newest first.
    async fn sorted(&self, kind: ContentKind) -> Result<Vec<ContentEntry>> {
        let Some(store) = self.store(kind) else {
            return Ok(Vec::new());
        };
        let mut entries = store.list_all().await?;
        match kind {
            ContentKind::Portfolio => query::sort_highlighted_first(&mut entries, HIGHLIGHT_FIELD),
            ContentKind::Blog | ContentKind::Careers => query::sort_by_published_desc(&mut entries),
        }
        Ok(entries)
    }
}

/// `category`, `offset` and `limit` from the query string; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub category: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl ListingParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "category" if !value.is_empty() => params.category = Some(value.into_owned()),
                "offset" => params.offset = value.parse().ok(),
                "limit" => params.limit = value.parse().ok(),
                _ => {}
            }
        }
        params
    }
}

fn not_found() -> (StatusCode, Value) {
    (StatusCode::NOT_FOUND, json!({ "page": "not_found" }))
}

fn error_response(status: StatusCode, err: &SiteError) -> Response {
    (
        status,
        Json(json!({
            "page": "error",
            "error": err.to_string(),
            "suggestion": err.recovery_suggestion(),
        })),
    )
        .into_response()
}

async fn handle_request(State(state): State<Arc<SiteState>>, headers: HeaderMap, uri: Uri) -> Response {
    let path = uri.path();

    if !state.router.should_route(path) {
        tracing::debug!("Bypassing router for {}", path);
        let (status, body) = not_found();
        return (status, Json(body)).into_response();
    }

    let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
        tracing::warn!("⚠️ Rejecting request for {} without Host header", path);
        return error_response(StatusCode::BAD_REQUEST, &SiteError::MissingHostHeader);
    };

    let decision = state.router.route(host, path, uri.query());
    if let RouteDecision::Redirect { location } = &decision {
        tracing::info!("↪️ {} redirected to {}", host, location);
        return Redirect::temporary(location).into_response();
    }

    let page = pages::resolve(&decision, &state.main_segment).unwrap_or(PageRequest::NotFound);
    let params = ListingParams::from_query(decision.query());

    let mut response = match state.render(&page, &params).await {
        Ok((status, body)) => {
            tracing::info!("{} {}{} -> {} ({})", status.as_u16(), host, path, decision.target(), page_name(&page));
            (status, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                "❌ Failed to render {} for {}{}: {} (Category: {:?})",
                decision.target(),
                host,
                path,
                e,
                e.category()
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    };

    if let Some(rewritten) = decision.rewritten_path() {
        if let Ok(value) = HeaderValue::from_str(rewritten) {
            response.headers_mut().insert(REWRITTEN_PATH_HEADER, value);
        }
    }
    response
}

fn page_name(page: &PageRequest) -> &'static str {
    match page {
        PageRequest::Home { .. } => "home",
        PageRequest::Section { .. } => "section",
        PageRequest::Listing { .. } => "listing",
        PageRequest::Detail { .. } => "detail",
        PageRequest::App { .. } => "app",
        PageRequest::TenantPlaceholder { .. } => "tenant_placeholder",
        PageRequest::NotFound => "not_found",
    }
}

pub fn app(state: Arc<SiteState>) -> Router {
    Router::new().fallback(handle_request).with_state(state)
}

pub async fn serve<F>(listener: TcpListener, state: Arc<SiteState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("🚀 Serving {} on http://{}", state.site_name, addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SiteError::ServerError {
            message: e.to_string(),
        })
}
