use crate::domain::model::ContentKind;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// 設定檔所在目錄，相對的內容目錄以此為基準
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub root_domain: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Local development suffix rewritten to the root domain, e.g. `.localhost:3000`.
    #[serde(default = "default_dev_suffix")]
    pub dev_suffix: String,
    /// Deployment-preview host suffix, e.g. `vercel.app`.
    #[serde(default)]
    pub preview_suffix: Option<String>,
    #[serde(default = "default_preview_separator")]
    pub preview_separator: String,
    #[serde(default = "default_main_segment")]
    pub main_segment: String,
    /// Hosts served by the main site besides the root domain itself.
    #[serde(default = "default_main_hosts")]
    pub main_hosts: Vec<String>,
    #[serde(default)]
    pub apps: Vec<AppRoute>,
    #[serde(default)]
    pub redirects: Vec<RedirectRoute>,
    #[serde(default = "default_bypass_prefixes")]
    pub bypass_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoute {
    pub subdomain: String,
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRoute {
    pub host: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    pub blog: Option<ContentSource>,
    pub careers: Option<ContentSource>,
    pub portfolio: Option<ContentSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSource {
    pub directory: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    pub boolean_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_dev_suffix() -> String {
    ".localhost:3000".to_string()
}

fn default_preview_separator() -> String {
    "---".to_string()
}

fn default_main_segment() -> String {
    "portfolio".to_string()
}

fn default_main_hosts() -> Vec<String> {
    vec!["localhost:3000".to_string()]
}

fn default_bypass_prefixes() -> Vec<String> {
    ["api/", "_next/", "_static/", "_vercel", "images/", "icons/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_extensions() -> Vec<String> {
    vec!["mdx".to_string()]
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            dev_suffix: default_dev_suffix(),
            preview_suffix: None,
            preview_separator: default_preview_separator(),
            main_segment: default_main_segment(),
            main_hosts: default_main_hosts(),
            apps: Vec::new(),
            redirects: Vec::new(),
            bypass_prefixes: default_bypass_prefixes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ContentConfig {
    pub fn source(&self, kind: ContentKind) -> Option<&ContentSource> {
        match kind {
            ContentKind::Blog => self.blog.as_ref(),
            ContentKind::Careers => self.careers.as_ref(),
            ContentKind::Portfolio => self.portfolio.as_ref(),
        }
    }

    pub fn configured(&self) -> impl Iterator<Item = (ContentKind, &ContentSource)> {
        ContentKind::ALL
            .into_iter()
            .filter_map(move |kind| self.source(kind).map(|source| (kind, source)))
    }
}

impl ContentSource {
    pub fn boolean_fields_for(&self, kind: ContentKind) -> Vec<String> {
        self.boolean_fields
            .clone()
            .unwrap_or_else(|| kind.default_boolean_fields())
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROOT_DOMAIN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn root_domain(&self) -> &str {
        &self.site.root_domain
    }

    /// 內容目錄的實際路徑；相對路徑以設定檔目錄為基準
    pub fn content_dir(&self, kind: ContentKind) -> Option<PathBuf> {
        let source = self.content.source(kind)?;
        let dir = PathBuf::from(&source.directory);
        match &self.base_dir {
            Some(base) if dir.is_relative() => Some(base.join(dir)),
            _ => Some(dir),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| SiteError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("Not a socket address: {}", e),
            })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("site.name", &self.site.name)?;
        validate_host("site.root_domain", &self.site.root_domain)?;
        if let Some(base_url) = &self.site.base_url {
            validation::validate_url("site.base_url", base_url)?;
        }

        let routing = &self.routing;
        validation::validate_segment("routing.main_segment", &routing.main_segment)?;
        for host in &routing.main_hosts {
            validate_host("routing.main_hosts", host)?;
        }

        for app in &routing.apps {
            validate_host("routing.apps.subdomain", &app.subdomain)?;
            validation::validate_segment("routing.apps.segment", &app.segment)?;
        }
        validation::validate_unique(
            "routing.apps.subdomain",
            routing.apps.iter().map(|a| a.subdomain.as_str()),
        )?;

        for redirect in &routing.redirects {
            validate_host("routing.redirects.host", &redirect.host)?;
            validation::validate_url("routing.redirects.location", &redirect.location)?;
        }
        validation::validate_unique(
            "routing.redirects.host",
            routing.redirects.iter().map(|r| r.host.as_str()),
        )?;

        for (kind, source) in self.content.configured() {
            let field = format!("content.{}", kind);
            validation::validate_path(&format!("{}.directory", field), &source.directory)?;
            validation::validate_file_extensions(
                &format!("{}.extensions", field),
                &source.extensions,
            )?;
        }

        self.bind_addr()?;

        Ok(())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

fn validate_host(field: &str, host: &str) -> Result<()> {
    validation::validate_non_empty_string(field, host)?;
    // 環境變數未設定時 ${VAR} 會原樣留下
    if host.contains("${") {
        return Err(SiteError::MissingConfigError {
            field: format!("{} ({})", field, host),
        });
    }
    if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(SiteError::InvalidConfigValueError {
            field: field.to_string(),
            value: host.to_string(),
            reason: "Expected a bare host name without scheme or path".to_string(),
        });
    }
    Ok(())
}
