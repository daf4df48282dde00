use crate::utils::error::{Result, SiteError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single header field after type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    List(Vec<String>),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Header-block fields keyed by name. Unknown keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, FieldValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// 後出現的同名欄位覆蓋前者
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(FieldValue::as_text)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key) {
            Some(FieldValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One parsed content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub slug: String,
    pub metadata: Metadata,
    pub content: String,
}

impl ContentEntry {
    /// 將動態欄位轉成指定的型別化結構；缺少必要欄位時回傳 SchemaError
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(&self.metadata)?;
        serde_json::from_value(value).map_err(|e| SiteError::SchemaError {
            slug: self.slug.clone(),
            message: e.to_string(),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get_str("title")
    }

    pub fn published_at(&self) -> Option<&str> {
        self.metadata.get_str("publishedAt")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogMetadata {
    pub title: String,
    pub published_at: String,
    pub summary: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMetadata {
    pub title: String,
    pub published_at: String,
    pub summary: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub job_location_type: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CareerMetadata {
    /// "Undisclosed" 視為未公開薪資
    pub fn disclosed_salary(&self) -> Option<&str> {
        self.salary
            .as_deref()
            .filter(|s| !s.eq_ignore_ascii_case("undisclosed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetadata {
    pub id: String,
    pub title: String,
    pub published_at: String,
    pub summary: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub read_time: String,
    #[serde(default)]
    pub highlighted: bool,
}

/// The three content collections served by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Blog,
    Careers,
    Portfolio,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Blog, ContentKind::Careers, ContentKind::Portfolio];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Careers => "careers",
            ContentKind::Portfolio => "portfolio",
        }
    }

    pub fn default_boolean_fields(&self) -> Vec<String> {
        match self {
            ContentKind::Portfolio => vec!["highlighted".to_string()],
            ContentKind::Blog | ContentKind::Careers => Vec::new(),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blog" | "blogs" => Ok(ContentKind::Blog),
            "careers" | "career" | "jobs" => Ok(ContentKind::Careers),
            "portfolio" => Ok(ContentKind::Portfolio),
            other => Err(SiteError::InvalidConfigValueError {
                field: "content kind".to_string(),
                value: other.to_string(),
                reason: "Expected one of: blog, careers, portfolio".to_string(),
            }),
        }
    }
}

/// Outcome of routing one request. Exactly one variant applies per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteDecision {
    Redirect {
        location: String,
    },
    App {
        segment: String,
        path: String,
        query: Option<String>,
    },
    Main {
        path: String,
        query: Option<String>,
        passthrough: bool,
    },
    Tenant {
        hostname: String,
        path: String,
        query: Option<String>,
    },
}

impl RouteDecision {
    /// 內部路徑（不含查詢字串）；重新導向時為 None
    pub fn rewritten_path(&self) -> Option<&str> {
        match self {
            RouteDecision::Redirect { .. } => None,
            RouteDecision::App { path, .. }
            | RouteDecision::Main { path, .. }
            | RouteDecision::Tenant { path, .. } => Some(path),
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            RouteDecision::Redirect { .. } => None,
            RouteDecision::App { query, .. }
            | RouteDecision::Main { query, .. }
            | RouteDecision::Tenant { query, .. } => query.as_deref(),
        }
    }

    /// Internal path with the original query string re-attached.
    pub fn target(&self) -> String {
        match self {
            RouteDecision::Redirect { location } => location.clone(),
            _ => {
                let path = self.rewritten_path().unwrap_or("/");
                match self.query() {
                    Some(q) if !q.is_empty() => format!("{}?{}", path, q),
                    _ => path.to_string(),
                }
            }
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, RouteDecision::Redirect { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio_entry() -> ContentEntry {
        let mut metadata = Metadata::new();
        metadata.insert("id", "1");
        metadata.insert("title", "Hiring at Scale");
        metadata.insert("publishedAt", "2024-03-01");
        metadata.insert("summary", "Notes");
        metadata.insert("category", "Talent Strategy");
        metadata.insert("readTime", "5 min");
        metadata.insert("highlighted", true);
        metadata.insert("images", vec!["a.png".to_string(), "b.png".to_string()]);
        metadata.insert("mood", "sunny");
        ContentEntry {
            slug: "hiring-at-scale".to_string(),
            metadata,
            content: "Body".to_string(),
        }
    }

    #[test]
    fn test_metadata_as_portfolio_schema() {
        let entry = portfolio_entry();
        let meta: PortfolioMetadata = entry.metadata_as().unwrap();
        assert_eq!(meta.title, "Hiring at Scale");
        assert!(meta.highlighted);
        assert_eq!(meta.images, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_metadata_as_reports_missing_field() {
        let mut entry = portfolio_entry();
        entry.metadata = Metadata::new();
        entry.metadata.insert("title", "Only a title");

        let err = entry.metadata_as::<BlogMetadata>().unwrap_err();
        assert!(matches!(err, SiteError::SchemaError { ref slug, .. } if slug == "hiring-at-scale"));
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let entry = portfolio_entry();
        assert_eq!(entry.metadata.get_str("mood"), Some("sunny"));
    }

    #[test]
    fn test_disclosed_salary() {
        let mut meta = CareerMetadata {
            title: "Recruiter".to_string(),
            published_at: "2024-01-01".to_string(),
            summary: "Join us".to_string(),
            location: "Chennai".to_string(),
            employment_type: "Full-time".to_string(),
            salary: Some("Undisclosed".to_string()),
            currency_code: Some("INR".to_string()),
            country_code: Some("IN".to_string()),
            job_location_type: None,
            image: None,
        };
        assert_eq!(meta.disclosed_salary(), None);
        meta.salary = Some("1200000".to_string());
        assert_eq!(meta.disclosed_salary(), Some("1200000"));
    }

    #[test]
    fn test_route_decision_target_keeps_query() {
        let decision = RouteDecision::App {
            segment: "photography".to_string(),
            path: "/photography/gallery".to_string(),
            query: Some("page=2".to_string()),
        };
        assert_eq!(decision.target(), "/photography/gallery?page=2");
        assert_eq!(decision.rewritten_path(), Some("/photography/gallery"));
    }

    #[test]
    fn test_content_kind_from_str() {
        assert_eq!("Blog".parse::<ContentKind>().unwrap(), ContentKind::Blog);
        assert_eq!("jobs".parse::<ContentKind>().unwrap(), ContentKind::Careers);
        assert!("photos".parse::<ContentKind>().is_err());
    }
}
