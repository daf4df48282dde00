use multisite::{DomainRouter, RouteDecision, SiteConfig};

const SITE: &str = r#"
[site]
name = "Example"
root_domain = "example.com"

[routing]
preview_suffix = "vercel.app"
main_hosts = ["localhost:3000", "192.168.0.114:3000"]

[[routing.apps]]
subdomain = "photography"
segment = "photography"

[[routing.apps]]
subdomain = "store"
segment = "store"

[[routing.redirects]]
host = "vercel.pub"
location = "https://vercel.com/blog/platforms-starter-kit"
"#;

fn router() -> DomainRouter {
    let config = SiteConfig::from_toml_str(SITE).unwrap();
    DomainRouter::new(config.root_domain(), &config.routing)
}

#[test]
fn test_photography_requests_rewrite_identically() {
    let router = router();
    let first = router.route("photography.example.com", "/gallery", Some("sort=new&page=2"));
    let second = router.route("photography.example.com", "/gallery", Some("sort=new&page=2"));

    assert_eq!(first, second);
    assert_eq!(first.rewritten_path(), Some("/photography/gallery"));
    assert_eq!(first.query(), Some("sort=new&page=2"));
    assert_eq!(first.target(), "/photography/gallery?sort=new&page=2");
}

#[test]
fn test_root_domain_prefix_already_present() {
    let decision = router().route("example.com", "/portfolio/about", None);
    assert_eq!(
        decision,
        RouteDecision::Main {
            path: "/portfolio/about".to_string(),
            query: None,
            passthrough: true,
        }
    );
}

#[test]
fn test_root_domain_gets_prefix() {
    let decision = router().route("example.com", "/about", None);
    assert_eq!(decision.rewritten_path(), Some("/portfolio/about"));
}

#[test]
fn test_unknown_tenant_catch_all() {
    let decision = router().route("unknown-tenant.test", "/anything", None);
    assert_eq!(decision.rewritten_path(), Some("/unknown-tenant.test/anything"));
}

#[test]
fn test_rewrite_twice_equals_once() {
    let router = router();
    for path in ["/", "/about", "/blogs/hello-world", "/portfolio/blogs"] {
        let once = router.route("example.com", path, None);
        let again = router.route("example.com", once.rewritten_path().unwrap(), None);
        assert_eq!(once.rewritten_path(), again.rewritten_path(), "path {}", path);
    }
}

#[test]
fn test_redirect_wins_over_everything() {
    let decision = router().route("vercel.pub", "/portfolio", None);
    assert!(decision.is_redirect());
    assert_eq!(decision.rewritten_path(), None);
}

#[test]
fn test_local_development_and_preview_hosts() {
    let router = router();
    assert_eq!(
        router.route("store.localhost:3000", "/", None).rewritten_path(),
        Some("/store")
    );
    assert_eq!(
        router.route("localhost:3000", "/about", None).rewritten_path(),
        Some("/portfolio/about")
    );
    assert_eq!(
        router
            .route("photography---feature-branch.vercel.app", "/gallery", None)
            .rewritten_path(),
        Some("/photography/gallery")
    );
}

#[test]
fn test_every_host_gets_exactly_one_outcome() {
    let router = router();
    let hosts = [
        "vercel.pub",
        "photography.example.com",
        "example.com",
        "localhost:3000",
        "nobody.example.org",
        "",
    ];
    for host in hosts {
        let decision = router.route(host, "/x", None);
        assert!(decision.is_redirect() || decision.rewritten_path().is_some(), "{}", host);
    }
}
