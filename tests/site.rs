//! End-to-end runs over a site written to disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;
use waymark::build::Builder;
use waymark::cli::check::check_redirects;
use waymark::cli::common::Site;
use waymark::cli::Cli;
use waymark::config::SiteConfig;
use waymark::env::ResolveOptions;
use waymark::report::BufferReporter;

const CONFIG: &str = r#"
[site]
url = "https://example.org/"

[redirect]
template = "redirect.html"
map_file = ".redirect.map"
"#;

fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Demo site: four redirects, one per kind of declaration.
fn demo_site(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "waymark.toml", config);
    write(root, "content/contents.toml", "title = \"Welcome\"\n");
    write(root, "content/about/contents.toml", "title = \"About\"\n");
    write(
        root,
        "content/about/more-detail/contents.toml",
        "title = \"More Detail\"\nredirect_from = \"\"\"\ninfo\n/details\n\"\"\"\n",
    );
    write(
        root,
        "content/projects/contents.toml",
        "title = \"Projects\"\n_hidden = true\nredirect_from = [\"about/projects.html\"]\n",
    );
    write(root, "content/images/contents.toml", "title = \"Images\"\n");
    write(root, "content/images/apple-pie.jpg", "not really a jpeg");
    write(
        root,
        "content/images/apple-pie.jpg.toml",
        "redirect_from = [\"apple-cake.jpg\"]\n",
    );
    write(root, "assets/static/style.css", "body {}\n");
    dir
}

fn load(dir: &TempDir, command: &str) -> (Site, Arc<BufferReporter>) {
    let config_path = dir.path().join("waymark.toml");
    let cli = Cli::try_parse_from([
        "waymark",
        "-C",
        config_path.to_str().unwrap(),
        command,
    ])
    .unwrap();
    let config = SiteConfig::load(&cli).unwrap();
    let reporter = Arc::new(BufferReporter::new());
    let site = Site::load_with(config, reporter.clone()).unwrap();
    (site, reporter)
}

#[test]
fn test_build_writes_pages_and_map() {
    let dir = demo_site(CONFIG);
    let (site, _) = load(&dir, "build");
    let summary = Builder::new(site.pad, site.plugin).build_all().unwrap();

    assert_eq!(summary.redirects, 4);
    assert_eq!(summary.maps, 1);

    let public = dir.path().join("public");
    for page in [
        "about/info/index.html",
        "about/projects.html",
        "details/index.html",
        "images/apple-cake.jpg/index.html",
    ] {
        let html = fs::read_to_string(public.join(page)).unwrap();
        assert!(html.contains("<link rel=\"canonical\""), "{page}");
    }
    let projects = fs::read_to_string(public.join("about/projects.html")).unwrap();
    assert!(projects.contains("href=\"/projects/\""));

    let map = fs::read_to_string(public.join(".redirect.map")).unwrap();
    assert_eq!(
        map,
        "/about/info/ /about/more-detail/;\n\
         /about/projects.html /projects/;\n\
         /details/ /about/more-detail/;\n\
         /images/apple-cake.jpg /images/apple-pie.jpg;\n"
    );
}

#[test]
fn test_build_records_sources_as_dependencies() {
    let dir = demo_site(CONFIG);
    let (site, _) = load(&dir, "build");
    let summary = Builder::new(site.pad, site.plugin).build_all().unwrap();

    let deps = summary
        .dependencies_of("/images/apple-cake.jpg/index.html")
        .unwrap();
    assert!(deps.iter().any(|p| p.ends_with("waymark.toml")));
    assert!(deps.iter().any(|p| p.ends_with("images/apple-pie.jpg")));
    assert!(deps.iter().any(|p| p.ends_with("images/apple-pie.jpg.toml")));
}

#[test]
fn test_custom_template_from_templates_dir() {
    let config = "[redirect]\ntemplate = \"moved.html\"\n";
    let dir = demo_site(config);
    write(
        dir.path(),
        "templates/moved.html",
        "<p>moved to __TARGET_URL__</p>\n",
    );
    let (site, _) = load(&dir, "build");
    let summary = Builder::new(site.pad, site.plugin).build_all().unwrap();

    assert_eq!(summary.maps, 0);
    let html = fs::read_to_string(dir.path().join("public/details/index.html")).unwrap();
    assert_eq!(html, "<p>moved to /about/more-detail/</p>\n");

    let deps = summary.dependencies_of("/details/index.html").unwrap();
    assert!(deps.iter().any(|p| p.ends_with("templates/moved.html")));
}

#[test]
fn test_site_url_prefixes_map_targets() {
    let config = "[site]\nurl = \"https://example.org/prefix/\"\n\n\
                  [redirect]\nmap_file = \".redirect.map\"\n";
    let dir = demo_site(config);
    let (site, _) = load(&dir, "map");
    let entries = site.plugin.iter_redirect_map(&site.pad);

    assert_eq!(entries.len(), 4);
    assert!(entries.contains(&(
        "/prefix/details/".to_string(),
        "/prefix/about/more-detail/".to_string()
    )));
}

#[test]
fn test_resolve_redirect_url() {
    let dir = demo_site(CONFIG);
    let (site, _) = load(&dir, "check");

    let resolved = site
        .pad
        .resolve_url_path("/details/", ResolveOptions::default())
        .unwrap();
    assert!(resolved.as_virtual().is_some());

    let resolved = site
        .pad
        .resolve_url_path("/details/", ResolveOptions::without_redirects());
    assert!(resolved.is_none());
}

#[test]
fn test_check_reports_conflicts() {
    let dir = demo_site(CONFIG);
    write(
        dir.path(),
        "content/images/contents.toml",
        "title = \"Images\"\nredirect_from = [\"/details\", \"/static/style.css\"]\n",
    );
    let (site, _) = load(&dir, "check");
    let report = check_redirects(&site.pad);

    assert_eq!(report.valid, 3);
    assert_eq!(report.invalid.len(), 3);
    assert!(
        report
            .invalid
            .iter()
            .any(|err| err.to_string().contains("existing record <Asset path='/static/style.css'>"))
    );
}

#[test]
fn test_conflicting_redirects_are_left_out_of_the_build() {
    let dir = demo_site(CONFIG);
    write(
        dir.path(),
        "content/about/contents.toml",
        "title = \"About\"\nredirect_from = [\"/projects\"]\n",
    );
    let (site, reporter) = load(&dir, "build");
    let summary = Builder::new(site.pad, site.plugin).build_all().unwrap();

    assert_eq!(summary.redirects, 4);
    assert!(!dir.path().join("public/projects/index.html").exists());
    assert!(reporter.contains("Invalid redirect"));
}
