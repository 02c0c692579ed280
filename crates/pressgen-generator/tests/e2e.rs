//! End-to-end tests for pressgen.
//!
//! These tests build the demo site and small generated sites, then inspect
//! the written files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use pressgen_core::Config;
use pressgen_generator::{BuildError, Builder};
use tempfile::TempDir;

fn demo_site() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/site")
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("read {file}: {e}"))
}

/// Builds the demo site into a fresh directory.
fn build_demo() -> Option<(TempDir, pressgen_generator::BuildStats)> {
    let root = demo_site();
    if !root.exists() {
        return None;
    }

    let config = Config::load(&root.join("pressgen.toml")).expect("demo config should load");
    let output = TempDir::new().expect("create temp dir");
    let stats = Builder::new(config, &root)
        .with_output_dir(output.path())
        .build()
        .expect("demo site should build");

    Some((output, stats))
}

#[test]
fn test_demo_site_stats() {
    let Some((_output, stats)) = build_demo() else {
        return;
    };

    assert_eq!(stats.articles, 6);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.authors, 2);
    assert_eq!(stats.products, 2);
    assert_eq!(stats.assets, 1);
    assert_eq!(stats.pages, 14);
}

#[test]
fn test_demo_site_files() {
    let Some((output, _)) = build_demo() else {
        return;
    };
    let out = output.path();

    for file in [
        "index.html",
        "rust-makin-populer-di-kalangan-developer.html",
        "cara-menyusun-dana-darurat.html",
        "catatan-keuangan-tanpa-tanggal.html",
        "category-teknologi.html",
        "category-keuangan.html",
        "author-1.html",
        "author-2.html",
        "shop.html",
        "product-ui-kit-dashboard.html",
        "product-ebook-investasi-dasar.html",
        "sitemap.xml",
        "style.css",
    ] {
        assert!(out.join(file).exists(), "{file} should exist");
    }

    assert!(!out.join("product-template-lama.html").exists());
    assert!(!out.join("script.js").exists());
}

#[test]
fn test_demo_article_title_in_head_and_body() {
    let Some((output, _)) = build_demo() else {
        return;
    };

    let html = read(output.path(), "rust-makin-populer-di-kalangan-developer.html");
    let head_end = html.find("</head>").expect("head should close");
    let (head, body) = html.split_at(head_end);

    assert!(head.contains("<title>Rust Makin Populer di Kalangan Developer - FORUMID</title>"));
    assert!(head.contains(
        r#"<link rel="canonical" href="https://forumid.github.io/rust-makin-populer-di-kalangan-developer.html">"#
    ));
    assert!(head.contains(r#""@type": "NewsArticle""#));
    assert!(body.contains("<h1>Rust Makin Populer di Kalangan Developer</h1>"));
    assert!(body.contains("<p>Keamanan memori menjadi alasan utama.</p>"));
    assert!(body.contains("10 Maret 2024"));
    assert!(body.contains("Budi Santoso"));
    assert!(body.contains("081234567890"));

    // Surrounding template markup is kept, the placeholder content is not.
    assert!(body.contains(r#"<a href="shop.html">Toko</a>"#));
    assert!(body.contains("<p>&copy; FORUMID</p>"));
    assert!(!body.contains("spinner"));
}

#[test]
fn test_demo_dangling_references_use_placeholder() {
    let Some((output, _)) = build_demo() else {
        return;
    };

    let orphan_author = read(output.path(), "reksa-dana-untuk-pemula.html");
    assert!(orphan_author.contains(r#"<h3 class="author-name">Unknown</h3>"#));
    assert!(orphan_author.contains("https://picsum.photos/seed/unknown/120/120.jpg"));
    assert!(orphan_author.contains("unknown@example.com"));

    let orphan_category = read(output.path(), "catatan-keuangan-tanpa-tanggal.html");
    assert!(orphan_category.contains(r#"<div class="single-news-category">Unknown</div>"#));
    assert!(orphan_category.contains("Invalid Date"));
}

#[test]
fn test_demo_index_selection() {
    let Some((output, _)) = build_demo() else {
        return;
    };

    let html = read(output.path(), "index.html");
    let main_start = html.find("featured-news-main").expect("featured main");
    let secondary_start = html.find("featured-news-secondary").expect("secondary");
    let latest_start = html.find("latest-news").expect("latest");
    let trending_start = html.find("trending-news-list").expect("trending");

    let featured = &html[main_start..secondary_start];
    let secondary = &html[secondary_start..latest_start];
    let latest = &html[latest_start..trending_start];
    let trending = &html[trending_start..];

    assert!(featured.contains("rust-makin-populer-di-kalangan-developer.html"));
    assert!(secondary.contains("cara-menyusun-dana-darurat.html"));
    assert!(secondary.contains("mengenal-edge-computing.html"));
    assert!(latest.contains("tips-merawat-baterai-laptop.html"));
    assert!(latest.contains("reksa-dana-untuk-pemula.html"));
    assert!(latest.contains("catatan-keuangan-tanpa-tanggal.html"));
    assert_eq!(trending.matches(r#"<li class="trending-news-item">"#).count(), 5);
    assert!(!trending.contains("catatan-keuangan-tanpa-tanggal.html"));
    assert!(html.contains(r#""@type": "WebSite""#));
}

#[test]
fn test_demo_listing_pages() {
    let Some((output, _)) = build_demo() else {
        return;
    };

    let keuangan = read(output.path(), "category-keuangan.html");
    assert!(keuangan.contains("<span>2 Berita</span>"));
    assert!(!keuangan.contains("catatan-keuangan-tanpa-tanggal.html"));

    let sari = read(output.path(), "author-2.html");
    assert!(sari.contains(r#"<div class="author-stat-number">3</div>"#));

    let shop = read(output.path(), "shop.html");
    assert!(shop.contains("UI Kit Dashboard"));
    assert!(shop.contains("Rp1.250.000"));
    assert!(!shop.contains("Template Lama"));
    assert!(shop.contains(
        "https://wa.me/6285867271777?text=Saya%20tertarik%20dengan%20produk%20Ebook%20Investasi%20Dasar"
    ));
}

#[test]
fn test_demo_sitemap() {
    let Some((output, stats)) = build_demo() else {
        return;
    };

    let xml = read(output.path(), "sitemap.xml");
    assert_eq!(xml.matches("<url>").count(), stats.pages);
    assert!(xml.contains("<loc>https://forumid.github.io/</loc>"));
    assert!(xml.contains(
        "<loc>https://forumid.github.io/rust-makin-populer-di-kalangan-developer.html</loc>\n    <lastmod>2024-03-10T02:00:00.000Z</lastmod>"
    ));
    assert!(xml.contains("<loc>https://forumid.github.io/category-teknologi.html</loc>"));
    assert!(xml.contains("<loc>https://forumid.github.io/author-1.html</loc>"));
    assert!(!xml.contains("product-template-lama"));
    assert!(!xml.contains("index.html"));
}

#[test]
fn test_demo_template_is_untouched() {
    let root = demo_site();
    if !root.exists() {
        return;
    }
    let before = read(&root, "index.html");

    let Some(_) = build_demo() else {
        return;
    };

    assert_eq!(read(&root, "index.html"), before);
}

#[test]
fn test_slug_collision_last_write_wins() {
    let root = TempDir::new().expect("create temp dir");
    fs::copy(demo_site().join("index.html"), root.path().join("index.html"))
        .expect("copy template");
    fs::write(
        root.path().join("Teknologi.json"),
        r#"[
            {"title": "Tips Trik!", "date": "2024-01-01"},
            {"title": "Tips & Trik", "date": "2024-01-02"}
        ]"#,
    )
    .expect("write posts");

    let mut config = Config::default();
    config.site.base_url = "https://example.com".to_string();
    let stats = Builder::new(config, root.path()).build().expect("build");

    let out = root.path().join("dist");
    assert_eq!(stats.articles, 2);

    let page = read(&out, "tips-trik.html");
    assert!(page.contains("<h1>Tips Trik!</h1>"));

    let xml = read(&out, "sitemap.xml");
    assert_eq!(
        xml.matches("<loc>https://example.com/tips-trik.html</loc>").count(),
        2
    );
}

#[test]
fn test_missing_template_writes_nothing() {
    let root = TempDir::new().expect("create temp dir");
    fs::write(root.path().join("Teknologi.json"), r#"[{"title": "A"}]"#).expect("write posts");

    let result = Builder::new(Config::default(), root.path()).build();

    assert!(matches!(result, Err(BuildError::TemplateNotFound(_))));
    assert!(!root.path().join("dist").exists());
}

#[test]
fn test_missing_data_files_still_build() {
    let root = TempDir::new().expect("create temp dir");
    fs::copy(demo_site().join("index.html"), root.path().join("index.html"))
        .expect("copy template");
    fs::write(root.path().join("penulis.json"), "{ broken").expect("write authors");

    let stats = Builder::new(Config::default(), root.path())
        .build()
        .expect("build should degrade to empty collections");

    assert_eq!(stats.articles, 0);
    assert_eq!(stats.authors, 0);
    assert_eq!(stats.pages, 2);

    let index = read(&root.path().join("dist"), "index.html");
    assert!(!index.contains("featured-news-main"));
}

#[test]
fn test_index_picks_latest_across_files() {
    let root = TempDir::new().expect("create temp dir");
    fs::copy(demo_site().join("index.html"), root.path().join("index.html"))
        .expect("copy template");
    let posts = |days: &[u32]| {
        let entries: Vec<String> = days
            .iter()
            .map(|day| format!(r#"{{"title": "Hari {day}", "date": "2024-01-0{day}"}}"#))
            .collect();
        format!("[{}]", entries.join(","))
    };
    fs::write(root.path().join("Teknologi.json"), posts(&[3, 8, 1, 6])).expect("write posts");
    fs::write(root.path().join("Keuangan.json"), posts(&[5, 2, 7, 4])).expect("write posts");

    let stats = Builder::new(Config::default(), root.path())
        .build()
        .expect("build");
    assert_eq!(stats.articles, 8);

    let html = read(&root.path().join("dist"), "index.html");
    let section = |start: &str, end: &str| {
        let from = html.find(start).expect("section start");
        let to = html[from..].find(end).map_or(html.len(), |i| from + i);
        html[from..to].to_string()
    };

    let featured = section("featured-news-main", "featured-news-secondary");
    let secondary = section("featured-news-secondary", "latest-news");
    let latest = section("latest-news", "trending-news-list");
    let trending = section("trending-news-list", "</ul>");

    assert!(featured.contains("hari-8.html"));
    let seventh = secondary.find("hari-7.html").expect("secondary item");
    let sixth = secondary.find("hari-6.html").expect("secondary item");
    assert!(seventh < sixth);

    let positions: Vec<_> = ["hari-5.html", "hari-4.html", "hari-3.html"]
        .iter()
        .map(|href| latest.find(href).expect("latest card"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let ranked: Vec<_> = (4..=8)
        .rev()
        .map(|day| {
            trending
                .find(&format!("hari-{day}.html"))
                .expect("trending item")
        })
        .collect();
    assert!(ranked.windows(2).all(|w| w[0] < w[1]));

    assert!(!html.contains("hari-2.html"));
    assert!(!html.contains("hari-1.html"));
}
