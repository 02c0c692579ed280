//! Sitemap generation.
//!
//! Generates the XML sitemap listing every rendered page.

use std::io::Write;

use chrono::{DateTime, Utc};
use pressgen_core::{Config, Page, format::parse_date};
use thiserror::Error;
use tracing::{debug, warn};

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification time.
    pub lastmod: DateTime<Utc>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate sitemap XML: the home entry followed by one entry per page,
    /// in the given order.
    ///
    /// Pages are not deduplicated. A page date that cannot be parsed falls
    /// back to `now` with a warning instead of failing the build.
    #[must_use]
    pub fn generate(&self, pages: &[Page], now: DateTime<Utc>) -> String {
        debug!(count = pages.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        let home = SitemapUrl {
            loc: self.config.url_for(""),
            lastmod: now,
            changefreq: ChangeFreq::Daily,
            priority: 1.0,
        };
        xml.push_str(&url_to_xml(&home));

        for page in pages {
            let url = self.page_to_url(page, now);
            xml.push_str(&url_to_xml(&url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Convert a page to a sitemap URL entry.
    fn page_to_url(&self, page: &Page, now: DateTime<Utc>) -> SitemapUrl {
        let lastmod = match page.date.as_deref() {
            Some(date) => parse_date(date).unwrap_or_else(|| {
                warn!(slug = %page.slug, date, "unparseable page date, using build time");
                now
            }),
            None => now,
        };

        SitemapUrl {
            loc: self.config.url_for(&page.file_name()),
            lastmod,
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
        }
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(
        &self,
        pages: &[Page],
        now: DateTime<Utc>,
        writer: &mut W,
    ) -> Result<()> {
        let xml = self.generate(pages, now);
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
        escape_xml(&url.loc),
        url.lastmod.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        url.changefreq.as_str(),
        url.priority
    )
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
