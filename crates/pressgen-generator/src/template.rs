//! HTML template system for page generation.
//!
//! Two pieces live here:
//!
//! - [`Template`] / [`TemplateContext`]: lightweight `{{ variable }}`
//!   interpolation used to build the markup fragments of every page.
//! - [`SharedTemplate`]: the site's own HTML document, with the splice points
//!   (`<head>` and the content container) every page is injected into.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),

    /// The shared template lacks a splice point.
    #[error("shared template has no {0}")]
    MissingSplicePoint(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A simple template that supports variable interpolation.
///
/// Variables are specified as `{{ variable_name }}` in the template string;
/// `{{ variable_name? }}` renders as empty when the variable is not set.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Render the template with the given context.
    ///
    /// Inserted values are never re-scanned, so data containing `{{` is safe.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();

            let (var_name, optional) = if let Some(stripped) = var_name.strip_suffix('?') {
                (stripped, true)
            } else {
                (var_name, false)
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Registry of markup templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with the built-in markup templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        for (name, content) in [
            ("meta", META_TEMPLATE),
            ("structured_data", STRUCTURED_DATA_TEMPLATE),
            ("article", ARTICLE_TEMPLATE),
            ("author_whatsapp", AUTHOR_WHATSAPP_TEMPLATE),
            ("news_card", NEWS_CARD_TEMPLATE),
            ("news_author", NEWS_AUTHOR_TEMPLATE),
            ("category", CATEGORY_TEMPLATE),
            ("author", AUTHOR_TEMPLATE),
            ("shop", SHOP_TEMPLATE),
            ("shop_product", SHOP_PRODUCT_TEMPLATE),
            ("product", PRODUCT_TEMPLATE),
            ("index", INDEX_TEMPLATE),
            ("featured_main", FEATURED_MAIN_TEMPLATE),
            ("featured_item", FEATURED_ITEM_TEMPLATE),
            ("trending_item", TRENDING_ITEM_TEMPLATE),
        ] {
            self.register(Template::new(name, content));
        }
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Generated pieces spliced into the shared template for one page.
#[derive(Debug, Clone, Default)]
pub struct PageParts {
    /// Inserted right after the `<head>` open tag.
    pub head_prepend: String,

    /// Inserted right before `</head>`.
    pub head_append: String,

    /// Replaces the container's content.
    pub body: String,
}

/// The site's HTML document with its located splice points.
///
/// Rendering copies the source; the template itself never changes, so one
/// instance serves every page of a build.
#[derive(Debug, Clone)]
pub struct SharedTemplate {
    source: String,
    head_open_end: usize,
    head_close_start: usize,
    container_start: usize,
    container_end: usize,
}

impl SharedTemplate {
    /// Locate the `<head>` element and the element with `id="{container_id}"`.
    pub fn parse(source: impl Into<String>, container_id: &str) -> Result<Self> {
        let source = source.into();

        let head_open = Regex::new(r"(?i)<head(?:\s[^>]*)?>")
            .map_err(|e| TemplateError::InvalidSyntax(e.to_string()))?;
        let head_close = Regex::new(r"(?i)</head\s*>")
            .map_err(|e| TemplateError::InvalidSyntax(e.to_string()))?;

        let head_open_end = head_open
            .find(&source)
            .ok_or_else(|| TemplateError::MissingSplicePoint("<head> element".to_string()))?
            .end();
        let head_close_start = head_close
            .find_at(&source, head_open_end)
            .ok_or_else(|| TemplateError::MissingSplicePoint("</head> tag".to_string()))?
            .start();

        let (container_start, container_end) =
            find_container(&source, container_id)?.ok_or_else(|| {
                TemplateError::MissingSplicePoint(format!(r#"element with id="{container_id}""#))
            })?;

        if container_start < head_close_start {
            return Err(TemplateError::InvalidSyntax(format!(
                r#"element with id="{container_id}" must be inside <body>"#
            )));
        }

        Ok(Self {
            source,
            head_open_end,
            head_close_start,
            container_start,
            container_end,
        })
    }

    /// The unmodified template source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current content of the container element.
    #[must_use]
    pub fn container_html(&self) -> &str {
        &self.source[self.container_start..self.container_end]
    }

    /// Produce a full document with the page parts spliced in.
    #[must_use]
    pub fn render(&self, parts: &PageParts) -> String {
        let src = &self.source;
        let mut html = String::with_capacity(
            src.len() + parts.head_prepend.len() + parts.head_append.len() + parts.body.len(),
        );

        html.push_str(&src[..self.head_open_end]);
        html.push_str(&parts.head_prepend);
        html.push_str(&src[self.head_open_end..self.head_close_start]);
        html.push_str(&parts.head_append);
        html.push_str(&src[self.head_close_start..self.container_start]);
        html.push_str(&parts.body);
        html.push_str(&src[self.container_end..]);
        html
    }
}

/// Find the inner range of the element carrying `id="{container_id}"`.
///
/// The closing tag is matched by counting nested elements with the same tag
/// name.
fn find_container(source: &str, container_id: &str) -> Result<Option<(usize, usize)>> {
    let open = Regex::new(&format!(
        r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(container_id)
    ))
    .map_err(|e| TemplateError::InvalidSyntax(e.to_string()))?;

    let Some(caps) = open.captures(source) else {
        return Ok(None);
    };
    let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };
    let inner_start = whole.end();

    let tags = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag.as_str())))
        .map_err(|e| TemplateError::InvalidSyntax(e.to_string()))?;

    let mut depth = 1usize;
    for m in tags.captures_iter(&source[inner_start..]) {
        let (Some(matched), Some(slash)) = (m.get(0), m.get(1)) else {
            continue;
        };
        if !slash.as_str().is_empty() {
            depth -= 1;
            if depth == 0 {
                return Ok(Some((inner_start, inner_start + matched.start())));
            }
        } else if !matched.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    Err(TemplateError::InvalidSyntax(format!(
        "unclosed <{}> container",
        tag.as_str()
    )))
}

/// Head metadata prepended to every page.
pub const META_TEMPLATE: &str = r#"
    <title>{{ title }}</title>
    <meta name="description" content="{{ description }}">
    <meta name="keywords" content="{{ title }}, {{ keywords }}">
    <meta name="author" content="{{ site_name }}">

    <!-- Open Graph Meta Tags -->
    <meta property="og:title" content="{{ title }}">
    <meta property="og:description" content="{{ description }}">
    <meta property="og:image" content="{{ image }}">
    <meta property="og:url" content="{{ url }}">
    <meta property="og:type" content="{{ og_type }}">

    <!-- Twitter Card Meta Tags -->
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{{ title }}">
    <meta name="twitter:description" content="{{ description }}">
    <meta name="twitter:image" content="{{ image }}">

    <!-- Canonical URL -->
    <link rel="canonical" href="{{ url }}">
  "#;

/// JSON-LD block appended to the head.
pub const STRUCTURED_DATA_TEMPLATE: &str =
    r#"<script type="application/ld+json">{{ json }}</script>"#;

/// Single article with the author sidebar.
pub const ARTICLE_TEMPLATE: &str = r#"
    <div class="single-news-container">
      <article class="single-news">
        <div class="single-news-image-container">
          <img src="{{ image }}" alt="{{ title }}" class="single-news-image">
          <div class="single-news-category">{{ category }}</div>
        </div>

        <div class="single-news-content">
          <h1>{{ title }}</h1>
          <div class="news-meta">
            <div class="news-date">
              <i class="fas fa-calendar"></i>
              <span>{{ date }}</span>
            </div>
            <div class="news-author">
              <i class="fas fa-user"></i>
              <span>{{ author_name }}</span>
            </div>
            <div class="news-read-time">
              <i class="fas fa-clock"></i>
              <span>{{ read_time }}</span>
            </div>
          </div>
          {{ content }}
        </div>
      </article>

      <aside class="news-sidebar">
        <div class="author-card">
          <img src="{{ author_avatar }}" alt="{{ author_name }}" class="author-avatar">
          <h3 class="author-name">{{ author_name }}</h3>
          <p class="author-bio">{{ author_bio }}</p>

          <div class="author-meta">
            <div class="author-meta-item">
              <i class="fas fa-envelope"></i>
              <span>{{ author_email }}</span>
            </div>
            {{ author_whatsapp? }}
          </div>
        </div>

        <div class="related-news">
          <h3 class="sidebar-title">
            <i class="fas fa-newspaper"></i>
            Berita Terkait
          </h3>
          <div class="related-news-list">
          </div>
        </div>
      </aside>
    </div>
  "#;

/// WhatsApp row of the author card.
pub const AUTHOR_WHATSAPP_TEMPLATE: &str = r#"
            <div class="author-meta-item">
              <i class="fab fa-whatsapp"></i>
              <span>{{ whatsapp }}</span>
            </div>
            "#;

/// Post card used by the category, author and index grids.
pub const NEWS_CARD_TEMPLATE: &str = r#"
            <article class="news-card">
              <div class="news-image-container">
                <img src="{{ image }}" alt="{{ title }}" class="news-image">
                <div class="news-category-overlay">{{ category }}</div>
              </div>
              <div class="news-content">
                <div class="news-category">{{ category }}</div>
                <h3 class="news-title">
                  <a href="{{ href }}">{{ title }}</a>
                </h3>
                <p class="news-excerpt">{{ excerpt }}</p>
                <div class="news-meta">
                  <div class="news-date">
                    <i class="fas fa-calendar"></i>
                    <span>{{ date }}</span>
                  </div>
                  {{ author? }}
                </div>
              </div>
            </article>
          "#;

/// Author line of a post card.
pub const NEWS_AUTHOR_TEMPLATE: &str = r#"<div class="news-author">
                    <i class="fas fa-user"></i>
                    <span>{{ name }}</span>
                  </div>"#;

/// Category banner and its post grid.
pub const CATEGORY_TEMPLATE: &str = r#"
    <div class="category-page">
      <div class="category-banner">
        <div class="category-banner-content">
          <div class="category-banner-image">
            <img src="{{ image }}" alt="{{ name }}">
          </div>
          <div class="category-banner-details">
            <h2 class="category-banner-title">{{ name }}</h2>
            <p class="category-banner-description">{{ excerpt }}</p>
            <div class="category-banner-stats">
              <div class="stat-item">
                <i class="fas fa-newspaper"></i>
                <span>{{ post_count }} Berita</span>
              </div>
            </div>
          </div>
        </div>
      </div>

      <div class="news-grid">
        {{ cards }}
      </div>
    </div>
  "#;

/// Author profile and their post grid.
pub const AUTHOR_TEMPLATE: &str = r#"
    <div class="author-page">
      <div class="author-header">
        <img src="{{ avatar }}" alt="{{ name }}" class="author-avatar">
        <h2 class="author-name">{{ name }}</h2>
        <p class="author-bio">{{ bio }}</p>
        <div class="author-stats">
          <div class="author-stat">
            <div class="author-stat-number">{{ post_count }}</div>
            <div class="author-stat-label">Artikel</div>
          </div>
        </div>
      </div>

      <div class="author-posts">
        <h3>Artikel oleh {{ name }}</h3>
        <div class="news-grid">
          {{ cards }}
        </div>
      </div>
    </div>
  "#;

/// Shop listing wrapper.
pub const SHOP_TEMPLATE: &str = r#"
    <div class="shop-page">
      <div class="shop-header">
        <h2 class="shop-title">
          <i class="fas fa-shopping-bag"></i>
          {{ title }}
        </h2>
      </div>

      <div class="shop-products">
        {{ products }}
      </div>
    </div>
  "#;

/// Product card of the shop listing.
pub const SHOP_PRODUCT_TEMPLATE: &str = r#"
            <div class="shop-product">
              <div class="shop-product-image">
                <img src="{{ thumbnail }}" alt="{{ title }}">
                <div class="shop-product-badge">Digital</div>
              </div>
              <div class="shop-product-content">
                <div class="shop-product-category">{{ category }}</div>
                <h3 class="shop-product-title">
                  <a href="{{ href }}">{{ title }}</a>
                </h3>
                <p class="shop-product-description">{{ description }}</p>
                <div class="shop-product-footer">
                  <div class="shop-product-price">{{ price }}</div>
                  <div class="shop-product-actions">
                    <a href="{{ file_url }}" target="_blank" class="shop-product-btn shop-product-btn-secondary">
                      <i class="fas fa-eye"></i>
                      Preview
                    </a>
                    <a href="{{ buy_url }}" target="_blank" class="shop-product-btn shop-product-btn-primary">
                      <i class="fas fa-shopping-cart"></i>
                      Beli
                    </a>
                  </div>
                </div>
              </div>
            </div>
          "#;

/// Product detail page.
pub const PRODUCT_TEMPLATE: &str = r#"
    <div class="single-product-container">
      <div class="single-product-image">
        <img src="{{ thumbnail }}" alt="{{ title }}">
      </div>
      <div class="single-product-details">
        <div class="single-product-category">{{ category }}</div>
        <h1 class="single-product-title">{{ title }}</h1>
        <div class="single-product-description">{{ description }}</div>
        <div class="single-product-price">{{ price }}</div>
        <div class="single-product-actions">
          <a href="{{ file_url }}" target="_blank" class="single-product-btn single-product-btn-secondary">
            <i class="fas fa-eye"></i>
            Lihat Demo
          </a>
          <a href="{{ buy_url }}" target="_blank" class="single-product-btn single-product-btn-primary">
            <i class="fas fa-shopping-cart"></i>
            Beli Sekarang
          </a>
        </div>
      </div>
    </div>
  "#;

/// Home page layout.
pub const INDEX_TEMPLATE: &str = r#"
    <div class="main-content">
      <div class="content-left">
        <div class="featured-news">
          {{ featured_main? }}

          <div class="featured-news-secondary">
            {{ featured_secondary }}
          </div>
        </div>

        <div class="latest-news">
          <div class="section-header">
            <h2 class="section-title">
              <i class="fas fa-newspaper"></i>
              Berita Terkini
            </h2>
          </div>

          <div class="news-grid">
            {{ latest }}
          </div>
        </div>
      </div>

      <div class="sidebar">
        <div class="sidebar-section">
          <h3 class="sidebar-title">
            <i class="fas fa-fire"></i>
            Berita Trending
          </h3>
          <ul class="trending-news-list">
            {{ trending }}
          </ul>
        </div>
      </div>
    </div>
  "#;

/// The single featured post of the home page.
pub const FEATURED_MAIN_TEMPLATE: &str = r#"
          <div class="featured-news-main">
            <img src="{{ image }}" alt="{{ title }}">
            <div class="featured-news-content">
              <div class="featured-news-category">{{ category }}</div>
              <h1 class="featured-news-title">
                <a href="{{ href }}">{{ title }}</a>
              </h1>
              <p class="featured-news-excerpt">{{ excerpt }}</p>
              <div class="featured-news-meta">
                <span><i class="fas fa-calendar"></i> {{ date }}</span>
                <span><i class="fas fa-user"></i> {{ author }}</span>
                <span><i class="fas fa-clock"></i> {{ read_time }}</span>
              </div>
            </div>
          </div>
          "#;

/// Secondary featured post of the home page.
pub const FEATURED_ITEM_TEMPLATE: &str = r#"
              <div class="featured-news-item">
                <a href="{{ href }}">
                  <img src="{{ image }}" alt="{{ title }}">
                  <div class="featured-news-item-content">
                    <h3 class="featured-news-item-title">{{ title }}</h3>
                    <div class="featured-news-item-meta">{{ date }}</div>
                  </div>
                </a>
              </div>
            "#;

/// Numbered entry of the trending sidebar.
pub const TRENDING_ITEM_TEMPLATE: &str = r#"
              <li class="trending-news-item">
                <div class="trending-number">{{ rank }}</div>
                <div class="trending-content">
                  <h4 class="trending-title">
                    <a href="{{ href }}">{{ title }}</a>
                  </h4>
                  <div class="trending-meta">{{ date }}</div>
                </div>
              </li>
            "#;
