//! Page rendering.
//!
//! Every renderer maps a record (plus the lookups it needs) and the shared
//! template to a [`RenderedPage`]. Renderers are pure: writing the file and
//! logging are left to the caller.

use pressgen_core::{
    Author, Category, Config, Lookup, Page, Post, Product,
    format::{encode_uri_component, escape_html, format_date, format_price, slugify},
    lookup::UNKNOWN_EMAIL,
};
use serde_json::json;
use thiserror::Error;

use crate::template::{PageParts, SharedTemplate, TemplateContext, TemplateError, TemplateRegistry};

/// Number of posts featured on the home page.
pub const LATEST_POSTS: usize = 6;

/// Number of posts in the trending sidebar.
pub const TRENDING_POSTS: usize = 5;

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Structured data could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// A rendered page ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// File name inside the output directory.
    pub file_name: String,

    /// Full HTML document.
    pub html: String,

    /// Sitemap entry describing the page.
    pub page: Page,
}

/// Open Graph type of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OgType {
    Website,
    Article,
    Profile,
    Product,
}

impl OgType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Profile => "profile",
            Self::Product => "product",
        }
    }
}

/// Head metadata of one page. Values are plain text; escaping happens when
/// the tags are rendered.
#[derive(Debug, Clone)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub url: &'a str,
    pub og_type: OgType,
}

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            config,
        }
    }

    /// Render the head metadata block.
    pub fn meta_tags(&self, meta: &PageMeta<'_>) -> Result<String> {
        let ctx = TemplateContext::new()
            .with_var("title", escape_html(meta.title))
            .with_var("description", escape_html(meta.description))
            .with_var("keywords", escape_html(&self.config.site.keywords))
            .with_var("site_name", escape_html(&self.config.site.name))
            .with_var("image", escape_html(meta.image))
            .with_var("url", escape_html(meta.url))
            .with_var("og_type", meta.og_type.as_str());

        Ok(self.templates.render("meta", &ctx)?)
    }

    /// `NewsArticle` structured data for a post.
    pub fn article_structured_data(&self, post: &Post, author: &Author, url: &str) -> Result<String> {
        let data = json!({
            "@context": "https://schema.org",
            "@type": "NewsArticle",
            "headline": post.title,
            "image": [post.image],
            "datePublished": post.date,
            "dateModified": post.date,
            "author": {
                "@type": "Person",
                "name": author.name,
            },
            "publisher": {
                "@type": "Organization",
                "name": self.config.site.name,
                "logo": {
                    "@type": "ImageObject",
                    "url": self.config.site.logo_url,
                },
            },
            "description": post.excerpt,
            "mainEntityOfPage": {
                "@type": "WebPage",
                "@id": url,
            },
        });

        self.structured_data(&data)
    }

    /// `WebSite` structured data for the home page.
    pub fn website_structured_data(&self) -> Result<String> {
        let data = json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": self.config.site.name,
            "description": self.config.site.description,
            "url": self.config.site.base_url.trim_end_matches('/'),
            "potentialAction": {
                "@type": "SearchAction",
                "target": format!("{}?q={{search_term_string}}", self.config.url_for("search")),
                "query-input": "required name=search_term_string",
            },
        });

        self.structured_data(&data)
    }

    fn structured_data(&self, data: &serde_json::Value) -> Result<String> {
        // A literal `</` inside the script body would close the element early.
        let json = serde_json::to_string_pretty(data)?.replace("</", "<\\/");
        let ctx = TemplateContext::new().with_var("json", json);
        Ok(self.templates.render("structured_data", &ctx)?)
    }

    /// Page title with the site name suffix.
    fn page_title(&self, title: &str) -> String {
        format!("{title} - {}", self.config.site.name)
    }

    /// Render the home page from posts ordered latest first.
    pub fn render_index(
        &self,
        template: &SharedTemplate,
        posts_by_date: &[&Post],
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let title = format!("{} - Berita Terkini dan Terpercaya", self.config.site.name);
        let url = self.config.url_for("");
        let description = format!(
            "{} Dapatkan berita terpercaya dan update harian di sini.",
            self.config.site.description
        );

        let head_prepend = self.meta_tags(&PageMeta {
            title: &title,
            description: &description,
            image: &self.config.site.home_image,
            url: &url,
            og_type: OgType::Website,
        })?;
        let head_append = self.website_structured_data()?;

        let latest = &posts_by_date[..posts_by_date.len().min(LATEST_POSTS)];

        let mut ctx = TemplateContext::new();

        if let Some(first) = latest.first() {
            let featured = TemplateContext::new()
                .with_var("image", escape_html(&first.image))
                .with_var("title", escape_html(&first.title))
                .with_var("category", escape_html(&lookup.category(&first.category).name))
                .with_var("href", post_href(first))
                .with_var("excerpt", escape_html(&first.excerpt))
                .with_var("date", format_date(&first.date))
                .with_var("author", escape_html(&lookup.author(&first.author).name))
                .with_var("read_time", escape_html(&first.read_time));
            ctx.insert(
                "featured_main",
                self.templates.render("featured_main", &featured)?,
            );
        }

        let secondary = latest
            .iter()
            .skip(1)
            .take(2)
            .map(|post| {
                let item = TemplateContext::new()
                    .with_var("href", post_href(post))
                    .with_var("image", escape_html(&post.image))
                    .with_var("title", escape_html(&post.title))
                    .with_var("date", format_date(&post.date));
                self.templates.render("featured_item", &item)
            })
            .collect::<std::result::Result<String, _>>()?;
        ctx.insert("featured_secondary", secondary);

        let cards = latest
            .iter()
            .skip(3)
            .map(|post| self.news_card(post, lookup, true))
            .collect::<Result<String>>()?;
        ctx.insert("latest", cards);

        let trending = posts_by_date
            .iter()
            .take(TRENDING_POSTS)
            .enumerate()
            .map(|(i, post)| {
                let item = TemplateContext::new()
                    .with_var("rank", (i + 1).to_string())
                    .with_var("href", post_href(post))
                    .with_var("title", escape_html(&post.title))
                    .with_var("date", format_date(&post.date));
                self.templates.render("trending_item", &item)
            })
            .collect::<std::result::Result<String, _>>()?;
        ctx.insert("trending", trending);

        let body = self.templates.render("index", &ctx)?;

        Ok(RenderedPage {
            file_name: "index.html".to_string(),
            html: template.render(&PageParts {
                head_prepend,
                head_append,
                body,
            }),
            page: Page::new("index", title),
        })
    }

    /// Render a single article page.
    pub fn render_article(
        &self,
        template: &SharedTemplate,
        post: &Post,
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let slug = slugify(&post.title);
        let url = self.config.url_for(&format!("{slug}.html"));
        let author = lookup.author(&post.author);
        let category = lookup.category(&post.category);

        let head_prepend = self.meta_tags(&PageMeta {
            title: &self.page_title(&post.title),
            description: &post.excerpt,
            image: &post.image,
            url: &url,
            og_type: OgType::Article,
        })?;
        let head_append = self.article_structured_data(post, author, &url)?;

        let mut ctx = TemplateContext::new()
            .with_var("image", escape_html(&post.image))
            .with_var("title", escape_html(&post.title))
            .with_var("category", escape_html(&category.name))
            .with_var("date", format_date(&post.date))
            .with_var("author_name", escape_html(&author.name))
            .with_var("read_time", escape_html(&post.read_time))
            .with_var("content", &post.content)
            .with_var("author_avatar", escape_html(&author.avatar))
            .with_var("author_bio", escape_html(&author.bio))
            .with_var(
                "author_email",
                escape_html(author.email.as_deref().unwrap_or(UNKNOWN_EMAIL)),
            );

        if let Some(whatsapp) = author.whatsapp.as_deref().filter(|w| !w.is_empty()) {
            let row = TemplateContext::new().with_var("whatsapp", escape_html(whatsapp));
            ctx.insert(
                "author_whatsapp",
                self.templates.render("author_whatsapp", &row)?,
            );
        }

        let body = self.templates.render("article", &ctx)?;

        Ok(RenderedPage {
            file_name: format!("{slug}.html"),
            html: template.render(&PageParts {
                head_prepend,
                head_append,
                body,
            }),
            page: Page::new(slug, post.title.clone()).with_date(post.date.clone()),
        })
    }

    /// Render a category page listing its posts.
    pub fn render_category(
        &self,
        template: &SharedTemplate,
        category: &Category,
        posts: &[&Post],
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let slug = format!("category-{}", slugify(&category.name));
        let file_name = format!("{slug}.html");
        let url = self.config.url_for(&file_name);

        let head_prepend = self.meta_tags(&PageMeta {
            title: &self.page_title(&category.name),
            description: &category.excerpt,
            image: &category.image,
            url: &url,
            og_type: OgType::Website,
        })?;

        let category_posts: Vec<&Post> = posts
            .iter()
            .copied()
            .filter(|p| p.category == category.id)
            .collect();
        let cards = category_posts
            .iter()
            .map(|post| self.news_card(post, lookup, true))
            .collect::<Result<String>>()?;

        let ctx = TemplateContext::new()
            .with_var("image", escape_html(&category.image))
            .with_var("name", escape_html(&category.name))
            .with_var("excerpt", escape_html(&category.excerpt))
            .with_var("post_count", category_posts.len().to_string())
            .with_var("cards", cards);
        let body = self.templates.render("category", &ctx)?;

        Ok(RenderedPage {
            file_name,
            html: template.render(&PageParts {
                head_prepend,
                body,
                ..PageParts::default()
            }),
            page: Page::new(slug, category.name.clone()),
        })
    }

    /// Render an author page listing their posts.
    pub fn render_author(
        &self,
        template: &SharedTemplate,
        author: &Author,
        posts: &[&Post],
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let slug = format!("author-{}", author.id);
        let file_name = format!("{slug}.html");
        let url = self.config.url_for(&file_name);

        let head_prepend = self.meta_tags(&PageMeta {
            title: &self.page_title(&author.name),
            description: &author.bio,
            image: &author.avatar,
            url: &url,
            og_type: OgType::Profile,
        })?;

        let author_posts: Vec<&Post> = posts
            .iter()
            .copied()
            .filter(|p| p.author == author.id)
            .collect();
        let cards = author_posts
            .iter()
            .map(|post| self.news_card(post, lookup, false))
            .collect::<Result<String>>()?;

        let ctx = TemplateContext::new()
            .with_var("avatar", escape_html(&author.avatar))
            .with_var("name", escape_html(&author.name))
            .with_var("bio", escape_html(&author.bio))
            .with_var("post_count", author_posts.len().to_string())
            .with_var("cards", cards);
        let body = self.templates.render("author", &ctx)?;

        Ok(RenderedPage {
            file_name,
            html: template.render(&PageParts {
                head_prepend,
                body,
                ..PageParts::default()
            }),
            page: Page::new(slug, author.name.clone()),
        })
    }

    /// Render the shop listing of active products.
    pub fn render_shop(
        &self,
        template: &SharedTemplate,
        products: &[Product],
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let site = &self.config.site;
        let url = self.config.url_for("shop.html");

        let head_prepend = self.meta_tags(&PageMeta {
            title: &self.page_title(&site.shop_title),
            description: &site.shop_description,
            image: &site.shop_image,
            url: &url,
            og_type: OgType::Website,
        })?;

        let cards = products
            .iter()
            .filter(|p| p.is_active)
            .map(|product| {
                let ctx = self
                    .product_context(product, lookup)
                    .with_var("href", format!("product-{}.html", slugify(&product.title)));
                self.templates.render("shop_product", &ctx)
            })
            .collect::<std::result::Result<String, _>>()?;

        let ctx = TemplateContext::new()
            .with_var("title", escape_html(&site.shop_title))
            .with_var("products", cards);
        let body = self.templates.render("shop", &ctx)?;

        Ok(RenderedPage {
            file_name: "shop.html".to_string(),
            html: template.render(&PageParts {
                head_prepend,
                body,
                ..PageParts::default()
            }),
            page: Page::new("shop", site.shop_title.clone()),
        })
    }

    /// Render a product detail page.
    pub fn render_product(
        &self,
        template: &SharedTemplate,
        product: &Product,
        lookup: &Lookup<'_>,
    ) -> Result<RenderedPage> {
        let slug = format!("product-{}", slugify(&product.title));
        let file_name = format!("{slug}.html");
        let url = self.config.url_for(&file_name);

        let head_prepend = self.meta_tags(&PageMeta {
            title: &self.page_title(&product.title),
            description: &product.description,
            image: &product.thumbnail_url,
            url: &url,
            og_type: OgType::Product,
        })?;

        let ctx = self.product_context(product, lookup);
        let body = self.templates.render("product", &ctx)?;

        Ok(RenderedPage {
            file_name,
            html: template.render(&PageParts {
                head_prepend,
                body,
                ..PageParts::default()
            }),
            page: Page::new(slug, product.title.clone()),
        })
    }

    /// Variables shared by the shop card and the product page.
    fn product_context(&self, product: &Product, lookup: &Lookup<'_>) -> TemplateContext {
        TemplateContext::new()
            .with_var("thumbnail", escape_html(&product.thumbnail_url))
            .with_var("title", escape_html(&product.title))
            .with_var(
                "category",
                escape_html(&lookup.category(&product.category_id).name),
            )
            .with_var("description", &product.description)
            .with_var(
                "price",
                format!(
                    "{}{}",
                    escape_html(&self.config.site.currency_prefix),
                    format_price(&product.price)
                ),
            )
            .with_var("file_url", escape_html(&product.file_url))
            .with_var("buy_url", escape_html(&self.purchase_url(&product.title)))
    }

    /// WhatsApp link prefilled with the purchase message.
    #[must_use]
    pub fn purchase_url(&self, product_title: &str) -> String {
        let site = &self.config.site;
        format!(
            "https://wa.me/{}?text={}",
            site.whatsapp_number,
            encode_uri_component(&format!("{}{product_title}", site.purchase_message))
        )
    }

    /// Post card for listing grids.
    fn news_card(&self, post: &Post, lookup: &Lookup<'_>, with_author: bool) -> Result<String> {
        let mut ctx = TemplateContext::new()
            .with_var("image", escape_html(&post.image))
            .with_var("title", escape_html(&post.title))
            .with_var("category", escape_html(&lookup.category(&post.category).name))
            .with_var("href", post_href(post))
            .with_var("excerpt", escape_html(&post.excerpt))
            .with_var("date", format_date(&post.date));

        if with_author {
            let author = TemplateContext::new()
                .with_var("name", escape_html(&lookup.author(&post.author).name));
            ctx.insert("author", self.templates.render("news_author", &author)?);
        }

        Ok(self.templates.render("news_card", &ctx)?)
    }
}

/// Relative link to a post's page.
fn post_href(post: &Post) -> String {
    format!("{}.html", slugify(&post.title))
}
