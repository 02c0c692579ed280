//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::Utc;
use pressgen_core::{Config, CoreError, Lookup, Page, SiteData};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetError, AssetProcessor},
    html::{HtmlError, HtmlGenerator, RenderedPage},
    sitemap::{SitemapError, SitemapGenerator},
    template::{SharedTemplate, TemplateError},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The shared template file does not exist.
    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The shared template cannot be used.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of article pages generated.
    pub articles: usize,

    /// Number of category pages generated.
    pub categories: usize,

    /// Number of author pages generated.
    pub authors: usize,

    /// Number of product pages generated.
    pub products: usize,

    /// Number of assets copied.
    pub assets: usize,

    /// Total pages written, the home page included.
    pub pages: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    root: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a builder for the site rooted at `root`.
    ///
    /// Data files, the template and assets are read relative to `root`; the
    /// output goes to `<root>/<build.output_dir>`.
    #[must_use]
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_dir = root.join(&config.build.output_dir);
        Self {
            config,
            root,
            output_dir,
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// The directory pages are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            root = %self.root.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        self.config.validate()?;

        // 1. Load the shared template before touching the output
        let template = self.load_template()?;

        // 2. Ensure output directory
        AssetProcessor::ensure_dir(&self.output_dir)?;

        // 3. Load data
        let data = SiteData::load(&self.root, &self.config.data);
        let lookup = Lookup::new(&data.authors, &data.categories);
        let posts = data.posts_by_date();

        // 4. Copy static assets
        stats.assets = AssetProcessor::new()
            .copy_assets(&self.root, &self.output_dir, &self.config.build.assets)?
            .len();

        let generator = HtmlGenerator::new(self.config.clone());
        let mut pages: Vec<Page> = Vec::new();

        // 5. Home page
        self.write_page(&generator.render_index(&template, &posts, &lookup)?)?;

        // 6. Articles
        for post in &posts {
            let page = generator.render_article(&template, post, &lookup)?;
            self.write_page(&page)?;
            pages.push(page.page);
            stats.articles += 1;
        }

        // 7. Categories
        for category in &data.categories {
            let page = generator.render_category(&template, category, &posts, &lookup)?;
            self.write_page(&page)?;
            pages.push(page.page);
            stats.categories += 1;
        }

        // 8. Authors
        for author in &data.authors {
            let page = generator.render_author(&template, author, &posts, &lookup)?;
            self.write_page(&page)?;
            pages.push(page.page);
            stats.authors += 1;
        }

        // 9. Shop listing
        let shop = generator.render_shop(&template, &data.products, &lookup)?;
        self.write_page(&shop)?;
        pages.push(shop.page);

        // 10. Active products
        for product in data.active_products() {
            let page = generator.render_product(&template, product, &lookup)?;
            self.write_page(&page)?;
            pages.push(page.page);
            stats.products += 1;
        }

        // 11. Sitemap
        self.generate_sitemap(&pages)?;

        stats.pages = pages.len() + 1;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            articles = stats.articles,
            categories = stats.categories,
            authors = stats.authors,
            products = stats.products,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Read and parse the shared template.
    fn load_template(&self) -> Result<SharedTemplate> {
        let path = self.root.join(&self.config.build.template);
        if !path.is_file() {
            return Err(BuildError::TemplateNotFound(path));
        }

        let source = fs::read_to_string(&path)?;
        let template = SharedTemplate::parse(source, &self.config.build.container_id)?;

        debug!(path = %path.display(), "loaded template");
        Ok(template)
    }

    /// Write a rendered page, replacing any existing file.
    fn write_page(&self, page: &RenderedPage) -> Result<()> {
        let output_path = self.output_dir.join(&page.file_name);
        fs::write(&output_path, &page.html)?;

        info!(path = %output_path.display(), "generated page");
        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, pages: &[Page]) -> Result<()> {
        let generator = SitemapGenerator::new(self.config.clone());
        let output_path = self.output_dir.join("sitemap.xml");

        let mut file = fs::File::create(&output_path)?;
        generator.write_to(pages, Utc::now(), &mut file)?;

        info!(path = %output_path.display(), entries = pages.len() + 1, "generated sitemap");
        Ok(())
    }
}
