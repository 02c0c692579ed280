//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for pressgen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Input data files.
    #[serde(default)]
    pub data: DataConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name, used as title suffix and publisher name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Base URL for the site (e.g., "https://example.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Site description for the home page and structured data.
    #[serde(default = "default_description")]
    pub description: String,

    /// Keywords appended after the page title in the keywords meta tag.
    #[serde(default = "default_keywords")]
    pub keywords: String,

    /// Publisher logo for article structured data.
    #[serde(default = "default_logo_url")]
    pub logo_url: String,

    /// Social preview image of the home page.
    #[serde(default = "default_home_image")]
    pub home_image: String,

    /// Heading and title of the shop listing.
    #[serde(default = "default_shop_title")]
    pub shop_title: String,

    /// Meta description of the shop listing.
    #[serde(default = "default_shop_description")]
    pub shop_description: String,

    /// Social preview image of the shop listing.
    #[serde(default = "default_shop_image")]
    pub shop_image: String,

    /// Prefix printed before every price.
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,

    /// WhatsApp number receiving purchase messages.
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// Message prefilled in the purchase link, followed by the product title.
    #[serde(default = "default_purchase_message")]
    pub purchase_message: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site, relative to the site root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Shared HTML template, relative to the site root.
    #[serde(default = "default_template")]
    pub template: String,

    /// `id` of the element whose content is replaced on every page.
    #[serde(default = "default_container_id")]
    pub container_id: String,

    /// Static files copied verbatim when present.
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
}

/// Data file configuration. Paths are relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Post collections, concatenated in this order.
    #[serde(default = "default_post_files")]
    pub posts: Vec<String>,

    /// Author collection.
    #[serde(default = "default_authors_file")]
    pub authors: String,

    /// Category collection.
    #[serde(default = "default_categories_file")]
    pub categories: String,

    /// Product collection.
    #[serde(default = "default_products_file")]
    pub products: String,
}

// Default value functions
fn default_name() -> String {
    "FORUMID".to_string()
}

fn default_base_url() -> String {
    "https://forumid.github.io".to_string()
}

fn default_description() -> String {
    "Portal berita terkini menyajikan informasi teknologi, keuangan, fotografi, produktivitas dan lainnya.".to_string()
}

fn default_keywords() -> String {
    "berita, teknologi, keuangan, fotografi, produktivitas, FORUMID".to_string()
}

fn default_logo_url() -> String {
    "https://forumid.github.io/logo.png".to_string()
}

fn default_home_image() -> String {
    "https://picsum.photos/seed/news-home/1200/630.jpg".to_string()
}

fn default_shop_title() -> String {
    "Toko Digital".to_string()
}

fn default_shop_description() -> String {
    "Temukan produk digital berkualitas seperti template, UI kit, dan ebook untuk meningkatkan produktivitas Anda.".to_string()
}

fn default_shop_image() -> String {
    "https://picsum.photos/seed/shop/1200/630.jpg".to_string()
}

fn default_currency_prefix() -> String {
    "Rp".to_string()
}

fn default_whatsapp_number() -> String {
    "6285867271777".to_string()
}

fn default_purchase_message() -> String {
    "Saya tertarik dengan produk ".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_template() -> String {
    "index.html".to_string()
}

fn default_container_id() -> String {
    "page-container".to_string()
}

fn default_assets() -> Vec<String> {
    vec![
        "style.css".to_string(),
        "script.js".to_string(),
        "favicon.ico".to_string(),
    ]
}

fn default_post_files() -> Vec<String> {
    ["Teknologi", "Keuangan", "Fotografi", "Produktivitas", "Soal"]
        .iter()
        .map(|name| format!("{name}.json"))
        .collect()
}

fn default_authors_file() -> String {
    "penulis.json".to_string()
}

fn default_categories_file() -> String {
    "categories.json".to_string()
}

fn default_products_file() -> String {
    "toko.json".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            base_url: default_base_url(),
            description: default_description(),
            keywords: default_keywords(),
            logo_url: default_logo_url(),
            home_image: default_home_image(),
            shop_title: default_shop_title(),
            shop_description: default_shop_description(),
            shop_image: default_shop_image(),
            currency_prefix: default_currency_prefix(),
            whatsapp_number: default_whatsapp_number(),
            purchase_message: default_purchase_message(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template: default_template(),
            container_id: default_container_id(),
            assets: default_assets(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            posts: default_post_files(),
            authors: default_authors_file(),
            categories: default_categories_file(),
            products: default_products_file(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `PRESSGEN__*` environment variables.
    ///
    /// A missing file is not an error; built-in defaults fill every unset value.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("PRESSGEN").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.name.is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.build.container_id.is_empty() {
            return Err(CoreError::config("build.container_id cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
