//! pressgen Generator Library
//!
//! Page rendering and build orchestration for pressgen.
//!
//! # Modules
//!
//! - [`template`] - Shared template splicing and markup interpolation
//! - [`html`] - Page rendering for every record type
//! - [`sitemap`] - XML sitemap generation
//! - [`assets`] - Static asset copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod html;
pub mod sitemap;
pub mod template;

pub use assets::AssetProcessor;
pub use build::{BuildError, BuildStats, Builder};
pub use html::{HtmlGenerator, RenderedPage};
pub use sitemap::SitemapGenerator;
pub use template::{PageParts, SharedTemplate, Template, TemplateContext, TemplateRegistry};
