//! Build command - generates the static site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use pressgen_generator::{BuildStats, Builder};

use super::load_config;

/// Run the build command.
///
/// Renders every page of the site rooted at `root` into the output directory.
pub fn run(
    config_path: &Path,
    root: &Path,
    output: Option<&Path>,
    base_url: Option<&str>,
) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?config_path, ?root, ?output, ?base_url, "Starting build");

    let mut config = load_config(config_path, root)?;

    // Override base URL if specified via CLI
    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.to_string();
    }

    tracing::debug!(?config, "Loaded configuration");

    let mut builder = Builder::new(config, root);
    if let Some(dir) = output {
        builder = builder.with_output_dir(dir);
    }
    let output_dir = builder.output_dir().to_path_buf();

    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Articles:   {}", stats.articles);
    println!("  Categories: {}", stats.categories);
    println!("  Authors:    {}", stats.authors);
    println!("  Products:   {}", stats.products);
    println!("  Assets:     {}", stats.assets);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const TEMPLATE: &str = r#"<html><head></head><body><div id="page-container"></div></body></html>"#;

    #[test]
    fn test_run_with_overrides() {
        let root = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(root.path().join("index.html"), TEMPLATE).unwrap();

        let stats = run(
            Path::new("pressgen.toml"),
            root.path(),
            Some(output.path()),
            Some("https://news.example.org"),
        )
        .unwrap();

        assert_eq!(stats.pages, 2);
        let sitemap = fs::read_to_string(output.path().join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://news.example.org/shop.html</loc>"));
        assert!(!root.path().join("dist").exists());
    }

    #[test]
    fn test_run_without_template_fails() {
        let root = TempDir::new().unwrap();

        let result = run(Path::new("pressgen.toml"), root.path(), None, None);

        assert!(result.is_err());
        assert!(!root.path().join("dist").exists());
    }
}
