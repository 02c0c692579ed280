//! Check command - validate configuration, template and data files

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use color_eyre::eyre::{Result, bail};
use pressgen_core::{
    Author, Category, Config, Post, Product, RecordId, format::slugify,
    loader::{Records, read_records},
};
use pressgen_generator::SharedTemplate;
use serde::de::DeserializeOwned;

use super::load_config;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration, the shared template and every data file.
pub fn run(config_path: &Path, root: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, ?root, strict, "Checking site");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    match load_config(config_path, root) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            validate_site(&config, root, &mut result);
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check everything a build reads.
fn validate_site(config: &Config, root: &Path, result: &mut ValidationResult) {
    println!("\nChecking template...");
    check_template(config, root, result);

    println!("\nChecking data files...");
    let mut posts: Vec<Post> = Vec::new();
    for file in &config.data.posts {
        posts.extend(check_data_file(root, file, result));
    }
    let authors: Vec<Author> = check_data_file(root, &config.data.authors, result);
    let categories: Vec<Category> = check_data_file(root, &config.data.categories, result);
    let products: Vec<Product> = check_data_file(root, &config.data.products, result);

    println!("\nChecking references...");
    check_references(&posts, &authors, &categories, &products, result);

    let output = root.join(&config.build.output_dir);
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            output.display()
        ));
    }
}

/// Check the shared template exists and has both splice points.
fn check_template(config: &Config, root: &Path, result: &mut ValidationResult) {
    let path = root.join(&config.build.template);

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            result.add_error(format!("{}: Failed to read template: {e}", path.display()));
            println!("  ✗ {} unreadable", path.display());
            return;
        }
    };

    match SharedTemplate::parse(source, &config.build.container_id) {
        Ok(_) => println!("  ✓ {} valid", path.display()),
        Err(e) => {
            result.add_error(format!("{}: {e}", path.display()));
            println!("  ✗ {} invalid", path.display());
        }
    }
}

/// Decode one data file. A missing file or a skipped entry is a warning, a
/// malformed file an error.
fn check_data_file<T: DeserializeOwned>(
    root: &Path,
    file: &str,
    result: &mut ValidationResult,
) -> Vec<T> {
    let path = root.join(file);

    if !path.exists() {
        result.add_warning(format!("Data file missing: {file}"));
        println!("  ⚠ {file} missing");
        return Vec::new();
    }

    match read_records(&path) {
        Ok(Records { records, rejected }) if rejected.is_empty() => {
            println!("  ✓ {file} ({} records)", records.len());
            records
        }
        Ok(Records { records, rejected }) => {
            println!(
                "  ⚠ {file} ({} records, {} skipped)",
                records.len(),
                rejected.len()
            );
            for reason in rejected {
                result.add_warning(format!("Skipped {reason}"));
            }
            records
        }
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {file} invalid");
            Vec::new()
        }
    }
}

/// Report references that will render as placeholders, and colliding slugs.
fn check_references(
    posts: &[Post],
    authors: &[Author],
    categories: &[Category],
    products: &[Product],
    result: &mut ValidationResult,
) {
    let author_ids: HashSet<&RecordId> = authors.iter().map(|a| &a.id).collect();
    let category_ids: HashSet<&RecordId> = categories.iter().map(|c| &c.id).collect();
    let before = result.warnings.len();

    for post in posts {
        if !author_ids.contains(&post.author) {
            result.add_warning(format!(
                "Post '{}' references unknown author {}",
                post.title, post.author
            ));
        }
        if !category_ids.contains(&post.category) {
            result.add_warning(format!(
                "Post '{}' references unknown category {}",
                post.title, post.category
            ));
        }
    }

    for product in products {
        if !category_ids.contains(&product.category_id) {
            result.add_warning(format!(
                "Product '{}' references unknown category {}",
                product.title, product.category_id
            ));
        }
        if !product.is_active {
            result.add_warning(format!(
                "Product '{}' is inactive and gets no page",
                product.title
            ));
        }
    }

    // Every page a build writes, keyed by file name.
    let mut titles_by_file: HashMap<String, Vec<String>> = HashMap::new();
    let mut claim = |file: String, label: String| {
        titles_by_file.entry(file).or_default().push(label);
    };
    claim("index.html".to_string(), "home page".to_string());
    for post in posts {
        claim(format!("{}.html", slugify(&post.title)), post.title.clone());
    }
    for category in categories {
        claim(
            format!("category-{}.html", slugify(&category.name)),
            format!("category {}", category.name),
        );
    }
    for author in authors {
        claim(
            format!("author-{}.html", author.id),
            format!("author {}", author.name),
        );
    }
    claim("shop.html".to_string(), "shop page".to_string());
    for product in products.iter().filter(|p| p.is_active) {
        claim(
            format!("product-{}.html", slugify(&product.title)),
            product.title.clone(),
        );
    }

    let mut collisions: Vec<(String, Vec<String>)> = titles_by_file
        .into_iter()
        .filter(|(_, titles)| titles.len() > 1)
        .collect();
    collisions.sort();
    for (file, titles) in collisions {
        result.add_warning(format!(
            "{file} is written by {} records: {}",
            titles.len(),
            titles.join(", ")
        ));
    }

    let found = result.warnings.len() - before;
    if found == 0 {
        println!("  ✓ All references resolve");
    } else {
        println!("  ⚠ {found} reference issue(s)");
    }
}
