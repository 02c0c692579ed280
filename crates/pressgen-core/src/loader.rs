//! Loading record collections from JSON data files.
//!
//! A data file that is missing or cannot be decoded degrades to an empty
//! collection so the rest of the build can proceed with partial data.

use std::{cmp::Reverse, path::Path};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    config::DataConfig,
    content::{Author, Category, Post, Product},
    error::{CoreError, Result},
    format::parse_date,
};

/// Records decoded from one data file.
#[derive(Debug, Clone)]
pub struct Records<T> {
    /// Entries that decoded, in file order.
    pub records: Vec<T>,

    /// One message per entry that was skipped.
    pub rejected: Vec<String>,
}

/// Read a JSON array of records.
///
/// The file must hold a JSON array; otherwise a path-bearing error is
/// returned. Entries that fail to decode are skipped and reported in
/// [`Records::rejected`] so one bad entry never costs the rest of the file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Records<T>> {
    let data = std::fs::read_to_string(path)?;
    let entries: Vec<Value> =
        serde_json::from_str(&data).map_err(|e| CoreError::data(path, e.to_string()))?;

    let mut records = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push(format!("{} entry {index}: {e}", path.display())),
        }
    }

    Ok(Records { records, rejected })
}

/// Load the records of `relative` under `root`, or an empty collection when
/// the file is absent or malformed.
pub fn load_records<T: DeserializeOwned>(root: &Path, relative: &str) -> Vec<T> {
    let path = root.join(relative);

    if !path.exists() {
        warn!(path = %path.display(), "data file not found");
        return Vec::new();
    }

    match read_records(&path) {
        Ok(Records { records, rejected }) => {
            for reason in &rejected {
                warn!(reason = %reason, "skipping data entry");
            }
            debug!(
                path = %path.display(),
                count = records.len(),
                skipped = rejected.len(),
                "loaded data file"
            );
            records
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read data file");
            Vec::new()
        }
    }
}

/// Every record collection the site is built from.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// Posts of all content files, in configured file order.
    pub posts: Vec<Post>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl SiteData {
    /// Load all configured data files relative to `root`.
    pub fn load(root: &Path, files: &DataConfig) -> Self {
        let posts: Vec<Post> = files
            .posts
            .iter()
            .flat_map(|file| load_records::<Post>(root, file))
            .collect();

        let data = Self {
            posts,
            authors: load_records(root, &files.authors),
            categories: load_records(root, &files.categories),
            products: load_records(root, &files.products),
        };

        info!(
            posts = data.posts.len(),
            authors = data.authors.len(),
            categories = data.categories.len(),
            products = data.products.len(),
            "loaded site data"
        );

        data
    }

    /// Products that get a shop card and a product page.
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_active)
    }

    /// Posts ordered latest first. The sort is stable; posts whose date
    /// cannot be parsed come last.
    #[must_use]
    pub fn posts_by_date(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().collect();
        posts.sort_by_key(|p| Reverse(parse_date(&p.date)));
        posts
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::content::RecordId;

    #[test]
    fn test_load_records() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("penulis.json"),
            r#"[{"id": 1, "name": "Budi", "bio": "Jurnalis", "avatar": "a.jpg"}]"#,
        )
        .unwrap();

        let authors: Vec<Author> = load_records(dir.path(), "penulis.json");

        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].id, RecordId::Int(1));
        assert_eq!(authors[0].name, "Budi");
        assert!(authors[0].email.is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let posts: Vec<Post> = load_records(dir.path(), "Teknologi.json");
        assert!(posts.is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("toko.json"), "[{ not json").unwrap();

        let products: Vec<Product> = load_records(dir.path(), "toko.json");
        assert!(products.is_empty());
    }

    #[test]
    fn test_read_records_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"{"id": 1}"#).unwrap();

        let err = read_records::<Category>(&path).unwrap_err();
        assert!(err.to_string().contains("categories.json"));
    }

    #[test]
    fn test_null_field_keeps_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Teknologi.json"),
            r#"[{"title": "A", "date": "2024-01-01"}, {"title": "B", "excerpt": null}]"#,
        )
        .unwrap();

        let posts: Vec<Post> = load_records(dir.path(), "Teknologi.json");

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert!(posts[1].excerpt.is_empty());
    }

    #[test]
    fn test_string_price_keeps_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("toko.json"),
            r#"[
                {"title": "Kit", "price": "150000", "is_active": true},
                {"title": "Ok", "price": 1, "is_active": true}
            ]"#,
        )
        .unwrap();

        let products: Vec<Product> = load_records(dir.path(), "toko.json");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.to_string(), "150000");
    }

    #[test]
    fn test_bad_entry_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toko.json");
        fs::write(
            &path,
            r#"[{"title": "Gratis", "price": "gratis"}, {"title": "Kit", "price": 5}, 7]"#,
        )
        .unwrap();

        let Records { records, rejected } = read_records::<Product>(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kit");
        assert_eq!(rejected.len(), 2);
        assert!(rejected[0].contains("toko.json entry 0"));
        assert!(rejected[1].contains("entry 2"));
    }

    #[test]
    fn test_site_data_concatenates_post_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Teknologi.json"),
            r#"[{"title": "A"}, {"title": "B"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("Keuangan.json"), r#"[{"title": "C"}]"#).unwrap();
        fs::write(
            dir.path().join("toko.json"),
            r#"[{"title": "On", "is_active": true}, {"title": "Off", "is_active": false}]"#,
        )
        .unwrap();

        let data = SiteData::load(dir.path(), &DataConfig::default());

        let titles: Vec<_> = data.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(data.authors.is_empty());
        assert!(data.categories.is_empty());
        assert_eq!(data.products.len(), 2);

        let active: Vec<_> = data.active_products().map(|p| p.title.as_str()).collect();
        assert_eq!(active, vec!["On"]);
    }

    #[test]
    fn test_posts_by_date() {
        let post = |title: &str, date: &str| Post {
            title: title.to_string(),
            date: date.to_string(),
            ..Post::default()
        };
        let data = SiteData {
            posts: vec![
                post("old", "2023-05-01"),
                post("broken", "besok"),
                post("new", "2024-02-01T08:00:00Z"),
                post("tie-a", "2023-12-31"),
                post("tie-b", "2023-12-31"),
            ],
            ..SiteData::default()
        };

        let titles: Vec<_> = data
            .posts_by_date()
            .into_iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["new", "tie-a", "tie-b", "old", "broken"]);
    }
}
