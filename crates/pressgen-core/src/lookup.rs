//! Foreign-key lookups with placeholder fallback.

use crate::content::{Author, Category, RecordId};

/// Name given to placeholder records.
pub const UNKNOWN: &str = "Unknown";

/// Avatar shown for an author that cannot be resolved.
pub const UNKNOWN_AVATAR: &str = "https://picsum.photos/seed/unknown/120/120.jpg";

/// Email printed for authors without one.
pub const UNKNOWN_EMAIL: &str = "unknown@example.com";

/// Resolves author and category references.
///
/// A reference without a matching record resolves to a placeholder named
/// [`UNKNOWN`]; lookups never fail.
#[derive(Debug)]
pub struct Lookup<'a> {
    authors: &'a [Author],
    categories: &'a [Category],
    unknown_author: Author,
    unknown_category: Category,
}

impl<'a> Lookup<'a> {
    /// Create a lookup over the given collections.
    #[must_use]
    pub fn new(authors: &'a [Author], categories: &'a [Category]) -> Self {
        Self {
            authors,
            categories,
            unknown_author: Author {
                name: UNKNOWN.to_string(),
                avatar: UNKNOWN_AVATAR.to_string(),
                ..Author::default()
            },
            unknown_category: Category {
                name: UNKNOWN.to_string(),
                ..Category::default()
            },
        }
    }

    /// First author with the given id, or the placeholder author.
    #[must_use]
    pub fn author(&self, id: &RecordId) -> &Author {
        self.authors
            .iter()
            .find(|a| &a.id == id)
            .unwrap_or(&self.unknown_author)
    }

    /// First category with the given id, or the placeholder category.
    #[must_use]
    pub fn category(&self, id: &RecordId) -> &Category {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .unwrap_or(&self.unknown_category)
    }
}
