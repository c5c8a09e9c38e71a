//! Content management for markdown-based editorial pages.
//!
//! This module loads markdown files from the `/content/pages` directory at
//! startup, parses frontmatter metadata, and renders markdown to HTML.
//! Pages are authored per locale (`content/pages/fr/` and
//! `content/pages/en/`); a page missing in one language falls back to the
//! other so a half-translated site never 404s.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use verlaine_core::Locale;

/// Metadata for editorial pages (maison, care guide, legal, etc.)
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub locale: Locale,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded pages in memory
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<(Locale, String), Page>>,
}

impl ContentStore {
    /// Load all pages from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if a locale directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut pages = HashMap::new();
        for locale in [Locale::Fr, Locale::En] {
            let dir = content_dir.join("pages").join(locale.as_str());
            Self::load_locale(&dir, locale, &mut pages)?;
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Load all pages for one locale directory
    fn load_locale(
        dir: &Path,
        locale: Locale,
        pages: &mut HashMap<(Locale, String), Page>,
    ) -> Result<(), ContentError> {
        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path, locale) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}/{}", locale.as_str(), page.slug);
                        pages.insert((locale, page.slug.clone()), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path, locale: Locale) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<PageMeta> = matter
            .parse(&content)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        let content_html = render_markdown(&parsed.content);

        Ok(Page {
            slug,
            locale,
            meta,
            content_html,
        })
    }

    /// Get a page by slug in the requested locale, falling back to the
    /// other locale when no translation exists.
    #[must_use]
    pub fn get_page(&self, locale: Locale, slug: &str) -> Option<&Page> {
        self.pages
            .get(&(locale, slug.to_owned()))
            .or_else(|| self.pages.get(&(locale.other(), slug.to_owned())))
    }

    /// All slugs that exist in at least one locale, sorted.
    #[must_use]
    pub fn all_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.pages.keys().map(|(_, slug)| slug.clone()).collect();
        slugs.sort();
        slugs.dedup();
        slugs
    }
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_page(dir: &Path, locale: &str, slug: &str, title: &str, body: &str) {
        let locale_dir = dir.join("pages").join(locale);
        std::fs::create_dir_all(&locale_dir).expect("create dir");
        let content = format!("---\ntitle: {title}\n---\n\n{body}\n");
        std::fs::write(locale_dir.join(format!("{slug}.md")), content).expect("write page");
    }

    #[test]
    fn test_loads_pages_per_locale() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_page(dir.path(), "fr", "maison", "La Maison", "Fondee a Paris.");
        write_page(dir.path(), "en", "maison", "The House", "Founded in Paris.");

        let store = ContentStore::load(dir.path()).expect("load");

        let fr = store.get_page(Locale::Fr, "maison").expect("fr page");
        assert_eq!(fr.meta.title, "La Maison");
        assert!(fr.content_html.contains("Fondee a Paris."));

        let en = store.get_page(Locale::En, "maison").expect("en page");
        assert_eq!(en.meta.title, "The House");
    }

    #[test]
    fn test_missing_translation_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_page(dir.path(), "fr", "entretien", "Guide d'entretien", "Laine et soie.");

        let store = ContentStore::load(dir.path()).expect("load");

        let en = store.get_page(Locale::En, "entretien").expect("fallback");
        assert_eq!(en.locale, Locale::Fr);
    }

    #[test]
    fn test_unknown_slug_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::load(dir.path()).expect("load");
        assert!(store.get_page(Locale::Fr, "nope").is_none());
    }

    #[test]
    fn test_all_slugs_deduplicates_locales() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_page(dir.path(), "fr", "maison", "La Maison", "a");
        write_page(dir.path(), "en", "maison", "The House", "b");
        write_page(dir.path(), "en", "shipping", "Shipping", "c");

        let store = ContentStore::load(dir.path()).expect("load");
        assert_eq!(store.all_slugs(), vec!["maison", "shipping"]);
    }

    #[test]
    fn test_render_markdown_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }
}
