//! The DLsite work entity and its mapping onto [`BookMetadata`].

use absmeta_core::BookMetadata;

use super::RjCode;
use crate::extract::published_year;

/// Age-rating marker for all-ages works.
const ALL_AGES_MARKER: &str = "全年齢";

/// Language reported for every DLsite work.
pub const LANGUAGE: &str = "Japanese";

/// Everything extracted from a single work page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    pub code: RjCode,
    pub url: String,
    pub title: String,
    pub circle: String,
    pub narrators: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub cover_url: String,
    /// `YYYY-MM-DD` when the page date parsed cleanly.
    pub release_date: String,
    pub series: String,
    pub scenario: String,
    pub work_format: String,
    pub age_rating: String,
}

impl Work {
    /// An empty work for `code`, to be filled in by the page extractor.
    pub fn new(code: RjCode, url: impl Into<String>) -> Self {
        Self {
            code,
            url: url.into(),
            title: String::new(),
            circle: String::new(),
            narrators: Vec::new(),
            tags: Vec::new(),
            description: String::new(),
            cover_url: String::new(),
            release_date: String::new(),
            series: String::new(),
            scenario: String::new(),
            work_format: String::new(),
            age_rating: String::new(),
        }
    }

    /// Adult unless the rating says all-ages; a missing rating counts as adult.
    pub fn is_explicit(&self) -> bool {
        !self.age_rating.contains(ALL_AGES_MARKER)
    }

    /// Scenario writer when credited, otherwise the circle.
    pub fn author(&self) -> &str {
        if self.scenario.is_empty() { &self.circle } else { &self.scenario }
    }

    pub fn into_record(self) -> BookMetadata {
        let explicit = self.is_explicit();
        let author = self.author().to_string();
        let genres = if self.work_format.is_empty() { Vec::new() } else { vec![self.work_format] };

        BookMetadata {
            title: self.title,
            author,
            narrator: self.narrators.join(", "),
            series: self.series,
            description: self.description,
            publisher: self.circle,
            published_year: published_year(&self.release_date),
            genres,
            tags: self.tags,
            cover: self.cover_url,
            isbn: self.code.to_string(),
            asin: String::new(),
            language: LANGUAGE.to_string(),
            explicit,
        }
    }
}
