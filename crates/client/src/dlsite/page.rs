//! Work page extraction.
//!
//! Every field is read independently; a missing element leaves the field
//! empty instead of failing the whole page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{RjCode, Work};
use crate::extract::{all_texts, element_text, first_text, normalize_date, select_first, selector, text_with_breaks};
use crate::fetch::normalize_image_url;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("#work_name"));
static CIRCLE: LazyLock<Selector> = LazyLock::new(|| selector("span.maker_name a"));
static COVER: LazyLock<Selector> = LazyLock::new(|| selector(".product-slider-data div"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(".work_parts_area"));
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static OUTLINE_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("#work_outline tr"));
static TH: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// Outline table fields, keyed by a substring of the row header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutlineField {
    Narrators,
    Tags,
    ReleaseDate,
    Series,
    Scenario,
    WorkFormat,
    AgeRating,
}

impl OutlineField {
    fn from_header(header: &str) -> Option<Self> {
        const HEADERS: &[(&str, OutlineField)] = &[
            ("声優", OutlineField::Narrators),
            ("ジャンル", OutlineField::Tags),
            ("販売日", OutlineField::ReleaseDate),
            ("シリーズ", OutlineField::Series),
            ("シナリオ", OutlineField::Scenario),
            ("作品形式", OutlineField::WorkFormat),
            ("年齢指定", OutlineField::AgeRating),
        ];

        HEADERS.iter().find(|(keyword, _)| header.contains(keyword)).map(|(_, field)| *field)
    }
}

/// Extract a [`Work`] from a fetched work page.
pub fn parse_work_page(html: &str, code: RjCode, url: impl Into<String>) -> Work {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut work = Work::new(code, url);
    work.title = first_text(root, &TITLE).unwrap_or_default();
    work.circle = first_text(root, &CIRCLE).unwrap_or_default();
    work.cover_url = extract_cover(root);
    work.description = extract_description(root);

    for row in root.select(&OUTLINE_ROWS) {
        apply_outline_row(row, &mut work);
    }

    work
}

fn extract_cover(root: ElementRef<'_>) -> String {
    let Some(node) = select_first(root, &COVER) else {
        return String::new();
    };

    let value = node.value();
    let src = value.attr("data-src").or_else(|| value.attr("src")).unwrap_or_default();
    normalize_image_url(src)
}

fn extract_description(root: ElementRef<'_>) -> String {
    match select_first(root, &DESCRIPTION) {
        Some(block) => text_with_breaks(block),
        None => select_first(root, &OG_DESCRIPTION)
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .unwrap_or_default(),
    }
}

fn apply_outline_row(row: ElementRef<'_>, work: &mut Work) {
    let header = first_text(row, &TH).unwrap_or_default();
    let Some(field) = OutlineField::from_header(&header) else {
        return;
    };
    let Some(cell) = select_first(row, &TD) else {
        return;
    };

    match field {
        OutlineField::Narrators => work.narrators.extend(all_texts(cell, &LINK)),
        OutlineField::Tags => work.tags.extend(all_texts(cell, &LINK)),
        OutlineField::ReleaseDate => {
            let raw = first_text(cell, &LINK).unwrap_or_else(|| element_text(cell));
            work.release_date = normalize_date(&raw);
        }
        OutlineField::Series => work.series = cell_value(cell),
        OutlineField::Scenario => work.scenario = cell_value(cell),
        OutlineField::WorkFormat => work.work_format = cell_value(cell),
        OutlineField::AgeRating => work.age_rating = cell_value(cell),
    }
}

/// First link text when the cell has links, otherwise the whole cell text.
fn cell_value(cell: ElementRef<'_>) -> String {
    first_text(cell, &LINK).unwrap_or_else(|| element_text(cell))
}
