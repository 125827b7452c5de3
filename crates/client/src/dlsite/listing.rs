//! Keyword search listing extraction.
//!
//! DLsite serves search results either as a table (`#search_result_list`)
//! or as a grid (`.n_worklist`). The table is tried first; the grid only
//! when the table produced nothing. At most [`MAX_CANDIDATES`] rows are kept.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use absmeta_core::BookMetadata;

use super::RjCode;
use super::work::LANGUAGE;
use crate::extract::{element_text, non_empty_attr, select_first, selector};
use crate::fetch::normalize_image_url;

/// Upper bound on candidates taken from one listing page.
pub const MAX_CANDIDATES: usize = 5;

/// Publisher reported for candidates that could not be enriched.
const PARTIAL_PUBLISHER: &str = "DLsite";

static CODE_IN_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)RJ\d{6,8}").expect("invalid regex"));

static TABLE_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("#search_result_list tr"));
static GRID_ITEMS: LazyLock<Selector> = LazyLock::new(|| selector(".n_worklist li"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".work_name a"));
static MAKER: LazyLock<Selector> = LazyLock::new(|| selector(".maker_name"));
static NARRATOR_LINKS: LazyLock<Selector> = LazyLock::new(|| selector(".author a"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static TABLE_THUMB: LazyLock<Selector> = LazyLock::new(|| selector(".search_result_img_box_inner img"));
static GRID_THUMB: LazyLock<Selector> = LazyLock::new(|| selector(".work_thumb_inner img"));

/// Which listing markup a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Table,
    Grid,
}

impl Layout {
    fn thumbnail(self) -> &'static Selector {
        match self {
            Layout::Table => &TABLE_THUMB,
            Layout::Grid => &GRID_THUMB,
        }
    }
}

/// A search hit as shown on the listing page, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub circle: String,
    pub narrator: String,
    /// Product code from the work link; uppercase when it validates.
    pub code: String,
    pub cover: String,
}

impl Candidate {
    /// The code as an [`RjCode`], when it is well formed.
    pub fn rj_code(&self) -> Option<RjCode> {
        RjCode::parse(&self.code).ok()
    }

    /// Record built from listing data alone.
    pub fn into_partial_record(self) -> BookMetadata {
        BookMetadata {
            title: self.title,
            author: self.circle,
            narrator: self.narrator,
            isbn: self.code,
            publisher: PARTIAL_PUBLISHER.to_string(),
            explicit: true,
            language: LANGUAGE.to_string(),
            cover: self.cover,
            ..Default::default()
        }
    }
}

/// Extract up to [`MAX_CANDIDATES`] candidates from a search results page.
pub fn parse_listing(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let table = collect(root.select(&TABLE_ROWS), Layout::Table);
    if !table.is_empty() {
        return table;
    }

    collect(root.select(&GRID_ITEMS), Layout::Grid)
}

fn collect<'a>(items: impl Iterator<Item = ElementRef<'a>>, layout: Layout) -> Vec<Candidate> {
    items.filter_map(|item| extract_candidate(item, layout)).take(MAX_CANDIDATES).collect()
}

fn extract_candidate(item: ElementRef<'_>, layout: Layout) -> Option<Candidate> {
    let link = select_first(item, &TITLE_LINK)?;
    let title = element_text(link);
    if title.is_empty() {
        return None;
    }

    let href = link.value().attr("href").unwrap_or_default();
    let code = code_from_link(href, layout)?;
    let (circle, narrator) = split_attribution(item);
    let cover = select_first(item, layout.thumbnail()).map(thumbnail_url).unwrap_or_default();

    Some(Candidate { title, circle, narrator, code, cover })
}

/// Product code embedded in a work link.
///
/// The grid layout also accepts the first path segment starting with `RJ`,
/// minus any `.html` suffix.
fn code_from_link(href: &str, layout: Layout) -> Option<String> {
    let raw = match CODE_IN_LINK.find(href) {
        Some(found) => found.as_str().to_string(),
        None if layout == Layout::Grid => href
            .split('/')
            .find(|segment| segment.to_uppercase().starts_with("RJ"))
            .map(|segment| segment.trim_end_matches(".html").to_string())?,
        None => return None,
    };

    Some(RjCode::parse(&raw).map(|code| code.to_string()).unwrap_or(raw))
}

/// Split `.maker_name` links into the circle and the narrators.
///
/// Links nested under `.author` are narrators; the first other non-empty
/// link is the circle.
fn split_attribution(item: ElementRef<'_>) -> (String, String) {
    let Some(maker) = select_first(item, &MAKER) else {
        return (String::new(), String::new());
    };

    let narrator_links: Vec<ElementRef<'_>> = maker.select(&NARRATOR_LINKS).collect();
    let narrator_ids: HashSet<_> = narrator_links.iter().map(|link| link.id()).collect();

    let narrator = narrator_links
        .into_iter()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let circle = maker
        .select(&LINK)
        .filter(|link| !narrator_ids.contains(&link.id()))
        .map(element_text)
        .find(|name| !name.is_empty())
        .unwrap_or_default();

    (circle, narrator)
}

/// `src`, overridden by a non-empty `data-src` (lazy-loaded thumbnails).
fn thumbnail_url(img: ElementRef<'_>) -> String {
    let src = non_empty_attr(img, "data-src").or_else(|| img.value().attr("src")).unwrap_or_default();
    normalize_image_url(src)
}
