use chrono::NaiveDateTime;
use chrono_tz::Tz;

use super::fetcher::{FeedEntry, SOURCE_TIME_FORMAT};
use super::topics::match_tags;
use crate::models::{Paper, Published};

const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Turns raw entries into papers numbered 0.. in feed order.
pub fn normalize(entries: Vec<FeedEntry>, tz: Tz) -> Vec<Paper> {
    entries
        .into_iter()
        .enumerate()
        .map(|(id, entry)| normalize_entry(id, entry, tz))
        .collect()
}

fn normalize_entry(id: usize, entry: FeedEntry, tz: Tz) -> Paper {
    let title = collapse_whitespace(&entry.title);
    let summary_text = collapse_whitespace(&entry.summary);
    let abstract_link = primary_link(&entry).unwrap_or_else(|| entry.id.clone());
    let pdf_link = pdf_link(&entry).or_else(|| primary_link(&entry));
    let tags = match_tags(&title, &summary_text);

    Paper {
        id,
        paper_id: stable_id(&entry.id),
        title,
        abstract_link,
        pdf_link,
        summary_text,
        tags,
        published: normalize_timestamp(&entry.published, tz),
    }
}

/// Parses a source UTC timestamp into the display zone, keeping the raw
/// string when it does not parse.
pub fn normalize_timestamp(raw: &str, tz: Tz) -> Published {
    match NaiveDateTime::parse_from_str(raw.trim(), SOURCE_TIME_FORMAT) {
        Ok(naive) => Published::At(naive.and_utc().with_timezone(&tz)),
        Err(e) => {
            tracing::debug!(raw, error = %e, "Unparseable timestamp, keeping raw value");
            Published::Raw(raw.to_string())
        }
    }
}

fn pdf_link(entry: &FeedEntry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| l.media_type.as_deref() == Some(PDF_MEDIA_TYPE))
        .map(|l| l.href.clone())
}

fn primary_link(entry: &FeedEntry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
}

/// `http://arxiv.org/abs/2401.01234v1` becomes `2401.01234v1`; other ids pass through.
pub fn stable_id(entry_id: &str) -> String {
    let trimmed = entry_id.trim();
    ["http://arxiv.org/abs/", "https://arxiv.org/abs/"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed)
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
