use chrono::DateTime;
use chrono_tz::Tz;

/// Display value used when the feed omits a timestamp entirely.
pub const NO_DATE: &str = "No date available";

/// Publication time in the display timezone, or the source string when it
/// could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Published {
    At(DateTime<Tz>),
    Raw(String),
}

impl Published {
    pub fn display(&self) -> String {
        match self {
            Published::At(dt) => dt.format("%b %d, %Y %I:%M %p %Z").to_string(),
            Published::Raw(raw) => raw.clone(),
        }
    }

    /// Grouping key, e.g. `Apr 10, 2025`. Unparsed values group under themselves.
    pub fn day_key(&self) -> String {
        match self {
            Published::At(dt) => dt.format("%b %d, %Y").to_string(),
            Published::Raw(raw) => raw.clone(),
        }
    }

    pub fn time_of_day(&self) -> String {
        match self {
            Published::At(dt) => dt.format("%I:%M %p %Z").to_string(),
            Published::Raw(_) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    /// Position in the batch it was fetched with. Meaningless outside that batch.
    pub id: usize,
    /// Source-assigned identifier, e.g. `2401.01234v1`.
    pub paper_id: String,
    pub title: String,
    pub abstract_link: String,
    pub pdf_link: Option<String>,
    /// The source abstract.
    pub summary_text: String,
    pub tags: Vec<&'static str>,
    pub published: Published,
}

impl Paper {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }
}

#[derive(Debug)]
pub struct DayGroup<'a> {
    pub day: String,
    pub papers: Vec<&'a Paper>,
}

/// Groups papers by display day. Days keep the order in which they first
/// appear and papers keep feed order within a day.
pub fn group_by_day(papers: &[Paper]) -> Vec<DayGroup<'_>> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();
    for paper in papers {
        let day = paper.published.day_key();
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.papers.push(paper),
            None => groups.push(DayGroup {
                day,
                papers: vec![paper],
            }),
        }
    }
    groups
}
