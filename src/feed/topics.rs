use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};

/// How a topic decides whether a paper belongs to it.
#[derive(Debug)]
pub enum Matcher {
    /// Any keyword appearing as a case-insensitive substring.
    Keywords(&'static [&'static str]),
    /// A lexical pattern, for topics whose name is a common word fragment.
    Pattern(&'static str),
}

#[derive(Debug)]
pub struct Topic {
    pub label: &'static str,
    matcher: Matcher,
}

pub static TOPICS: &[Topic] = &[
    Topic {
        label: "reinforcement learning",
        matcher: Matcher::Keywords(&["reinforcement learning"]),
    },
    Topic {
        label: "digital twin",
        matcher: Matcher::Keywords(&["digital twin"]),
    },
    Topic {
        label: "agent coordination",
        matcher: Matcher::Keywords(&["agent coordination", "coordination of agents"]),
    },
    Topic {
        label: "multi-agent systems",
        matcher: Matcher::Keywords(&["multi-agent system", "multiagent system"]),
    },
    Topic {
        label: "transformers",
        matcher: Matcher::Pattern(r"\btransformers?\b"),
    },
    Topic {
        label: "explainable ai",
        matcher: Matcher::Keywords(&["explainable ai", "explainable artificial intelligence"]),
    },
    Topic {
        label: "self-supervised learning",
        matcher: Matcher::Keywords(&["self-supervised learning", "self-supervised"]),
    },
    Topic {
        label: "federated learning",
        matcher: Matcher::Keywords(&["federated learning"]),
    },
];

// Index-aligned with TOPICS; `None` for keyword topics.
static PATTERNS: OnceLock<Vec<Option<Regex>>> = OnceLock::new();

fn patterns() -> &'static [Option<Regex>] {
    PATTERNS.get_or_init(|| {
        TOPICS
            .iter()
            .map(|topic| match topic.matcher {
                Matcher::Pattern(p) => Regex::new(p).ok(),
                Matcher::Keywords(_) => None,
            })
            .collect()
    })
}

impl Topic {
    /// `text` must already be lowercased.
    fn matches(&self, index: usize, text: &str) -> bool {
        match self.matcher {
            Matcher::Keywords(keywords) => keywords.iter().any(|k| text.contains(k)),
            Matcher::Pattern(_) => patterns()[index]
                .as_ref()
                .is_some_and(|re| re.is_match(text)),
        }
    }
}

pub fn find_topic(label: &str) -> Option<&'static Topic> {
    let label = label.trim();
    TOPICS.iter().find(|t| t.label.eq_ignore_ascii_case(label))
}

/// Tags for a paper, in vocabulary order.
pub fn match_tags(title: &str, abstract_text: &str) -> Vec<&'static str> {
    let combined = format!("{} {}", title, abstract_text).to_lowercase();
    TOPICS
        .iter()
        .enumerate()
        .filter(|(i, topic)| topic.matches(*i, &combined))
        .map(|(_, topic)| topic.label)
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub enum TopicFilter {
    All,
    Topic(&'static Topic),
}

impl TopicFilter {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(TopicFilter::All);
        }
        find_topic(value)
            .map(TopicFilter::Topic)
            .ok_or_else(|| AppError::UnknownTopic(value.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopicFilter::All => "all",
            TopicFilter::Topic(topic) => topic.label,
        }
    }

    /// Topics that make up the search clause.
    pub fn topics(&self) -> Vec<&'static Topic> {
        match self {
            TopicFilter::All => TOPICS.iter().collect(),
            TopicFilter::Topic(topic) => vec![*topic],
        }
    }
}

impl PartialEq for TopicFilter {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Eq for TopicFilter {}
