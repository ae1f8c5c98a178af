use std::fmt::Write;

use paper_digest::feed::TOPICS;
use paper_digest::models::{GeneratedSummary, Paper};
use paper_digest::store::Batch;

const WIDTH: usize = 88;
const INDENT: &str = "      ";

pub fn render_batch(batch: &Batch, page: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Topic: {}  |  page {}  |  {} papers",
        batch.key.topic,
        page,
        batch.len()
    );

    if batch.is_empty() {
        let _ = writeln!(out, "\nNo papers found.");
        return out;
    }

    for group in batch.days() {
        let _ = writeln!(out, "\n== {} ==", group.day);
        for paper in group.papers {
            render_paper_line(&mut out, paper);
        }
    }
    out
}

fn render_paper_line(out: &mut String, paper: &Paper) {
    let time = paper.published.time_of_day();
    let head = format!("[{:>3}] {:<13} ", paper.id, time);
    let options = textwrap::Options::new(WIDTH)
        .initial_indent(&head)
        .subsequent_indent(INDENT);
    let _ = writeln!(out, "{}", textwrap::fill(&paper.title, options));

    if !paper.tags.is_empty() {
        let _ = writeln!(out, "{}tags: {}", INDENT, paper.tags.join(", "));
    }
    if let Some(pdf) = &paper.pdf_link {
        let _ = writeln!(out, "{}pdf:  {}", INDENT, pdf);
    }
}

pub fn render_summary(paper: &Paper, summary: &GeneratedSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", textwrap::fill(&paper.title, WIDTH));
    let _ = writeln!(out, "{}  ({})", paper.abstract_link, paper.published.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", textwrap::fill(&summary.content, WIDTH));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "-- {} on {}",
        summary.model_version,
        summary.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

pub fn render_topics() -> String {
    let mut out = String::from("all\n");
    for topic in TOPICS {
        let _ = writeln!(out, "{}", topic.label);
    }
    out
}
