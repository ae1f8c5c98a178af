#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use paper_digest::ai::{GenerationRequest, InferenceBackend, ModelRegistry};
use paper_digest::feed::{EntryLink, FeedEntry, FeedQuery, FeedSource};
use paper_digest::{AppError, Result};

/// Serves canned entries and counts how often it was asked.
pub struct FakeFeed {
    pub entries: Vec<FeedEntry>,
    pub calls: AtomicUsize,
}

impl FakeFeed {
    pub fn new(entries: Vec<FeedEntry>) -> Arc<Self> {
        Arc::new(Self {
            entries,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .iter()
            .skip(query.offset)
            .take(query.size)
            .cloned()
            .collect())
    }
}

/// Deterministic stand-in for a summarization model.
pub struct FakeModel {
    pub name: String,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeModel {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for FakeModel {
    fn model(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Inference(format!("{} is unavailable", self.name)));
        }
        let words = request.prompt.split_whitespace().count();
        Ok(format!(" Summary by {} of {} words. ", self.name, words))
    }
}

pub fn registry(default: Arc<FakeModel>) -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::new(
        default,
        Box::new(|model| Ok(FakeModel::new(model) as Arc<dyn InferenceBackend>)),
    ))
}

pub fn entry(arxiv_id: &str, title: &str, summary: &str, pdf_base: Option<&str>, published: &str) -> FeedEntry {
    let abs = format!("http://arxiv.org/abs/{}", arxiv_id);
    let mut links = vec![EntryLink {
        href: abs.clone(),
        rel: Some("alternate".to_string()),
        media_type: Some("text/html".to_string()),
    }];
    if let Some(base) = pdf_base {
        links.push(EntryLink {
            href: format!("{}/pdf/{}", base, arxiv_id),
            rel: Some("related".to_string()),
            media_type: Some("application/pdf".to_string()),
        });
    }
    FeedEntry {
        id: abs,
        title: title.to_string(),
        summary: summary.to_string(),
        links,
        published: published.to_string(),
    }
}

/// A PDF with one text page per item.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let contents_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => contents_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
