use std::time::Duration;

use lopdf::Document;
use reqwest::Client;
use url::Url;

use crate::error::Result;

const USER_AGENT_STRING: &str = concat!("paper-digest/", env!("CARGO_PKG_VERSION"));

/// Downloads PDFs and pulls their text out page by page.
pub struct PdfExtractor {
    client: Client,
}

impl PdfExtractor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_STRING)
            .build()?;
        Ok(Self { client })
    }

    /// Text of the document at `pdf_url`, or `None` if it could not be
    /// downloaded or parsed. Never fails the caller.
    pub async fn extract(&self, pdf_url: &str) -> Option<String> {
        let bytes = self.download(pdf_url).await?;
        let size = bytes.len();

        // lopdf is synchronous and can be slow on large documents
        match tokio::task::spawn_blocking(move || extract_text(&bytes)).await {
            Ok(text) => {
                if let Some(text) = &text {
                    tracing::info!(url = pdf_url, bytes = size, chars = text.len(), "Extracted PDF text");
                }
                text
            }
            Err(e) => {
                tracing::warn!(url = pdf_url, error = %e, "PDF extraction task failed");
                None
            }
        }
    }

    async fn download(&self, pdf_url: &str) -> Option<Vec<u8>> {
        if Url::parse(pdf_url).is_err() {
            tracing::warn!(url = pdf_url, "Not a valid PDF URL");
            return None;
        }

        let response = match self.client.get(pdf_url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = pdf_url, error = %e, "Failed to download PDF");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(url = pdf_url, status = %response.status(), "Failed to download PDF");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(url = pdf_url, error = %e, "Failed to read PDF body");
                None
            }
        }
    }
}

/// Extracts every page independently and joins them with newlines. A page
/// that yields nothing contributes an empty string.
pub fn extract_text(bytes: &[u8]) -> Option<String> {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable PDF");
            return None;
        }
    };

    let pages = doc.get_pages();
    tracing::debug!(page_count = pages.len(), "Extracting text from PDF");

    let text = pages
        .keys()
        .map(|&page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(page = page_num, error = %e, "No extractable text on page");
                String::new()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(text)
}

/// At most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    enum TestPage<'a> {
        Text(&'a str),
        Broken,
    }

    fn build_pdf(pages: &[TestPage<'_>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let contents_id = match page {
                TestPage::Text(text) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 12.into()]),
                            Operation::new("Td", vec![72.into(), 720.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                }
                // Contents pointing at something that is not a stream
                TestPage::Broken => doc.add_object(Object::Integer(42)),
            };
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

    #[test]
    fn test_unreadable_page_does_not_abort_extraction() {
        let bytes = build_pdf(&[
            TestPage::Text("Opening section"),
            TestPage::Broken,
            TestPage::Text("Closing section"),
        ]);

        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Opening section"));
        assert!(text.contains("Closing section"));
        let opening = text.find("Opening section").unwrap();
        let closing = text.find("Closing section").unwrap();
        assert!(opening < closing);
    }

    #[test]
    fn test_garbage_bytes_are_not_a_pdf() {
        assert!(extract_text(b"definitely not a pdf").is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 5000), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[tokio::test]
    async fn test_extract_from_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pdf/2504.08001v1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(build_pdf(&[TestPage::Text("Remote content")])),
            )
            .mount(&server)
            .await;

        let extractor = PdfExtractor::new(Duration::from_secs(30)).unwrap();
        let text = extractor
            .extract(&format!("{}/pdf/2504.08001v1", server.uri()))
            .await
            .unwrap();
        assert!(text.contains("Remote content"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_absence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let extractor = PdfExtractor::new(Duration::from_secs(30)).unwrap();
        assert!(extractor
            .extract(&format!("{}/missing.pdf", server.uri()))
            .await
            .is_none());
    }

    #[test]
    fn test_invalid_url_is_absence() {
        let extractor = PdfExtractor::new(Duration::from_secs(30)).unwrap();
        assert!(tokio_test::block_on(extractor.extract("not a url")).is_none());
        assert!(tokio_test::block_on(extractor.extract("ftp://example.org/a.pdf")).is_none());
    }

    #[tokio::test]
    async fn test_slow_server_hits_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let extractor = PdfExtractor::new(Duration::from_millis(200)).unwrap();
        assert!(extractor
            .extract(&format!("{}/slow.pdf", server.uri()))
            .await
            .is_none());
    }
}
