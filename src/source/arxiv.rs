//! arXiv adapter: queries the export API and parses its Atom feed.

use async_trait::async_trait;
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::paper::{ResearchPaper, display_authors};
use crate::query::{QueryPlan, SourceId};
use crate::scoring::{ScoreInput, relevance_score};
use crate::tagging::{TagFallback, generate_tags};

use super::http_client::build_source_http_client;
use super::utils::{collapse_line_breaks, non_blank};
use super::{DEFAULT_RESULTS_PER_SOURCE, PaperSource, SourceConfig, SourceError};

/// Production arXiv API host.
pub const DEFAULT_ARXIV_BASE_URL: &str = "https://export.arxiv.org";

/// Source label stamped on every arXiv paper.
pub const ARXIV_SOURCE_LABEL: &str = "arXiv";

const MISSING_TITLE: &str = "No Title";
const MISSING_ABSTRACT: &str = "Abstract not available.";

/// Source adapter for the arXiv export API.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Client,
    base_url: String,
    max_results: usize,
    cors_proxy: Option<String>,
}

impl ArxivSource {
    /// Creates an adapter against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_ARXIV_BASE_URL)
    }

    /// Creates an adapter with a custom base URL (for tests with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_source_http_client(ARXIV_SOURCE_LABEL)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: DEFAULT_RESULTS_PER_SOURCE,
            cors_proxy: None,
        })
    }

    /// Creates an adapter from shared source settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let source = Self::with_base_url(config.arxiv_base_url.as_str())?
            .with_max_results(config.arxiv_max_results);
        Ok(match config.cors_proxy.as_deref() {
            Some(proxy) => source.with_cors_proxy(proxy),
            None => source,
        })
    }

    /// Sets the `max_results` request parameter.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Routes requests through a relay: the encoded target URL is appended to `proxy`.
    #[must_use]
    pub fn with_cors_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.cors_proxy = Some(proxy.into());
        self
    }

    /// Renders the request URL for `plan`, relay prefix included.
    #[must_use]
    pub fn request_url(&self, plan: &QueryPlan) -> String {
        let target = format!(
            "{}/api/query?search_query={}&sortBy=submittedDate&sortOrder=descending&max_results={}",
            self.base_url,
            plan.arxiv_search_query(),
            self.max_results
        );
        match &self.cors_proxy {
            Some(proxy) => format!("{proxy}{}", urlencoding::encode(&target)),
            None => target,
        }
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    fn id(&self) -> SourceId {
        SourceId::Arxiv
    }

    fn name(&self) -> &str {
        ARXIV_SOURCE_LABEL
    }

    #[instrument(skip(self, plan), fields(source = ARXIV_SOURCE_LABEL))]
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<ResearchPaper>, SourceError> {
        let url = self.request_url(plan);
        debug!(api_url = %url, "Calling arXiv API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::network(ARXIV_SOURCE_LABEL, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "arXiv API error");
            return Err(SourceError::http_status(ARXIV_SOURCE_LABEL, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::network(ARXIV_SOURCE_LABEL, e))?;

        let papers = parse_atom_feed(&body, plan.today)?;
        debug!(count = papers.len(), "Parsed arXiv feed");
        Ok(papers)
    }
}

/// Parses an Atom feed body into normalized papers scored against `today`.
///
/// An empty body or a feed with no entries yields an empty list.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] when the body is not well-formed XML.
pub(crate) fn parse_atom_feed(xml: &str, today: NaiveDate) -> Result<Vec<ResearchPaper>, SourceError> {
    let entries = read_entries(xml).map_err(|e| SourceError::parse(ARXIV_SOURCE_LABEL, e))?;
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_paper(index, today))
        .collect())
}

#[derive(Debug, Default)]
struct AtomEntry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    authors: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum EntryField {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

impl AtomEntry {
    fn set(&mut self, field: EntryField, value: String) {
        match field {
            EntryField::Id => self.id = Some(value),
            EntryField::Title => self.title = Some(value),
            EntryField::Summary => self.summary = Some(value),
            EntryField::Published => self.published = Some(value),
            EntryField::AuthorName => self.authors.push(value),
        }
    }

    fn into_paper(self, index: usize, today: NaiveDate) -> ResearchPaper {
        let title = non_blank(self.title.as_deref())
            .map_or_else(|| MISSING_TITLE.to_string(), collapse_line_breaks);
        let abstract_text = non_blank(self.summary.as_deref())
            .map_or_else(|| MISSING_ABSTRACT.to_string(), collapse_line_breaks);
        let date = self
            .published
            .as_deref()
            .and_then(|published| published.trim().split('T').next())
            .unwrap_or_default()
            .to_string();
        let entry_url = non_blank(self.id.as_deref()).map(ToString::to_string);

        let tags = generate_tags(&title, &abstract_text, TagFallback::Preprint);
        let relevance_score = relevance_score(
            &ScoreInput {
                title: &title,
                abstract_text: &abstract_text,
                date: &date,
                tag_count: tags.len(),
                citation_count: None,
            },
            today,
        );

        ResearchPaper {
            id: entry_url
                .clone()
                .unwrap_or_else(|| format!("arxiv:generated:{index}")),
            title,
            authors: display_authors(&self.authors),
            abstract_text,
            date,
            source: ARXIV_SOURCE_LABEL.to_string(),
            url: entry_url.unwrap_or_default(),
            tags,
            relevance_score,
            citation_count: None,
        }
    }
}

/// Reads every `<entry>` in document order.
///
/// A tracked field collects all descendant text until its own end tag, so
/// inline markup inside a title or summary keeps the surrounding words.
fn read_entries(xml: &str) -> Result<Vec<AtomEntry>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut entries = Vec::new();
    let mut current: Option<AtomEntry> = None;
    // Open field and the element depth it was opened at.
    let mut field: Option<(EntryField, usize)> = None;
    let mut depth = 0usize;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                depth += 1;
                if field.is_some() {
                    continue;
                }
                let opened = match element.local_name().as_ref() {
                    b"entry" => {
                        current = Some(AtomEntry::default());
                        None
                    }
                    b"author" => {
                        in_author = true;
                        None
                    }
                    b"name" if in_author => Some(EntryField::AuthorName),
                    b"id" if !in_author => Some(EntryField::Id),
                    b"title" if !in_author => Some(EntryField::Title),
                    b"summary" if !in_author => Some(EntryField::Summary),
                    b"published" if !in_author => Some(EntryField::Published),
                    _ => None,
                };
                if let Some(opened) = opened
                    && current.is_some()
                {
                    field = Some((opened, depth));
                    text.clear();
                }
            }
            Event::Text(content) => {
                if field.is_some() {
                    text.push_str(&content.unescape()?);
                }
            }
            Event::CData(content) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::End(element) => {
                let closing_depth = depth;
                depth = depth.saturating_sub(1);
                match field {
                    Some((open, open_depth)) if open_depth == closing_depth => {
                        field = None;
                        if let Some(entry) = current.as_mut() {
                            entry.set(open, text.trim().to_string());
                        }
                        text.clear();
                    }
                    Some(_) => {}
                    None => match element.local_name().as_ref() {
                        b"entry" => {
                            if let Some(entry) = current.take() {
                                entries.push(entry);
                            }
                        }
                        b"author" => in_author = false,
                        _ => {}
                    },
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
