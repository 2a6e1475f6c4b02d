//! OpenAlex adapter: one instance per venue (working-paper series, journal or
//! institution), all backed by the `/works` endpoint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::paper::{ResearchPaper, display_authors};
use crate::query::{QueryPlan, SourceId};
use crate::scoring::{ScoreInput, relevance_score};
use crate::tagging::{TagFallback, generate_tags};

use super::http_client::build_source_http_client;
use super::utils::non_blank;
use super::{DEFAULT_RESULTS_PER_SOURCE, PaperSource, SourceConfig, SourceError};

/// Production OpenAlex API host.
pub const DEFAULT_OPENALEX_BASE_URL: &str = "https://api.openalex.org";

const FALLBACK_SOURCE_LABEL: &str = "OpenAlex";
const CATCH_ALL_SEARCH: &str = "finance";
const SSRN_LABEL: &str = "SSRN";
const MISSING_ABSTRACT: &str =
    "Abstract preview not available via API. Open the full record at the source for details.";

/// Work types kept; everything else (editorials, errata, datasets) is dropped.
const ACCEPTED_WORK_TYPES: &[&str] = &["article", "preprint", "report", "dissertation"];

/// Title fragments that mark journal front/back matter rather than papers.
const JUNK_TITLE_TERMS: &[&str] = &[
    "front matter",
    "back matter",
    "issue information",
    "table of contents",
    "editorial board",
    "masthead",
    "cover image",
    "index to",
    "author index",
];

/// Positions past this are ignored when rebuilding an abstract.
const MAX_ABSTRACT_POSITIONS: usize = 20_000;

/// Canonical label substituted when a work's venue name does not mention its institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstitutionLabel {
    /// Lowercase fragment that marks the venue name as already canonical.
    pub marker: &'static str,
    pub canonical: &'static str,
}

/// A named slice of OpenAlex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenAlexVenue {
    pub id: SourceId,
    /// Default source label when a work has no venue display name.
    pub label: &'static str,
    /// Venue-restricting filter clause, already URL-encoded.
    pub filter: Option<&'static str>,
    /// Search used when the plan has no topic phrases or search term.
    pub fallback_search: Option<&'static str>,
    pub institution: Option<InstitutionLabel>,
}

impl OpenAlexVenue {
    const fn venue(id: SourceId, label: &'static str, filter: &'static str) -> Self {
        Self {
            id,
            label,
            filter: Some(filter),
            fallback_search: None,
            institution: None,
        }
    }

    const fn catch_all(id: SourceId, label: &'static str, filter: Option<&'static str>) -> Self {
        Self {
            id,
            label,
            filter,
            fallback_search: Some(CATCH_ALL_SEARCH),
            institution: None,
        }
    }

    const fn institution(
        id: SourceId,
        label: &'static str,
        filter: &'static str,
        marker: &'static str,
        canonical: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            filter: Some(filter),
            fallback_search: None,
            institution: Some(InstitutionLabel { marker, canonical }),
        }
    }

    /// Looks up the venue backing `id`; `None` for non-OpenAlex sources.
    #[must_use]
    pub fn lookup(id: SourceId) -> Option<Self> {
        OPENALEX_VENUES.into_iter().find(|venue| venue.id == id)
    }
}

/// Every OpenAlex-backed source, in [`SourceId::ALL`] order.
pub const OPENALEX_VENUES: [OpenAlexVenue; 11] = [
    OpenAlexVenue::venue(
        SourceId::Ssrn,
        "SSRN",
        "primary_location.source.display_name.search:ssrn",
    ),
    OpenAlexVenue::institution(
        SourceId::Bis,
        "BIS",
        "institutions.search:Bank%20for%20International%20Settlements",
        "bis",
        "BIS Working Papers",
    ),
    OpenAlexVenue::institution(
        SourceId::FederalReserve,
        "Federal Reserve",
        "institutions.search:Federal%20Reserve",
        "federal reserve",
        "Federal Reserve",
    ),
    OpenAlexVenue::institution(
        SourceId::Bls,
        "BLS",
        "institutions.search:Bureau%20of%20Labor%20Statistics",
        "labor statistics",
        "BLS",
    ),
    OpenAlexVenue::institution(
        SourceId::Nber,
        "NBER",
        "institutions.search:National%20Bureau%20of%20Economic%20Research",
        "nber",
        "NBER",
    ),
    OpenAlexVenue::venue(
        SourceId::Elsevier,
        "Elsevier",
        "primary_location.source.host_organization_name.search:Elsevier",
    ),
    OpenAlexVenue::venue(
        SourceId::JournalOfFinance,
        "Journal of Finance",
        "primary_location.source.display_name.search:Journal%20of%20Finance",
    ),
    OpenAlexVenue::venue(
        SourceId::JournalOfFinancialEconomics,
        "Journal of Financial Economics",
        "primary_location.source.display_name.search:Journal%20of%20Financial%20Economics",
    ),
    OpenAlexVenue::venue(
        SourceId::ReviewOfFinancialStudies,
        "Review of Financial Studies",
        "primary_location.source.display_name.search:Review%20of%20Financial%20Studies",
    ),
    OpenAlexVenue::catch_all(SourceId::OpenAlex, "OpenAlex Journals", None),
    OpenAlexVenue::catch_all(
        SourceId::ResearchGate,
        "ResearchGate",
        Some("open_access.is_oa:true"),
    ),
];

/// Source adapter for one OpenAlex venue.
#[derive(Debug, Clone)]
pub struct OpenAlexSource {
    client: Client,
    base_url: String,
    per_page: usize,
    mailto: Option<String>,
    venue: OpenAlexVenue,
}

impl OpenAlexSource {
    /// Creates an adapter for `venue` against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(venue: OpenAlexVenue) -> Result<Self, SourceError> {
        Self::with_base_url(venue, DEFAULT_OPENALEX_BASE_URL)
    }

    /// Creates an adapter with a custom base URL (for tests with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_base_url(
        venue: OpenAlexVenue,
        base_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_source_http_client(venue.label)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            per_page: DEFAULT_RESULTS_PER_SOURCE,
            mailto: None,
            venue,
        })
    }

    /// Creates an adapter from shared source settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(venue: OpenAlexVenue, config: &SourceConfig) -> Result<Self, SourceError> {
        let source = Self::with_base_url(venue, config.openalex_base_url.as_str())?
            .with_per_page(config.openalex_per_page);
        Ok(match config.mailto.as_deref() {
            Some(mailto) => source.with_mailto(mailto),
            None => source,
        })
    }

    /// Sets the `per_page` request parameter.
    #[must_use]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sends `mailto` with every request (OpenAlex polite pool).
    #[must_use]
    pub fn with_mailto(mut self, mailto: impl Into<String>) -> Self {
        let mailto: String = mailto.into();
        self.mailto = non_blank(Some(mailto.as_str())).map(ToString::to_string);
        self
    }

    /// Returns the venue this adapter queries.
    #[must_use]
    pub fn venue(&self) -> OpenAlexVenue {
        self.venue
    }

    /// Renders the request URL for `plan`.
    #[must_use]
    pub fn request_url(&self, plan: &QueryPlan) -> String {
        let filter = plan.openalex_filter(self.venue.filter, self.venue.fallback_search);
        let mut url = format!(
            "{}/works?filter={filter}&sort=publication_date:desc&per_page={}",
            self.base_url, self.per_page
        );
        if let Some(mailto) = &self.mailto {
            url.push_str("&mailto=");
            url.push_str(&urlencoding::encode(mailto));
        }
        url
    }
}

#[async_trait]
impl PaperSource for OpenAlexSource {
    fn id(&self) -> SourceId {
        self.venue.id
    }

    fn name(&self) -> &str {
        self.venue.label
    }

    #[instrument(skip(self, plan), fields(source = self.venue.label))]
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<ResearchPaper>, SourceError> {
        let url = self.request_url(plan);
        debug!(api_url = %url, "Calling OpenAlex API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::network(self.venue.label, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "OpenAlex API error");
            return Err(SourceError::http_status(self.venue.label, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::network(self.venue.label, e))?;

        let papers = parse_works(&body, &self.venue, plan.today)?;
        debug!(count = papers.len(), "Parsed OpenAlex works");
        Ok(papers)
    }
}

// ==================== Wire schema ====================

#[derive(Debug, Deserialize)]
struct WorksEnvelope {
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Work {
    id: Option<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    title: Option<String>,
    publication_date: Option<String>,
    cited_by_count: Option<u32>,
    doi: Option<String>,
    authorships: Option<Vec<Authorship>>,
    abstract_inverted_index: Option<BTreeMap<String, Vec<usize>>>,
    primary_location: Option<Location>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Authorship {
    author: Option<AuthorRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthorRef {
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Location {
    source: Option<LocationSource>,
    landing_page_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationSource {
    display_name: Option<String>,
}

/// Parses a `/works` response body into normalized papers for `venue`.
///
/// A body without `results` yields an empty list. Individual works that do
/// not match the schema are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] when the body is not a JSON object.
pub(crate) fn parse_works(
    body: &str,
    venue: &OpenAlexVenue,
    today: NaiveDate,
) -> Result<Vec<ResearchPaper>, SourceError> {
    let envelope: WorksEnvelope =
        serde_json::from_str(body).map_err(|e| SourceError::parse(venue.label, e))?;

    let mut papers = Vec::new();
    for (index, raw) in envelope.results.unwrap_or_default().into_iter().enumerate() {
        let work: Work = match serde_json::from_value(raw) {
            Ok(work) => work,
            Err(error) => {
                debug!(index, error = %error, "Skipping malformed OpenAlex work");
                continue;
            }
        };
        if let Some(paper) = work_to_paper(work, index, venue, today) {
            papers.push(paper);
        }
    }
    Ok(papers)
}

fn work_to_paper(
    work: Work,
    index: usize,
    venue: &OpenAlexVenue,
    today: NaiveDate,
) -> Option<ResearchPaper> {
    let work_type = work.work_type.as_deref().map(str::to_ascii_lowercase)?;
    if !ACCEPTED_WORK_TYPES.contains(&work_type.as_str()) {
        return None;
    }

    let title = non_blank(work.title.as_deref())?.to_string();
    let lowered_title = title.to_lowercase();
    if JUNK_TITLE_TERMS
        .iter()
        .any(|term| lowered_title.contains(term))
    {
        debug!(%title, "Skipping front/back matter");
        return None;
    }

    let location = work.primary_location.as_ref();
    let venue_name = location
        .and_then(|l| l.source.as_ref())
        .and_then(|s| non_blank(s.display_name.as_deref()));
    let source = source_label(venue_name, venue);

    let authors = display_authors(
        work.authorships
            .iter()
            .flatten()
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| a.display_name.as_deref()),
    );

    let abstract_text = work
        .abstract_inverted_index
        .as_ref()
        .map(reconstruct_abstract)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_ABSTRACT.to_string());

    let citations = work.cited_by_count.unwrap_or(0);
    let date = non_blank(work.publication_date.as_deref())
        .unwrap_or_default()
        .to_string();
    let url = non_blank(work.doi.as_deref())
        .or_else(|| location.and_then(|l| non_blank(l.landing_page_url.as_deref())))
        .unwrap_or_default()
        .to_string();

    let tags = generate_tags(&title, &abstract_text, TagFallback::Research);
    let relevance_score = relevance_score(
        &ScoreInput {
            title: &title,
            abstract_text: &abstract_text,
            date: &date,
            tag_count: tags.len(),
            citation_count: Some(citations),
        },
        today,
    );

    Some(ResearchPaper {
        id: non_blank(work.id.as_deref())
            .map_or_else(|| format!("openalex:{}:{index}", venue.id), ToString::to_string),
        title,
        authors,
        abstract_text,
        date,
        source,
        url,
        tags,
        relevance_score,
        citation_count: Some(citations),
    })
}

fn source_label(venue_name: Option<&str>, venue: &OpenAlexVenue) -> String {
    let mut label = venue_name.unwrap_or(venue.label).to_string();
    if label.is_empty() {
        label = FALLBACK_SOURCE_LABEL.to_string();
    }
    if label.to_lowercase().contains("ssrn") {
        label = SSRN_LABEL.to_string();
    }
    if let Some(institution) = venue.institution
        && !label.to_lowercase().contains(institution.marker)
    {
        label = institution.canonical.to_string();
    }
    label
}

/// Rebuilds abstract text from an inverted index (word to positions).
///
/// Each word is placed at every listed position and the placed words are
/// joined with single spaces. Unfilled positions are skipped.
#[must_use]
pub fn reconstruct_abstract(index: &BTreeMap<String, Vec<usize>>) -> String {
    let len = index
        .values()
        .flatten()
        .copied()
        .filter(|&position| position < MAX_ABSTRACT_POSITIONS)
        .max()
        .map_or(0, |max| max + 1);

    let mut slots: Vec<Option<&str>> = vec![None; len];
    for (word, positions) in index {
        for &position in positions {
            if let Some(slot) = slots.get_mut(position) {
                *slot = Some(word.as_str());
            }
        }
    }

    slots.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::{DatePreset, ScanRequest, Topic};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn venue(id: SourceId) -> OpenAlexVenue {
        OpenAlexVenue::lookup(id).unwrap()
    }

    fn work(extra: serde_json::Value) -> serde_json::Value {
        let mut base = serde_json::json!({
            "id": "https://openalex.org/W1",
            "type": "article",
            "title": "Liquidity Premia in Corporate Bonds",
            "publication_date": "2024-06-01",
            "cited_by_count": 4,
            "doi": "https://doi.org/10.1234/abc",
            "authorships": [
                {"author": {"display_name": "Ada Lovelace"}},
                {"author": {"display_name": "Charles Babbage"}}
            ],
            "abstract_inverted_index": {"Bonds": [0], "trade": [1], "rarely": [2]},
            "primary_location": {
                "source": {"display_name": "Journal of Finance"},
                "landing_page_url": "https://example.org/landing"
            }
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        base
    }

    fn parse(results: Vec<serde_json::Value>, id: SourceId) -> Vec<ResearchPaper> {
        let body = serde_json::json!({ "results": results }).to_string();
        parse_works(&body, &venue(id), today()).unwrap()
    }

    #[test]
    fn test_reconstruct_abstract_places_repeated_words() {
        let index: BTreeMap<String, Vec<usize>> = serde_json::from_value(serde_json::json!({
            "the": [0, 4], "fox": [1], "jumps": [2], "quick": [3]
        }))
        .unwrap();
        assert_eq!(reconstruct_abstract(&index), "the fox jumps quick the");
    }

    #[test]
    fn test_reconstruct_abstract_empty_index() {
        assert_eq!(reconstruct_abstract(&BTreeMap::new()), "");
    }

    #[test]
    fn test_work_normalization() {
        let papers = parse(vec![work(serde_json::json!({}))], SourceId::JournalOfFinance);
        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        assert_eq!(paper.id, "https://openalex.org/W1");
        assert_eq!(paper.source, "Journal of Finance");
        assert_eq!(paper.abstract_text, "Bonds trade rarely");
        assert_eq!(paper.url, "https://doi.org/10.1234/abc");
        assert_eq!(paper.citation_count, Some(4));
        assert_eq!(paper.authors, vec!["Ada Lovelace", "Charles Babbage"]);
        assert!(paper.tags.iter().any(|t| t == "Fixed Income"));
    }

    #[test]
    fn test_rejected_work_types_and_junk_titles() {
        let papers = parse(
            vec![
                work(serde_json::json!({"type": "editorial"})),
                work(serde_json::json!({"type": null})),
                work(serde_json::json!({"title": "Issue Information"})),
                work(serde_json::json!({"title": "Editorial Board"})),
                work(serde_json::json!({"title": "   "})),
                work(serde_json::json!({"type": "preprint"})),
            ],
            SourceId::OpenAlex,
        );
        assert_eq!(papers.len(), 1);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let papers = parse(
            vec![serde_json::json!({"type": "report", "title": "Working Paper"})],
            SourceId::OpenAlex,
        );
        let paper = &papers[0];
        assert_eq!(paper.id, "openalex:OpenAlex:0");
        assert_eq!(paper.source, "OpenAlex Journals");
        assert_eq!(paper.authors, vec!["Unknown Author"]);
        assert_eq!(paper.abstract_text, MISSING_ABSTRACT);
        assert_eq!(paper.date, "");
        assert_eq!(paper.url, "");
        assert_eq!(paper.citation_count, Some(0));
    }

    #[test]
    fn test_landing_page_used_without_doi() {
        let papers = parse(vec![work(serde_json::json!({"doi": null}))], SourceId::OpenAlex);
        assert_eq!(papers[0].url, "https://example.org/landing");
    }

    #[test]
    fn test_ssrn_and_institution_labels() {
        let ssrn = work(serde_json::json!({
            "primary_location": {"source": {"display_name": "SSRN Electronic Journal"}}
        }));
        assert_eq!(parse(vec![ssrn], SourceId::Ssrn)[0].source, "SSRN");

        let fed = work(serde_json::json!({
            "primary_location": {"source": {"display_name": "Finance and Economics Discussion Series"}}
        }));
        assert_eq!(
            parse(vec![fed], SourceId::FederalReserve)[0].source,
            "Federal Reserve"
        );

        let bis = work(serde_json::json!({
            "primary_location": {"source": {"display_name": "BIS Quarterly Review"}}
        }));
        assert_eq!(parse(vec![bis], SourceId::Bis)[0].source, "BIS Quarterly Review");

        let bls = work(serde_json::json!({"primary_location": null}));
        assert_eq!(parse(vec![bls], SourceId::Bls)[0].source, "BLS");
    }

    #[test]
    fn test_malformed_work_is_skipped() {
        let papers = parse(
            vec![
                work(serde_json::json!({"cited_by_count": "many"})),
                work(serde_json::json!({})),
            ],
            SourceId::OpenAlex,
        );
        assert_eq!(papers.len(), 1);
    }

    #[test]
    fn test_missing_results_is_empty() {
        let papers = parse_works("{}", &venue(SourceId::Nber), today()).unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let err = parse_works("<html>", &venue(SourceId::Nber), today()).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn test_every_openalex_source_has_a_venue() {
        for id in SourceId::ALL {
            assert_eq!(
                OpenAlexVenue::lookup(id).is_some(),
                id != SourceId::Arxiv,
                "venue lookup mismatch for {id}"
            );
        }
    }

    #[test]
    fn test_request_url_shape() {
        let source = OpenAlexSource::with_base_url(venue(SourceId::Nber), "http://localhost:9999")
            .unwrap()
            .with_mailto("ops@example.org");
        let plan = QueryPlan::build(
            &ScanRequest::new(vec![Topic::All], vec![SourceId::Nber], DatePreset::Month),
            today(),
        );
        assert_eq!(
            source.request_url(&plan),
            "http://localhost:9999/works?filter=institutions.search:National%20Bureau%20of%20Economic%20Research,from_publication_date:2024-05-16&sort=publication_date:desc&per_page=30&mailto=ops%40example.org"
        );
    }

    #[test]
    fn test_catch_all_venue_uses_fallback_search() {
        let source =
            OpenAlexSource::with_base_url(venue(SourceId::OpenAlex), "http://localhost:9999")
                .unwrap();
        let plan = QueryPlan::build(
            &ScanRequest::new(vec![Topic::All], vec![SourceId::OpenAlex], DatePreset::Month),
            today(),
        );
        assert!(
            source
                .request_url(&plan)
                .contains("filter=default.search:finance,from_publication_date:2024-05-16")
        );
    }
}
