/// A syndication feed configured for one run, with a cap on how many
/// entries it may contribute to the digest.
#[derive(Debug, Clone)]
pub struct Source {
    pub url: String,
    pub max_entries: usize,
}

impl Source {
    pub fn new(url: impl Into<String>, max_entries: usize) -> Self {
        Self {
            url: url.into(),
            max_entries,
        }
    }
}

/// One item read from a source, reduced to what the digest needs.
/// Missing fields are substituted before this struct is built.
#[derive(Debug, Clone)]
pub struct Entry {
    pub title: String,
    pub summary: String,
}

/// The aggregated, rendered text built from all kept entries for one run.
/// "Zero entries anywhere" is represented as `None` at the call site, never
/// as an empty `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub text: String,
    pub entry_count: usize,
}

/// Per-source outcome of one aggregation pass. Collected into a list so the
/// skip/continue logic is visible as ordinary control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Fetched { url: String, kept: usize },
    Empty { url: String },
    Failed { url: String, error: String },
}

/// Everything `fetch_news` produced: the digest (if any entries were kept)
/// plus the per-source outcomes for observability.
#[derive(Debug)]
pub struct Aggregation {
    pub digest: Option<Digest>,
    pub sources: Vec<SourceOutcome>,
}

/// Raw text returned by a generation backend, plus which backend in the
/// chain produced it.
#[derive(Debug, Clone)]
pub struct GeneratedArticle {
    pub raw: String,
    pub model: String,
}

/// Terminal outcome of the delivery step. No retry state is retained.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub sent: bool,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed for {url}: HTTP {status}")]
    FeedStatus { url: String, status: u16 },

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("missing configuration value: {name}")]
    MissingConfig { name: &'static str },

    #[error("all generation backends exhausted, last status: {last_status}")]
    BackendsExhausted { last_status: String },

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("mail message error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
