use crate::fetcher::{FetchConfig, Fetcher};
use crate::types::{Aggregation, Digest, Entry, PipelineError, Result, Source, SourceOutcome};
use feed_rs::parser;
use tracing::{error, info, warn};

/// Bounded prefix of each entry summary kept in the digest, to control
/// downstream prompt size.
pub const SUMMARY_PREFIX_CHARS: usize = 200;

const MISSING_TITLE: &str = "No Title";
const MISSING_SUMMARY: &str = "No Summary";

/// Collects recent entries from every configured source and renders them
/// into a single digest. Source failures reduce coverage, never abort.
pub struct Aggregator {
    fetcher: Fetcher,
}

impl Aggregator {
    pub fn new(fetch_config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
        })
    }

    /// Fetches each source independently and folds the kept entries into a
    /// digest. Returns `digest: None` when zero entries were kept across all
    /// sources, so the caller can short-circuit before generation.
    pub async fn fetch_news(&self, sources: &[Source]) -> Aggregation {
        let mut lines = Vec::new();
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            let url = source.url.trim().to_string();
            match self.collect_source(source).await {
                Ok(entries) if entries.is_empty() => {
                    warn!("no entries found: {}", url);
                    outcomes.push(SourceOutcome::Empty { url });
                }
                Ok(entries) => {
                    info!("successfully fetched {} ({} entries)", url, entries.len());
                    lines.extend(entries.iter().map(render_entry));
                    outcomes.push(SourceOutcome::Fetched {
                        url,
                        kept: entries.len(),
                    });
                }
                Err(e) => {
                    error!("error fetching {}: {}", url, e);
                    outcomes.push(SourceOutcome::Failed {
                        url,
                        error: e.to_string(),
                    });
                }
            }
        }

        let digest = if lines.is_empty() {
            None
        } else {
            Some(Digest {
                entry_count: lines.len(),
                text: lines.join("\n"),
            })
        };

        Aggregation {
            digest,
            sources: outcomes,
        }
    }

    async fn collect_source(&self, source: &Source) -> Result<Vec<Entry>> {
        let body = self.fetcher.fetch(source.url.trim()).await?;
        let feed = parser::parse(body.as_bytes())
            .map_err(|e| PipelineError::Parse(format!("{}: {}", source.url, e)))?;

        Ok(feed
            .entries
            .into_iter()
            .take(source.max_entries)
            .map(to_entry)
            .collect())
    }
}

fn to_entry(entry: feed_rs::model::Entry) -> Entry {
    let title = entry
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| MISSING_TITLE.to_string());

    let summary = entry
        .summary
        .map(|s| s.content)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| MISSING_SUMMARY.to_string());

    Entry { title, summary }
}

/// Renders one kept entry as a digest bullet line.
pub fn render_entry(entry: &Entry) -> String {
    format!(
        "- {}: {}...",
        entry.title,
        truncate_chars(&entry.summary, SUMMARY_PREFIX_CHARS)
    )
}

fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
