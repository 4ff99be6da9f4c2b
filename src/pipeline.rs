use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::fetcher::FetchConfig;
use crate::publisher::{Publisher, SmtpGateway};
use crate::summarizer::Summarizer;
use crate::types::{Result, Source};
use tracing::{error, info};

/// Terminal outcome of one pipeline pass. Partial source failure with one
/// successful backend still ends in `Published`.
#[derive(Debug)]
pub enum RunOutcome {
    Published { detail: String },
    NothingToPublish,
    GenerationFailed { reason: String },
    DeliveryFailed { reason: String },
}

impl RunOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, RunOutcome::Published { .. })
    }
}

/// Wires the production components together and runs a single pass.
pub async fn run_once(config: &Config) -> Result<RunOutcome> {
    let aggregator = Aggregator::new(&FetchConfig::default())?;
    let summarizer = Summarizer::new(
        config.inference_base_url.clone(),
        config.api_token.clone(),
        config.models.clone(),
    )?;
    let gateway = SmtpGateway::new(
        config.smtp_host.clone(),
        config.sender_email.clone(),
        config.sender_password.clone(),
        config.post_email.clone(),
    );
    let publisher = Publisher::new(Box::new(gateway));

    Ok(run_pipeline(&aggregator, &summarizer, &publisher, &config.sources).await)
}

/// Aggregator -> Summarizer -> Publisher, strictly sequential, one attempt
/// per stage. Each stage's failure is this pass's terminal outcome.
pub async fn run_pipeline(
    aggregator: &Aggregator,
    summarizer: &Summarizer,
    publisher: &Publisher,
    sources: &[Source],
) -> RunOutcome {
    info!("[1/3] fetching news from {} sources", sources.len());
    let aggregation = aggregator.fetch_news(sources).await;

    let Some(digest) = aggregation.digest else {
        info!("no news found to summarize");
        return RunOutcome::NothingToPublish;
    };

    info!("[2/3] generating summary from {} news items", digest.entry_count);
    let article = match summarizer.generate_summary(&digest).await {
        Ok(article) => article,
        Err(e) => {
            error!("{}", e);
            return RunOutcome::GenerationFailed {
                reason: e.to_string(),
            };
        }
    };

    info!("[3/3] publishing article generated by {}", article.model);
    let report = publisher.publish(&article);
    if report.sent {
        RunOutcome::Published {
            detail: report.detail,
        }
    } else {
        RunOutcome::DeliveryFailed {
            reason: report.detail,
        }
    }
}
