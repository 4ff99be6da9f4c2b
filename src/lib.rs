pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod publisher;
pub mod summarizer;
pub mod types;

pub use aggregator::Aggregator;
pub use config::Config;
pub use fetcher::{FetchConfig, Fetcher};
pub use pipeline::{run_once, run_pipeline, RunOutcome};
pub use publisher::{PostGateway, Publisher, SmtpGateway};
pub use summarizer::Summarizer;
pub use types::*;
