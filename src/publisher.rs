use crate::types::{GeneratedArticle, PublishReport, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info};

/// Placeholder title used when generated text has no newline to split on.
/// The whole text becomes the body; it is never duplicated into the title.
const UNTITLED: &str = "Untitled";

/// Delivery channel for the publish-by-email gateway.
pub trait PostGateway {
    fn deliver(&self, subject: &str, body: &str) -> Result<()>;
}

/// SMTP submission: STARTTLS upgrade, credential login, send. The session
/// is closed when the transport is dropped.
pub struct SmtpGateway {
    host: String,
    sender: String,
    password: String,
    recipient: String,
}

impl SmtpGateway {
    pub fn new(host: String, sender: String, password: String, recipient: String) -> Self {
        Self {
            host,
            sender,
            password,
            recipient,
        }
    }
}

impl PostGateway for SmtpGateway {
    fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.sender.parse()?)
            .to(self.recipient.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let mailer = SmtpTransport::starttls_relay(&self.host)?
            .credentials(Credentials::new(
                self.sender.clone(),
                self.password.clone(),
            ))
            .build();

        mailer.send(&message)?;
        Ok(())
    }
}

/// Splits generated text into a title/body pair and hands it to the
/// delivery channel. Exactly one delivery attempt per run.
pub struct Publisher {
    gateway: Box<dyn PostGateway>,
}

impl Publisher {
    pub fn new(gateway: Box<dyn PostGateway>) -> Self {
        Self { gateway }
    }

    pub fn publish(&self, article: &GeneratedArticle) -> PublishReport {
        let (title, body) = split_article(&article.raw);
        info!("sending post titled: {}", title);

        match self.gateway.deliver(&title, &body) {
            Ok(()) => {
                info!("email sent successfully, post should appear on the blog");
                PublishReport {
                    sent: true,
                    detail: format!("published \"{}\"", title),
                }
            }
            Err(e) => {
                error!("failed to send email: {}", e);
                PublishReport {
                    sent: false,
                    detail: format!("delivery failed: {}", e),
                }
            }
        }
    }
}

/// Splits on the first newline: the first segment becomes the title with
/// leading heading markers stripped, the exact remainder becomes the body.
/// Text without a newline becomes the body under a placeholder title.
pub fn split_article(raw: &str) -> (String, String) {
    match raw.split_once('\n') {
        Some((first, rest)) => {
            let title = clean_title(first);
            if title.is_empty() {
                (UNTITLED.to_string(), rest.to_string())
            } else {
                (title, rest.to_string())
            }
        }
        None => (UNTITLED.to_string(), raw.trim().to_string()),
    }
}

fn clean_title(line: &str) -> String {
    line.trim().trim_start_matches('#').trim().to_string()
}
