//! Configuration types shared across the workspace

mod environment;
mod mail;

pub use environment::Environment;
pub use mail::{MailConfig, MailTransport, SmtpSettings, MailgunSettings};
