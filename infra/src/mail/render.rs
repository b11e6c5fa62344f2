//! Auth-code mail rendering
//!
//! Subject and body are computed here, as separate steps, before any
//! transport gets involved. Template and layout identifiers select the
//! wording; unknown identifiers fall back to the built-in default.

use mf_core::services::provider::AuthCodeEmail;

/// The built-in template/layout identifier
pub const DEFAULT_TEMPLATE: &str = "MfaEmail";

/// A fully rendered auth-code message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Compute the subject line for a template
pub fn subject_for(template: &str) -> String {
    match template {
        DEFAULT_TEMPLATE => "Your one-time login code".to_string(),
        _ => {
            tracing::debug!(
                template = template,
                "Unknown mail template, using built-in subject"
            );
            "Your one-time login code".to_string()
        }
    }
}

/// Render the full auth-code message
pub fn render_auth_code_mail(mail: &AuthCodeEmail) -> RenderedMail {
    let subject = subject_for(&mail.template);

    let text_body = format!(
        "Hi,\n\n\
         use this one-time code to finish signing in:\n\n\
         \t{code}\n\n\
         The code was requested for {to}. If that wasn't you, you can\n\
         ignore this message; the code expires with your login attempt.\n",
        code = mail.code,
        to = mail.to,
    );

    let html_body = format!(
        "<div class=\"{layout}\">\
         <p>Hi,</p>\
         <p>use this one-time code to finish signing in:</p>\
         <p style=\"font-size:1.5em;letter-spacing:0.2em\"><strong>{code}</strong></p>\
         <p>The code was requested for {to}. If that wasn't you, you can \
         ignore this message; the code expires with your login attempt.</p>\
         </div>",
        layout = mail.layout,
        code = mail.code,
        to = mail.to,
    );

    RenderedMail {
        subject,
        text_body,
        html_body,
    }
}
