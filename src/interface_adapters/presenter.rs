// Rendering for generated and rewritten emails.
//
// Body and outro come from a remote model and are untrusted: they are escaped
// and line breaks are inserted by us, never interpreted from the text.

use crate::domain::GeneratedEmail;

/// Plain text placed on the clipboard: subject, body and outro separated by
/// blank lines.
pub fn clipboard_text(email: &GeneratedEmail) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        email.subject,
        email.body.trim(),
        email.outro.trim()
    )
}

/// Markup-safe rendering with explicit `<br>` line breaks.
pub fn render_html(email: &GeneratedEmail) -> String {
    format!(
        "<h2>{}</h2>\n<p>{}</p>\n<p>{}</p>",
        html_escape(&email.subject),
        with_line_breaks(&email.body),
        with_line_breaks(&email.outro)
    )
}

/// Terminal rendering with a subject header.
pub fn render_text(email: &GeneratedEmail) -> String {
    let mut out = String::new();
    out.push_str("Subject: ");
    out.push_str(email.subject.trim());
    out.push_str("\n\n");
    for line in email.body.trim().lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    for line in email.outro.trim().lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn with_line_breaks(text: &str) -> String {
    text.lines()
        .map(html_escape)
        .collect::<Vec<_>>()
        .join("<br>")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
