//! # Digest Formatter
//!
//! Renders an ordered run of feed items into the Markdown block that is posted to a room.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::types::Item;

pub const RULE: &str = "-------------------------------------------------------------------------------";

pub struct DigestFormatter;

impl DigestFormatter {
    /// One block per item, in the given order. No items, no text.
    pub fn render(items: &[Item]) -> String {
        if items.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = items.iter().map(Self::render_item).collect();
        format!("{RULE}\n\n{}\n\n{RULE}\n", blocks.join(&format!("\n\n{RULE}\n\n")))
    }

    fn render_item(item: &Item) -> String {
        let mut paragraphs = Vec::new();

        let body = html_to_text(&item.body);
        if !body.is_empty() {
            paragraphs.push(body);
        }

        let author = if item.author.profile_url.is_empty() {
            item.author.handle.clone()
        } else {
            format!("[{}]({})", item.author.handle, item.author.profile_url)
        };
        paragraphs.push(format!(
            "User: {} Created: {}  ↩️ {}  🔄 {}  ⭐️ {}",
            author,
            item.dedup_key(),
            item.counts.replies,
            item.counts.reblogs,
            item.counts.favorites
        ));

        for (i, media) in item.media.iter().enumerate() {
            paragraphs.push(format!("Media{}: {}", i, media.preview_url));
        }

        paragraphs.push(format!("[toot link]({})", item.permalink));
        paragraphs.join("\n\n")
    }
}

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"))
}

fn paragraph_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</p>\s*<p[^>]*>").expect("valid regex"))
}

fn tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

/// Status bodies arrive as HTML. Keeps the line structure, drops the markup.
pub fn html_to_text(html: &str) -> String {
    let text = line_breaks().replace_all(html, "\n");
    let text = paragraph_breaks().replace_all(&text, "\n\n");
    let text = tags().replace_all(&text, "");

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        // Last, so "&amp;lt;" stays "&lt;"
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
