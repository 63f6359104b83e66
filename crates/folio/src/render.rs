use std::path::Path;

use pulldown_cmark::{html, Options, Parser};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html;charset=utf-8";

/// How a document is presented, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Unknown,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Self {
        match extension(name) {
            Some("txt") => Self::PlainText,
            Some("md") => Self::Markdown,
            _ => Self::Unknown,
        }
    }
}

/// A rendered document body and the content type to serve it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub mime_type: String,
    pub body: Vec<u8>,
}

pub fn render(name: &str, content: Vec<u8>) -> Rendered {
    match DocumentKind::from_name(name) {
        DocumentKind::PlainText => Rendered {
            mime_type: TEXT_PLAIN.to_string(),
            body: content,
        },
        DocumentKind::Markdown => {
            let source = String::from_utf8_lossy(&content);
            Rendered {
                mime_type: TEXT_HTML.to_string(),
                body: markdown_to_html(&source).into_bytes(),
            }
        }
        // Raw bytes with whatever type the name suggests, octet-stream when
        // nothing fits (including extension-less names).
        DocumentKind::Unknown => Rendered {
            mime_type: mime_guess::from_path(name)
                .first_or_octet_stream()
                .to_string(),
            body: content,
        },
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// True when a dot follows the name's leading dots, so `notes.` counts and
/// `.profile` does not.
pub fn has_extension(name: &str) -> bool {
    name.trim_start_matches('.').contains('.')
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}
