//! Dataset help text: markdown to sanitized structured blocks.
//!
//! Help pages ship next to the datasets and are not trusted. Raw HTML is
//! dropped entirely and links are kept only for safe schemes, so a host can
//! render the blocks without further escaping. Single newlines are kept as
//! line breaks.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// A run of text with uniform styling
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Span {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpBlock {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph(Vec<Span>),
    ListItem {
        depth: usize,
        /// Item number for ordered lists
        number: Option<u64>,
        spans: Vec<Span>,
    },
    Quote(Vec<Span>),
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Rule,
}

impl HelpBlock {
    /// Plain text of the block, styling dropped
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            HelpBlock::Heading { spans, .. }
            | HelpBlock::Paragraph(spans)
            | HelpBlock::ListItem { spans, .. }
            | HelpBlock::Quote(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
            HelpBlock::CodeBlock { code, .. } => code.clone(),
            HelpBlock::Rule => String::new(),
        }
    }
}

/// Parse markdown help text into sanitized blocks.
#[must_use]
pub fn render_help(markdown: &str) -> Vec<HelpBlock> {
    let options = Options::ENABLE_GFM
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS;

    let mut renderer = HelpRenderer::default();
    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }
    renderer.flush();
    renderer.blocks
}

#[derive(Default)]
struct HelpRenderer {
    blocks: Vec<HelpBlock>,
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    links: Vec<Option<String>>,
    /// Next number per open list, `None` for bullet lists
    lists: Vec<Option<u64>>,
    /// (depth, number) per open list item
    items: Vec<(usize, Option<u64>)>,
    quotes: usize,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
    table_cell: usize,
}

impl HelpRenderer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.push_text(&text, true);
            }
            Event::SoftBreak | Event::HardBreak => self.push_text("\n", false),
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, false);
            }
            Event::Rule => {
                self.flush();
                self.blocks.push(HelpBlock::Rule);
            }
            // Raw HTML and footnote references are dropped
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                let number = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let number = *next;
                        *next += 1;
                        Some(number)
                    }
                    _ => None,
                };
                self.items.push((depth, number));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quotes += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Link { dest_url, .. } => self.links.push(safe_link(&dest_url)),
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.push_text(" | ", false);
                }
                self.table_cell += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                if let Some(level) = self.heading.take() {
                    let spans = std::mem::take(&mut self.spans);
                    self.blocks.push(HelpBlock::Heading { level, spans });
                }
            }
            TagEnd::Paragraph | TagEnd::TableHead | TagEnd::TableRow => {
                self.table_cell = 0;
                self.flush();
            }
            TagEnd::Item => {
                self.flush();
                self.items.pop();
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::BlockQuote(..) => {
                self.flush();
                self.quotes = self.quotes.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.blocks.push(HelpBlock::CodeBlock { language, code });
                }
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Link => {
                self.links.pop();
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        let span = Span {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            code,
            link: self.links.last().cloned().flatten(),
        };
        match self.spans.last_mut() {
            Some(last) if same_style(last, &span) => last.text.push_str(&span.text),
            _ => self.spans.push(span),
        }
    }

    /// Close the pending text run as whatever block encloses it.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let block = if let Some(&(depth, number)) = self.items.last() {
            HelpBlock::ListItem {
                depth,
                number,
                spans,
            }
        } else if self.quotes > 0 {
            HelpBlock::Quote(spans)
        } else {
            HelpBlock::Paragraph(spans)
        };
        self.blocks.push(block);
    }
}

fn same_style(a: &Span, b: &Span) -> bool {
    a.strong == b.strong && a.emphasis == b.emphasis && a.code == b.code && a.link == b.link
}

/// Keep web, mail and relative links; drop everything else (`javascript:`...)
fn safe_link(url: &str) -> Option<String> {
    let lower = url.trim().to_ascii_lowercase();
    let scheme = lower
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.contains('/'));
    match scheme {
        None | Some("http" | "https" | "mailto") => Some(url.trim().to_string()),
        Some(_) => None,
    }
}
