//! Markdown → ratatui `Text` renderer.
//!
//! Converts `pulldown_cmark` events into styled `Line`/`Span` values.
//! Every element kind takes its style from a [`RenderConfig`], so the
//! mapping from markdown to terminal styling lives in one place.

use std::sync::LazyLock;

use log::debug;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Element kind → style. Inline styles (`emphasis`, `strong`, ...) are
/// patched on top of the enclosing block style.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub text: Style,
    pub h1: Style,
    pub h2: Style,
    /// H3 through H6.
    pub h3: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub inline_code: Style,
    /// Fenced/indented code without a known syntax.
    pub code_block: Style,
    /// `╭──` / `│` / `╰──` frame around code blocks.
    pub code_border: Style,
    pub link: Style,
    pub blockquote: Style,
    pub blockquote_bar: Style,
    pub list_marker: Style,
    pub rule: Style,
    /// Highlight fenced code with a known language via syntect.
    pub highlight_code: bool,
}

impl RenderConfig {
    /// Default scheme: body text in `base_fg`, headings bold, muted chrome.
    pub fn with_base(base_fg: Color) -> Self {
        let base = Style::default().fg(base_fg);
        let chrome = Style::default().fg(Color::DarkGray);
        Self {
            text: base,
            h1: base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: base.add_modifier(Modifier::BOLD),
            h3: base.add_modifier(Modifier::BOLD | Modifier::ITALIC),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            inline_code: Style::default().fg(Color::White).bg(Color::DarkGray),
            code_block: Style::default().fg(Color::White),
            code_border: chrome,
            link: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            blockquote: base.add_modifier(Modifier::DIM | Modifier::ITALIC),
            blockquote_bar: chrome,
            list_marker: chrome,
            rule: chrome,
            highlight_code: true,
        }
    }

    fn heading(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.h1,
            HeadingLevel::H2 => self.h2,
            _ => self.h3,
        }
    }
}

/// Parse markdown content into styled `Text`.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, config: &RenderConfig) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(config);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer<'c> {
    config: &'c RenderConfig,
    text: Text<'static>,
    /// Inline style stack. Styles compose via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote and code block bars).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    /// Inside a code block that is not being highlighted.
    in_plain_code: bool,
    /// Appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl<'c> Writer<'c> {
    fn new(config: &'c RenderConfig) -> Self {
        Self {
            config,
            text: Text::default(),
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.config.text)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => {
                self.push_span(Span::styled(c.to_string(), self.config.inline_code));
            }
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled("─".repeat(40), self.config.rule)));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::raw(marker));
            }
            // Raw HTML, footnotes, math
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = self.config.heading(level);
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(level as usize)),
                    hs,
                )));
                self.styles.push(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", self.config.blockquote_bar));
                self.styles.push(self.config.blockquote);
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                let marker = match self.list_indices.last_mut() {
                    Some(Some(n)) => {
                        let s = format!("{indent}{n}. ");
                        *n += 1;
                        s
                    }
                    _ => format!("{indent}- "),
                };
                self.push_span(Span::styled(marker, self.config.list_marker));
            }
            Tag::Emphasis => self.push_style(self.config.emphasis),
            Tag::Strong => self.push_style(self.config.strong),
            Tag::Strikethrough => self.push_style(self.config.strikethrough),
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(self.config.link);
            }
            // Tables, images, definition lists
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.as_ref(),
            CodeBlockKind::Indented => "",
        };

        let bs = self.config.code_border;
        let top = if lang.is_empty() {
            Line::from(Span::styled("╭──", bs))
        } else {
            Line::from(vec![
                Span::styled("╭── ", bs),
                Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", bs),
            ])
        };
        self.push_line(top);
        self.line_prefixes.push(Span::styled("│ ", bs));

        if self.config.highlight_code
            && !lang.is_empty()
            && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang)
            && let Some(theme) = THEME_SET.themes.get(CODE_THEME)
        {
            self.highlighter = Some(HighlightLines::new(syntax, theme));
        }
        if self.highlighter.is_none() {
            self.in_plain_code = true;
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled("╰──", self.config.code_border)));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(url, self.config.link));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");

        // Take the highlighter out: highlight_line and push_line both borrow
        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                match hl.highlight_line(line, &SYNTAX_SET) {
                    Ok(ranges) => {
                        let spans: Vec<Span<'static>> = ranges
                            .into_iter()
                            .filter_map(|(hl_style, frag)| {
                                let content = frag.trim_end_matches('\n').to_string();
                                if content.is_empty() {
                                    return None;
                                }
                                let fg = Color::Rgb(
                                    hl_style.foreground.r,
                                    hl_style.foreground.g,
                                    hl_style.foreground.b,
                                );
                                Some(Span::styled(content, Style::default().fg(fg)))
                            })
                            .collect();
                        self.push_line(Line::from(spans));
                    }
                    Err(e) => {
                        debug!("Highlighting failed, falling back to plain: {e}");
                        self.push_line(Line::from(Span::styled(
                            line.trim_end_matches('\n').to_owned(),
                            self.config.code_block,
                        )));
                    }
                }
            }
            self.highlighter = Some(hl);
            return;
        }

        if self.in_plain_code {
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(
                    line.to_owned(),
                    self.config.code_block,
                )));
            }
            return;
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}

/// Flatten rendered text to plain strings, one per line.
#[cfg(test)]
pub(crate) fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}
