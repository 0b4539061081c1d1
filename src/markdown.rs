use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const COLOR_HEADING: Color = Color::Rgb(137, 180, 250);
const COLOR_CODE: Color = Color::Rgb(249, 226, 175);
const COLOR_LINK: Color = Color::Rgb(137, 220, 235);

/// Renders markdown section bodies into styled terminal text. Covers the
/// subset portfolio content actually uses: paragraphs, headings, lists,
/// emphasis, inline code, code blocks, block quotes, links, and rules.
#[derive(Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, input: &str) -> Text<'static> {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);

        let mut writer = Writer::default();
        for event in Parser::new_ext(input, opts) {
            writer.event(event);
        }
        writer.into_text()
    }
}

#[derive(Default)]
struct Writer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    bold: usize,
    italic: usize,
    list_depth: usize,
    ordered_index: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    link_target: Option<String>,
}

impl Writer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {line}"),
                            Style::default().fg(COLOR_CODE),
                        )));
                    }
                } else {
                    self.push_text(text.to_string());
                }
            }
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(COLOR_CODE),
                ));
            }
            Event::SoftBreak => self.push_text(" ".to_string()),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from("―".repeat(20)));
                self.lines.push(Line::default());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { .. } => {
                self.bold += 1;
            }
            Tag::List(start) => {
                self.list_depth += 1;
                self.ordered_index.push(start);
            }
            Tag::Item => {
                let marker = match self.ordered_index.last_mut() {
                    Some(Some(index)) => {
                        let marker = format!("{index}. ");
                        *index += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.spans.push(Span::raw(format!("{indent}{marker}")));
            }
            Tag::BlockQuote => self.quote_depth += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Tag::Link { dest_url, .. } => {
                self.link_target = Some(dest_url.to_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                self.lines.push(Line::default());
            }
            TagEnd::Heading(_) => {
                self.bold = self.bold.saturating_sub(1);
                if let Some(line) = self.take_line() {
                    let styled: Vec<Span<'static>> = line
                        .spans
                        .into_iter()
                        .map(|span| {
                            Span::styled(
                                span.content,
                                Style::default()
                                    .fg(COLOR_HEADING)
                                    .add_modifier(Modifier::BOLD),
                            )
                        })
                        .collect();
                    self.lines.push(Line::from(styled));
                }
                self.lines.push(Line::default());
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.ordered_index.pop();
                if self.list_depth == 0 {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::BlockQuote => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.lines.push(Line::default());
            }
            TagEnd::Link => {
                if let Some(target) = self.link_target.take() {
                    self.spans.push(Span::styled(
                        format!(" ({target})"),
                        Style::default().fg(COLOR_LINK),
                    ));
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: String) {
        let mut style = Style::default();
        if self.bold > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.link_target.is_some() {
            style = style.fg(COLOR_LINK).add_modifier(Modifier::UNDERLINED);
        }
        self.spans.push(Span::styled(text, style));
    }

    fn take_line(&mut self) -> Option<Line<'static>> {
        if self.spans.is_empty() {
            return None;
        }
        let mut spans = std::mem::take(&mut self.spans);
        if self.quote_depth > 0 {
            let prefix = "▎ ".repeat(self.quote_depth);
            spans.insert(0, Span::raw(prefix));
        }
        Some(Line::from(spans))
    }

    fn flush_line(&mut self) {
        if let Some(line) = self.take_line() {
            self.lines.push(line);
        }
    }

    fn into_text(mut self) -> Text<'static> {
        self.flush_line();
        while matches!(self.lines.last(), Some(line) if line.spans.is_empty()) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let text = Renderer::new().render("one\n\ntwo");
        assert_eq!(plain(&text), vec!["one", "", "two"]);
    }

    #[test]
    fn bullets_get_markers() {
        let text = Renderer::new().render("- first\n- second");
        let lines = plain(&text);
        assert_eq!(lines[0], "• first");
        assert_eq!(lines[1], "• second");
    }

    #[test]
    fn ordered_lists_count_up() {
        let text = Renderer::new().render("1. a\n2. b");
        let lines = plain(&text);
        assert_eq!(lines[0], "1. a");
        assert_eq!(lines[1], "2. b");
    }

    #[test]
    fn links_append_their_target() {
        let text = Renderer::new().render("[site](https://example.com)");
        assert_eq!(plain(&text)[0], "site (https://example.com)");
    }
}
