use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::binder::{Activation, LinkBinder, Trigger};
use crate::config::FormConfig;
use crate::effects::{
    card_matches, navbar_elevated, parallax_offset, ContactForm, FilterBar, FormState, NavMenu,
    Scroller, TypingEffect,
};
use crate::markdown;
use crate::modal::{Chrome, MediaElement, VideoModal};
use crate::portfolio::Portfolio;
use crate::video::MediaLauncher;

const COLOR_BG: Color = Color::Rgb(30, 30, 46);
const COLOR_PANEL_BG: Color = Color::Rgb(24, 24, 36);
const COLOR_PANEL_FOCUSED_BG: Color = Color::Rgb(49, 50, 68);
const COLOR_BORDER_IDLE: Color = Color::Rgb(49, 50, 68);
const COLOR_BORDER_FOCUSED: Color = Color::Rgb(137, 180, 250);
const COLOR_TEXT_PRIMARY: Color = Color::Rgb(205, 214, 244);
const COLOR_TEXT_SECONDARY: Color = Color::Rgb(166, 173, 200);
const COLOR_ACCENT: Color = Color::Rgb(137, 180, 250);
const COLOR_SUCCESS: Color = Color::Rgb(166, 227, 161);
const COLOR_ERROR: Color = Color::Rgb(243, 139, 168);
const COLOR_GOLD: Color = Color::Rgb(249, 226, 175);

const PAGE_MARGIN: u16 = 2;
const SCROLL_STEP: i32 = 1;
const PAGE_STEP: i32 = 10;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    About,
    Skills,
    Projects,
    Contact,
}

const SECTIONS: [Section; 5] = [
    Section::Home,
    Section::About,
    Section::Skills,
    Section::Projects,
    Section::Contact,
];

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }
}

enum AsyncResponse {
    FormSubmitted,
}

pub struct Options {
    pub status_message: String,
    pub portfolio: Portfolio,
    pub launcher: Option<Arc<dyn MediaLauncher>>,
    pub form: FormConfig,
    pub config_path: String,
    /// Portfolio YAML backing the page, reloadable at runtime. `None` means
    /// the built-in sample, which has nothing to reload.
    pub content_file: Option<PathBuf>,
}

pub struct Model {
    status_message: String,
    portfolio: Portfolio,
    renderer: markdown::Renderer,
    modal: VideoModal,
    binder: LinkBinder,
    nav: NavMenu,
    scroller: Scroller,
    typing: TypingEffect,
    form: ContactForm,
    form_cfg: FormConfig,
    form_focus: Option<usize>,
    filter: FilterBar,
    selected_project: usize,
    revealed: Vec<bool>,
    section_anchors: Vec<(Section, u16)>,
    modal_content_area: Option<Rect>,
    modal_close_area: Option<Rect>,
    config_path: String,
    content_file: Option<PathBuf>,
    needs_redraw: bool,
    response_tx: Sender<AsyncResponse>,
    response_rx: Receiver<AsyncResponse>,
}

impl Model {
    pub fn new(opts: Options) -> Self {
        let (response_tx, response_rx) = unbounded();
        let mut binder = LinkBinder::new();
        let triggers = opts.portfolio.triggers();
        binder.bind(&triggers);

        let filter = FilterBar::new(opts.portfolio.categories());
        let typing = TypingEffect::new(opts.portfolio.hero.title.clone(), Instant::now());
        let form = ContactForm::new(opts.form.message_ttl);
        let revealed = vec![false; opts.portfolio.projects.len()];

        Self {
            status_message: opts.status_message,
            modal: VideoModal::new(Some(Chrome::default()), opts.launcher),
            binder,
            nav: NavMenu::default(),
            scroller: Scroller::new(),
            typing,
            form,
            form_cfg: opts.form,
            form_focus: None,
            filter,
            selected_project: 0,
            revealed,
            section_anchors: Vec::new(),
            modal_content_area: None,
            modal_close_area: None,
            config_path: opts.config_path,
            content_file: opts.content_file,
            needs_redraw: true,
            response_tx,
            response_rx,
            renderer: markdown::Renderer::new(),
            portfolio: opts.portfolio,
        }
    }

    fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(DisableMouseCapture)?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();
        let tick_rate = Duration::from_millis(120);

        loop {
            if self.poll_async() {
                self.mark_dirty();
            }

            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }

            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(16));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match self.handle_key(key.code) {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(err) => {
                                self.status_message = format!("Error: {}", err);
                                self.mark_dirty();
                            }
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Err(err) = self.handle_mouse(mouse) {
                            self.status_message = format!("Error: {}", err);
                            self.mark_dirty();
                        }
                    }
                    Event::Resize(_, _) => self.mark_dirty(),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
                let now = Instant::now();
                let mut ticked = false;
                if self.typing.tick(now) {
                    ticked = true;
                }
                if self.scroller.tick() {
                    ticked = true;
                }
                if self.form.tick(now) {
                    ticked = true;
                }
                if self.form.is_submitting() {
                    ticked = true;
                }
                if ticked {
                    self.mark_dirty();
                }
            }
        }

        Ok(())
    }

    fn poll_async(&mut self) -> bool {
        let mut handled = false;
        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                AsyncResponse::FormSubmitted => {
                    self.form.finish(Instant::now());
                    if let Some(message) = self.form.message() {
                        self.status_message = message.to_string();
                    }
                }
            }
            handled = true;
        }
        handled
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.modal.is_open() {
            self.handle_modal_key(code);
            return Ok(false);
        }

        if self.nav.is_open() {
            self.handle_nav_key(code);
            return Ok(false);
        }

        if self.form_focus.is_some() {
            self.handle_form_key(code);
            return Ok(false);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.nav.toggle();
                self.status_message =
                    "Navigation open. j/k to choose a section, Enter to jump.".to_string();
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_page(SCROLL_STEP),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_page(-SCROLL_STEP),
            KeyCode::PageDown => self.scroll_page(PAGE_STEP),
            KeyCode::PageUp => self.scroll_page(-PAGE_STEP),
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroller.jump_to(0);
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroller.jump_to(u16::MAX);
            }
            KeyCode::Char(ch @ '1'..='5') => {
                let idx = (ch as u8 - b'1') as usize;
                self.jump_to_section(SECTIONS[idx]);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.filter.cycle(-1);
                self.filter_changed();
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('f') => {
                self.filter.cycle(1);
                self.filter_changed();
            }
            KeyCode::Char('J') | KeyCode::Tab => self.select_project(1),
            KeyCode::Char('K') | KeyCode::BackTab => self.select_project(-1),
            KeyCode::Enter => self.activate_selected_demo(),
            KeyCode::Char('r') => self.reload_portfolio(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_selected_link(),
            KeyCode::Char('i') | KeyCode::Char('c') => {
                self.form_focus = Some(0);
                self.jump_to_section(Section::Contact);
                self.status_message =
                    "Contact form: type to edit, Tab for the next field, Enter to send, Esc to leave."
                        .to_string();
            }
            _ => return Ok(false),
        }
        self.mark_dirty();
        Ok(false)
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.modal.close();
                self.status_message = "Video closed.".to_string();
            }
            // The close control has focus while the modal is open.
            KeyCode::Enter => {
                self.modal.close();
                self.status_message = "Video closed.".to_string();
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                self.modal.toggle_playback();
            }
            _ => {}
        }
        self.mark_dirty();
    }

    fn handle_nav_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.nav.close();
                self.status_message = "Navigation closed.".to_string();
            }
            KeyCode::Char('j') | KeyCode::Down => self.nav.shift(1, SECTIONS.len()),
            KeyCode::Char('k') | KeyCode::Up => self.nav.shift(-1, SECTIONS.len()),
            KeyCode::Enter => {
                let section = SECTIONS[self.nav.follow().min(SECTIONS.len() - 1)];
                self.jump_to_section(section);
            }
            _ => {}
        }
        self.mark_dirty();
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(index) = self.form_focus else {
            return;
        };
        let field_count = self.form.fields().len();
        match code {
            KeyCode::Esc => {
                self.form.blur(index);
                self.form_focus = None;
                self.status_message = "Left the contact form.".to_string();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.blur(index);
                self.form_focus = Some((index + 1) % field_count);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.blur(index);
                self.form_focus = Some((index + field_count - 1) % field_count);
            }
            KeyCode::Backspace => self.form.backspace(index),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => self.form.input(index, ch),
            _ => {}
        }
        self.mark_dirty();
    }

    fn submit_form(&mut self) {
        if self.form.is_submitting() {
            return;
        }
        if !self.form.submit(Instant::now()) {
            self.status_message = "Please fill in the required fields.".to_string();
            return;
        }
        self.status_message = "Sending message…".to_string();
        self.form_focus = None;
        // Simulated delivery: no network call, just the configured delay.
        let tx = self.response_tx.clone();
        let delay = self.form_cfg.submit_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = tx.send(AsyncResponse::FormSubmitted);
        });
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Result<()> {
        if self.modal.is_open() {
            if let MouseEventKind::Down(MouseButton::Left) = event.kind {
                let on_close = self
                    .modal_close_area
                    .is_some_and(|area| rect_contains(area, event.column, event.row));
                let on_content = self
                    .modal_content_area
                    .is_some_and(|area| rect_contains(area, event.column, event.row));
                // Close control or backdrop dismisses; the content area
                // does not.
                if on_close || !on_content {
                    self.modal.close();
                    self.status_message = "Video closed.".to_string();
                    self.mark_dirty();
                }
            }
            return Ok(());
        }

        match event.kind {
            MouseEventKind::ScrollDown => {
                self.scroll_page(SCROLL_STEP * 3);
                self.mark_dirty();
            }
            MouseEventKind::ScrollUp => {
                self.scroll_page(-SCROLL_STEP * 3);
                self.mark_dirty();
            }
            _ => {}
        }

        Ok(())
    }

    fn scroll_page(&mut self, delta: i32) {
        if self.modal.scroll_locked() {
            return;
        }
        self.scroller.scroll_by(delta);
    }

    fn jump_to_section(&mut self, section: Section) {
        if self.modal.scroll_locked() {
            return;
        }
        if let Some((_, anchor)) = self
            .section_anchors
            .iter()
            .find(|(candidate, _)| *candidate == section)
        {
            self.scroller.jump_to(*anchor);
            self.status_message = format!("Jumping to {}.", section.label());
        }
    }

    fn filter_changed(&mut self) {
        let visible = filter_indices(&self.portfolio, self.filter.active());
        if self.selected_project >= visible.len() {
            self.selected_project = visible.len().saturating_sub(1);
        }
        self.status_message = format!("Filter: {}.", self.filter.active());
    }

    fn select_project(&mut self, delta: i32) {
        let visible = filter_indices(&self.portfolio, self.filter.active());
        if visible.is_empty() {
            return;
        }
        let len = visible.len() as i32;
        let next = (self.selected_project as i32 + delta).rem_euclid(len);
        self.selected_project = next as usize;
        self.jump_to_section(Section::Projects);
    }

    fn selected_project_index(&self) -> Option<usize> {
        filter_indices(&self.portfolio, self.filter.active())
            .get(self.selected_project)
            .copied()
    }

    fn activate_selected_demo(&mut self) {
        let Some(index) = self.selected_project_index() else {
            return;
        };
        let project = &self.portfolio.projects[index];
        let trigger = Trigger {
            id: project.id.clone(),
            source: project.demo_video.clone(),
        };
        let title = project.title.clone();
        match self.binder.activate(&trigger) {
            Activation::Open(src) => {
                self.modal.open(&src, &title);
                self.status_message = match self.modal.take_notice() {
                    Some(notice) => notice,
                    None if self.modal.is_open() => format!("Previewing {}.", title),
                    None => self.status_message.clone(),
                };
            }
            Activation::MissingSource => {
                self.status_message = format!("{} has no demo video.", title);
            }
            Activation::NotBound => {}
        }
    }

    fn reload_portfolio(&mut self) {
        let Some(path) = self.content_file.clone() else {
            self.status_message = "No portfolio file configured to reload.".to_string();
            return;
        };
        match Portfolio::load(&path) {
            Ok(portfolio) => {
                let newly_bound = self.replace_portfolio(portfolio);
                self.status_message = format!(
                    "Reloaded {} ({} new demo links bound).",
                    path.display(),
                    newly_bound
                );
            }
            Err(err) => {
                self.status_message = format!("Could not reload {} ({err:#}).", path.display());
            }
        }
    }

    /// Swaps in new page content and re-runs the binder over the grown card
    /// set. Already-bound cards keep their single binding, so a reload never
    /// double-opens.
    fn replace_portfolio(&mut self, portfolio: Portfolio) -> usize {
        let triggers = portfolio.triggers();
        let newly_bound = self.binder.bind(&triggers);
        self.filter = FilterBar::new(portfolio.categories());
        self.revealed = vec![false; portfolio.projects.len()];
        if self.selected_project >= portfolio.projects.len() {
            self.selected_project = portfolio.projects.len().saturating_sub(1);
        }
        self.portfolio = portfolio;
        newly_bound
    }

    fn open_selected_link(&mut self) {
        let Some(index) = self.selected_project_index() else {
            return;
        };
        let Some(link) = self.portfolio.projects[index].links.first().cloned() else {
            self.status_message = "No external link on this project.".to_string();
            return;
        };
        match webbrowser::open(&link.url) {
            Ok(()) => self.status_message = format!("Opened {} in your browser.", link.label),
            Err(err) => self.status_message = format!("Could not open {}: {}", link.url, err),
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let full = frame.size();
        frame.render_widget(Block::default().style(Style::default().bg(COLOR_BG)), full);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(full);

        let status_text = if self.form.is_submitting() {
            format!("⠿ {}", self.status_message)
        } else {
            self.status_message.clone()
        };
        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .bg(COLOR_PANEL_FOCUSED_BG)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, layout[0]);

        self.draw_navbar(frame, layout[1]);
        self.draw_page(frame, layout[2]);

        let footer = Paragraph::new(format!(
            "q quit · n nav · 1-5 sections · j/k scroll · h/l filter · Tab select · Enter demo · o link · r reload · c contact | {}",
            self.config_path
        ))
        .style(
            Style::default()
                .fg(COLOR_TEXT_SECONDARY)
                .bg(COLOR_PANEL_BG)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center);
        frame.render_widget(footer, layout[3]);

        if self.nav.is_open() {
            self.draw_nav_menu(frame, layout[2]);
        }

        if self.modal.visible() {
            self.draw_modal(frame, full);
        } else {
            self.modal_content_area = None;
            self.modal_close_area = None;
        }
    }

    fn draw_navbar(&self, frame: &mut Frame<'_>, area: Rect) {
        let elevated = navbar_elevated(self.scroller.offset());
        let (bg, border) = if elevated {
            (COLOR_PANEL_FOCUSED_BG, COLOR_BORDER_FOCUSED)
        } else {
            (COLOR_PANEL_BG, COLOR_BORDER_IDLE)
        };

        let mut spans = vec![Span::styled(
            " folio ",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        )];
        for (idx, section) in SECTIONS.iter().enumerate() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {}", idx + 1, section.label()),
                Style::default().fg(COLOR_TEXT_SECONDARY),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(bg));
        let navbar = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(navbar, area);
    }

    fn draw_page(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let width = area.width.saturating_sub(PAGE_MARGIN * 2).max(20) as usize;
        let text = self.build_page(width, area.height);

        let total = text.lines.len() as u16;
        self.scroller.set_max(total.saturating_sub(area.height));

        let inner = Rect {
            x: area.x + PAGE_MARGIN,
            y: area.y,
            width: area.width.saturating_sub(PAGE_MARGIN * 2),
            height: area.height,
        };
        let page = Paragraph::new(text)
            .style(Style::default().fg(COLOR_TEXT_PRIMARY).bg(COLOR_BG))
            .scroll((self.scroller.offset(), 0));
        frame.render_widget(page, inner);
    }

    fn build_page(&mut self, width: usize, viewport: u16) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut anchors: Vec<(Section, u16)> = Vec::new();
        let now = Instant::now();
        let scroll = self.scroller.offset();

        // Hero, drifting slightly with the scroll position.
        anchors.push((Section::Home, lines.len() as u16));
        for _ in 0..parallax_offset(scroll) + 1 {
            lines.push(Line::default());
        }
        let mut hero_title = self.typing.visible_text().to_string();
        if self.typing.cursor_visible(now) {
            hero_title.push('▌');
        }
        lines.push(Line::from(Span::styled(
            hero_title,
            Style::default()
                .fg(COLOR_GOLD)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            self.portfolio.hero.subtitle.clone(),
            Style::default().fg(COLOR_TEXT_SECONDARY),
        )));
        lines.push(Line::default());

        // About.
        anchors.push((Section::About, lines.len() as u16));
        lines.push(section_heading("About"));
        for line in self.renderer.render(&self.portfolio.about).lines {
            lines.push(line);
        }
        lines.push(Line::default());

        // Skills.
        anchors.push((Section::Skills, lines.len() as u16));
        lines.push(section_heading("Skills"));
        for skill in &self.portfolio.skills {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", skill.name),
                    Style::default()
                        .fg(COLOR_ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("— {}", skill.blurb),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                ),
            ]));
        }
        lines.push(Line::default());

        // Projects, filtered.
        anchors.push((Section::Projects, lines.len() as u16));
        lines.push(section_heading("Projects"));
        lines.push(self.filter_line());
        lines.push(Line::default());

        let visible = filter_indices(&self.portfolio, self.filter.active());
        for (position, index) in visible.iter().enumerate() {
            let start = lines.len() as u16;
            let selected = position == self.selected_project;
            self.push_project_card(&mut lines, *index, selected, width);
            // A card is revealed the first time it scrolls into view.
            let end = lines.len() as u16;
            if start < scroll + viewport && end > scroll {
                self.revealed[*index] = true;
            }
        }
        if visible.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No projects match this filter.",
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )));
        }
        lines.push(Line::default());

        // Contact.
        anchors.push((Section::Contact, lines.len() as u16));
        lines.push(section_heading("Contact"));
        self.push_contact_form(&mut lines);

        self.section_anchors = anchors;
        Text::from(lines)
    }

    fn filter_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw("  ")];
        for (idx, option) in self.filter.options().iter().enumerate() {
            let style = if idx == self.filter.active_index() {
                Style::default()
                    .fg(COLOR_BG)
                    .bg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(COLOR_TEXT_SECONDARY)
            };
            spans.push(Span::styled(format!(" {} ", option), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn push_project_card(
        &self,
        lines: &mut Vec<Line<'static>>,
        index: usize,
        selected: bool,
        width: usize,
    ) {
        let project = &self.portfolio.projects[index];
        let dim = if self.revealed[index] {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let marker = if selected { "▍" } else { " " };
        let title_style = if selected {
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD)
        };

        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(COLOR_ACCENT)),
            Span::styled(project.title.clone(), title_style.patch(dim)),
            Span::styled(
                format!("  [{}]", project.categories.join(", ")),
                Style::default().fg(COLOR_TEXT_SECONDARY).patch(dim),
            ),
        ]));
        for wrapped in wrap(&project.description, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped),
                Style::default().fg(COLOR_TEXT_SECONDARY).patch(dim),
            )));
        }
        let demo = match project.demo_video.as_deref() {
            Some(src) => Line::from(vec![
                Span::styled("  ▶ Live demo: ", Style::default().fg(COLOR_SUCCESS).patch(dim)),
                Span::styled(src.to_string(), Style::default().fg(COLOR_TEXT_SECONDARY).patch(dim)),
            ]),
            None => Line::from(Span::styled(
                "  (no demo video)",
                Style::default().fg(COLOR_TEXT_SECONDARY).patch(dim),
            )),
        };
        lines.push(demo);
        for link in &project.links {
            lines.push(Line::from(Span::styled(
                format!("  ↗ {}: {}", link.label, link.url),
                Style::default().fg(COLOR_TEXT_SECONDARY).patch(dim),
            )));
        }
        lines.push(Line::default());
    }

    fn push_contact_form(&self, lines: &mut Vec<Line<'static>>) {
        let contact = &self.portfolio.contact;
        if !contact.email.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  ✉ {}", contact.email),
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )));
        }
        if !contact.location.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  ⌂ {}", contact.location),
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )));
        }
        for social in &contact.socials {
            lines.push(Line::from(Span::styled(
                format!("  ↗ {}: {}", social.label, social.url),
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )));
        }
        lines.push(Line::default());

        for (idx, field) in self.form.fields().iter().enumerate() {
            let focused = self.form_focus == Some(idx);
            let mut label_style = Style::default().fg(COLOR_TEXT_SECONDARY);
            if field.flagged {
                label_style = Style::default().fg(COLOR_ERROR);
            }
            let mut value = field.value.clone();
            if focused {
                value.push('▏');
            }
            let value_style = if focused {
                Style::default()
                    .fg(COLOR_TEXT_PRIMARY)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(COLOR_TEXT_PRIMARY)
            };
            let required = if field.required { "*" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}{} ", field.label, required), label_style),
                Span::styled(value, value_style),
            ]));
        }

        let submit = match self.form.state() {
            FormState::Submitting { .. } => Span::styled(
                "  [ Sending… ]",
                Style::default().fg(COLOR_TEXT_SECONDARY),
            ),
            _ => Span::styled(
                "  [ Send Message ]",
                Style::default()
                    .fg(COLOR_BG)
                    .bg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::default());
        lines.push(Line::from(submit));
        if let Some(message) = self.form.message() {
            lines.push(Line::from(Span::styled(
                format!("  ✔ {}", message),
                Style::default().fg(COLOR_SUCCESS),
            )));
        }
        lines.push(Line::default());
    }

    fn draw_nav_menu(&self, frame: &mut Frame<'_>, area: Rect) {
        let popup_area = centered_rect(30, 50, area);
        frame.render_widget(Clear, popup_area);

        let mut lines = Vec::new();
        for (idx, section) in SECTIONS.iter().enumerate() {
            let style = if idx == self.nav.selected() {
                Style::default()
                    .fg(COLOR_BG)
                    .bg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(COLOR_TEXT_PRIMARY)
            };
            lines.push(Line::from(Span::styled(
                format!("  {}  ", section.label()),
                style,
            )));
        }

        let block = Block::default()
            .title(" Navigation ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_FOCUSED))
            .style(Style::default().bg(COLOR_PANEL_BG));
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    fn draw_modal(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);
        self.modal_content_area = Some(popup_area);

        let title = self
            .modal
            .chrome()
            .map(|chrome| chrome.title.clone())
            .unwrap_or_default();
        let close_label = self
            .modal
            .chrome()
            .map(|chrome| chrome.close_label.clone())
            .unwrap_or_default();

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_FOCUSED))
            .style(Style::default().bg(COLOR_PANEL_BG));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        // Close control, top right, focused while the modal is open.
        let close_text = format!("[ ✕ {} ]", close_label);
        let close_width = close_text.as_str().width() as u16;
        let close_area = Rect {
            x: inner.x + inner.width.saturating_sub(close_width),
            y: inner.y,
            width: close_width.min(inner.width),
            height: 1,
        };
        let close_style = if self.modal.close_focused() {
            Style::default()
                .fg(COLOR_BG)
                .bg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_ERROR)
        };
        frame.render_widget(Paragraph::new(close_text).style(close_style), close_area);
        self.modal_close_area = Some(close_area);

        let mut lines = vec![Line::default()];
        match self.modal.element() {
            Some(MediaElement::EmbeddedFrame {
                src,
                video_id,
                allow_fullscreen,
                inline_playback,
            }) => {
                lines.push(Line::from(Span::styled(
                    "  Embedded player",
                    Style::default()
                        .fg(COLOR_ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  video id: {}", video_id),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", src),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                )));
                let mut allow = vec!["autoplay", "encrypted-media", "picture-in-picture"];
                if *inline_playback {
                    allow.push("inline");
                }
                lines.push(Line::from(Span::styled(
                    format!("  allow: {}", allow.join(" · ")),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                )));
                if *allow_fullscreen {
                    lines.push(Line::from(Span::styled(
                        "  fullscreen permitted",
                        Style::default().fg(COLOR_TEXT_SECONDARY),
                    )));
                }
            }
            Some(MediaElement::NativePlayer { src, mime, paused }) => {
                lines.push(Line::from(Span::styled(
                    "  Video player",
                    Style::default()
                        .fg(COLOR_ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", src),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  type: {}", mime),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                )));
                lines.push(Line::default());
                if *paused {
                    lines.push(Line::from(Span::styled(
                        "  ⏸ paused — press space to play",
                        Style::default().fg(COLOR_GOLD),
                    )));
                } else {
                    lines.push(Line::from(Span::styled(
                        "  ▶ playing in the external player",
                        Style::default().fg(COLOR_SUCCESS),
                    )));
                }
            }
            None => {}
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  Esc or click outside to close",
            Style::default().fg(COLOR_TEXT_SECONDARY),
        )));

        let content_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height.saturating_sub(1),
        };
        frame.render_widget(Paragraph::new(lines), content_area);
    }
}

fn section_heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("── {} ──", title),
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn filter_indices(portfolio: &Portfolio, filter: &str) -> Vec<usize> {
    portfolio
        .projects
        .iter()
        .enumerate()
        .filter(|(_, project)| card_matches(filter, &project.categories))
        .map(|(index, _)| index)
        .collect()
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(100 - percent_x - (100 - percent_x) / 2),
        ])
        .split(area);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(100 - percent_y - (100 - percent_y) / 2),
        ])
        .split(horizontal[1]);
    vertical[1]
}
