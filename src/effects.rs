use std::time::{Duration, Instant};

/// Scroll depth (in rows) past which the navbar switches to its elevated
/// style.
pub const NAVBAR_ELEVATION_THRESHOLD: u16 = 4;

const TYPE_START_DELAY: Duration = Duration::from_millis(1000);
const TYPE_CHAR_INTERVAL: Duration = Duration::from_millis(100);
const TYPE_CURSOR_LINGER: Duration = Duration::from_millis(1000);

pub const FORM_SUCCESS_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

pub fn navbar_elevated(scroll_offset: u16) -> bool {
    scroll_offset > NAVBAR_ELEVATION_THRESHOLD
}

/// Gentle parallax: the hero drifts at a twentieth of the scroll speed.
pub fn parallax_offset(scroll_offset: u16) -> u16 {
    scroll_offset / 20
}

/// Scroll position with eased movement toward an anchor. `tick` advances a
/// quarter of the remaining distance per event-loop tick, so section jumps
/// glide instead of snapping.
#[derive(Debug, Default)]
pub struct Scroller {
    offset: u16,
    target: Option<u16>,
    max: u16,
}

impl Scroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn set_max(&mut self, max: u16) {
        self.max = max;
        if self.offset > max {
            self.offset = max;
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.target = None;
        let next = i64::from(self.offset) + i64::from(delta);
        self.offset = next.clamp(0, i64::from(self.max)) as u16;
    }

    pub fn jump_to(&mut self, anchor: u16) {
        self.target = Some(anchor.min(self.max));
    }

    /// One easing step. Returns true when the offset moved.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if target == self.offset {
            self.target = None;
            return false;
        }
        let remaining = i32::from(target) - i32::from(self.offset);
        let step = (remaining / 4).abs().max(1) * remaining.signum();
        self.offset = (i32::from(self.offset) + step) as u16;
        if self.offset == target {
            self.target = None;
        }
        true
    }
}

/// Collapsible navigation menu. Following a link always closes it, the way
/// the mobile menu folds after a section jump.
#[derive(Debug, Default)]
pub struct NavMenu {
    open: bool,
    selected: usize,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn shift(&mut self, delta: i32, len: usize) {
        if len == 0 {
            return;
        }
        let next = (self.selected as i32 + delta).rem_euclid(len as i32);
        self.selected = next as usize;
    }

    /// Commits the highlighted link and folds the menu.
    pub fn follow(&mut self) -> usize {
        self.open = false;
        self.selected
    }
}

/// Hero title revealed one character per interval after an initial delay.
/// The cursor marker lingers briefly once the text is complete, then drops.
#[derive(Debug)]
pub struct TypingEffect {
    full: String,
    revealed: usize,
    started: Instant,
}

impl TypingEffect {
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            full: text.into(),
            revealed: 0,
            started: now,
        }
    }

    fn char_count(&self) -> usize {
        self.full.chars().count()
    }

    fn finished_at(&self) -> Instant {
        self.started + TYPE_START_DELAY + TYPE_CHAR_INTERVAL * self.char_count() as u32
    }

    /// Advances the reveal. Returns true when more text became visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        let Some(typing) = elapsed.checked_sub(TYPE_START_DELAY) else {
            return false;
        };
        let target = ((typing.as_millis() / TYPE_CHAR_INTERVAL.as_millis()) as usize)
            .min(self.char_count());
        if target > self.revealed {
            self.revealed = target;
            return true;
        }
        false
    }

    pub fn finished(&self) -> bool {
        self.revealed >= self.char_count()
    }

    pub fn visible_text(&self) -> &str {
        match self.full.char_indices().nth(self.revealed) {
            Some((idx, _)) => &self.full[..idx],
            None => &self.full,
        }
    }

    /// The typing cursor stays for a moment after completion, then goes.
    pub fn cursor_visible(&self, now: Instant) -> bool {
        if !self.finished() {
            return true;
        }
        now < self.finished_at() + TYPE_CURSOR_LINGER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting { since: Instant },
    Sent { since: Instant },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    /// Set when the field loses focus while empty-but-required; cleared as
    /// soon as the user types again.
    pub flagged: bool,
}

impl FormField {
    fn new(label: &'static str, required: bool) -> Self {
        Self {
            label,
            value: String::new(),
            required,
            flagged: false,
        }
    }

    fn missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

/// Contact form with a simulated submission: no network call is ever made.
/// Submit flips to Submitting, completion (delivered by the caller after the
/// configured delay) flips to Sent and resets the fields, and the
/// confirmation hides itself after its display TTL.
#[derive(Debug)]
pub struct ContactForm {
    fields: Vec<FormField>,
    state: FormState,
    message_ttl: Duration,
}

impl ContactForm {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            fields: vec![
                FormField::new("Name", true),
                FormField::new("Email", true),
                FormField::new("Subject", false),
                FormField::new("Message", true),
            ],
            state: FormState::Idle,
            message_ttl,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting { .. })
    }

    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            FormState::Sent { .. } => Some(FORM_SUCCESS_MESSAGE),
            _ => None,
        }
    }

    pub fn input(&mut self, index: usize, ch: char) {
        if self.is_submitting() {
            return;
        }
        if let Some(field) = self.fields.get_mut(index) {
            field.value.push(ch);
            field.flagged = false;
        }
    }

    pub fn backspace(&mut self, index: usize) {
        if self.is_submitting() {
            return;
        }
        if let Some(field) = self.fields.get_mut(index) {
            field.value.pop();
        }
    }

    /// Leaving a field marks it when required input is missing.
    pub fn blur(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.flagged = field.missing();
        }
    }

    /// Starts the simulated submission. Returns false (leaving the state
    /// unchanged) when required fields are missing or a submission is
    /// already underway.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.is_submitting() {
            return false;
        }
        let mut valid = true;
        for field in &mut self.fields {
            field.flagged = field.missing();
            valid &= !field.flagged;
        }
        if !valid {
            return false;
        }
        self.state = FormState::Submitting { since: now };
        true
    }

    /// Completion of the simulated delivery: show the confirmation and reset
    /// the fields.
    pub fn finish(&mut self, now: Instant) {
        if !self.is_submitting() {
            return;
        }
        for field in &mut self.fields {
            field.value.clear();
            field.flagged = false;
        }
        self.state = FormState::Sent { since: now };
    }

    /// Hides the confirmation once its display window has passed. Returns
    /// true when the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let FormState::Sent { since } = self.state {
            if now.saturating_duration_since(since) >= self.message_ttl {
                self.state = FormState::Idle;
                return true;
            }
        }
        false
    }
}

/// Project filter bar: `all` plus one button per known category, exactly one
/// active at a time.
#[derive(Debug)]
pub struct FilterBar {
    options: Vec<String>,
    active: usize,
}

impl FilterBar {
    pub fn new(categories: impl IntoIterator<Item = String>) -> Self {
        let mut options = vec!["all".to_string()];
        for category in categories {
            let category = category.trim().to_lowercase();
            if !category.is_empty() && !options.contains(&category) {
                options.push(category);
            }
        }
        Self { options, active: 0 }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn active(&self) -> &str {
        &self.options[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn cycle(&mut self, delta: i32) {
        let len = self.options.len() as i32;
        self.active = (self.active as i32 + delta).rem_euclid(len) as usize;
    }
}

/// A card stays visible under `all`, or when any of its categories contains
/// the filter value.
pub fn card_matches(filter: &str, categories: &[String]) -> bool {
    filter == "all"
        || categories
            .iter()
            .any(|category| category.to_lowercase().contains(filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_elevates_past_threshold() {
        assert!(!navbar_elevated(0));
        assert!(!navbar_elevated(NAVBAR_ELEVATION_THRESHOLD));
        assert!(navbar_elevated(NAVBAR_ELEVATION_THRESHOLD + 1));
    }

    #[test]
    fn parallax_is_a_fraction_of_scroll() {
        assert_eq!(parallax_offset(0), 0);
        assert_eq!(parallax_offset(19), 0);
        assert_eq!(parallax_offset(40), 2);
    }

    #[test]
    fn scroller_eases_toward_anchor() {
        let mut scroller = Scroller::new();
        scroller.set_max(100);
        scroller.jump_to(40);
        let mut steps = 0;
        while scroller.tick() {
            steps += 1;
            assert!(steps < 100, "easing must terminate");
        }
        assert_eq!(scroller.offset(), 40);
        assert!(steps > 1, "jump should take more than one step");
    }

    #[test]
    fn manual_scroll_cancels_pending_jump() {
        let mut scroller = Scroller::new();
        scroller.set_max(100);
        scroller.jump_to(80);
        scroller.scroll_by(3);
        assert!(!scroller.tick());
        assert_eq!(scroller.offset(), 3);
    }

    #[test]
    fn nav_menu_folds_when_link_followed() {
        let mut menu = NavMenu::default();
        menu.toggle();
        assert!(menu.is_open());
        menu.shift(2, 5);
        assert_eq!(menu.follow(), 2);
        assert!(!menu.is_open());
    }

    #[test]
    fn typing_reveals_after_delay_then_drops_cursor() {
        let start = Instant::now();
        let mut typing = TypingEffect::new("Hi!", start);

        assert!(!typing.tick(start + Duration::from_millis(500)));
        assert_eq!(typing.visible_text(), "");

        assert!(typing.tick(start + Duration::from_millis(1200)));
        assert_eq!(typing.visible_text(), "Hi");
        assert!(typing.cursor_visible(start + Duration::from_millis(1200)));

        assert!(typing.tick(start + Duration::from_millis(1300)));
        assert_eq!(typing.visible_text(), "Hi!");
        assert!(typing.finished());

        assert!(typing.cursor_visible(start + Duration::from_millis(1400)));
        assert!(!typing.cursor_visible(start + Duration::from_secs(10)));
    }

    #[test]
    fn form_submit_validates_required_fields() {
        let now = Instant::now();
        let mut form = ContactForm::new(Duration::from_secs(5));
        assert!(!form.submit(now));
        assert!(form.fields()[0].flagged);
        assert!(!form.fields()[2].flagged, "subject is optional");

        for ch in "Ada".chars() {
            form.input(0, ch);
        }
        assert!(!form.fields()[0].flagged, "typing clears the mark");
    }

    #[test]
    fn form_runs_through_the_submission_states() {
        let now = Instant::now();
        let mut form = ContactForm::new(Duration::from_secs(5));
        for (idx, text) in [(0, "Ada"), (1, "ada@example.com"), (3, "Hello!")] {
            for ch in text.chars() {
                form.input(idx, ch);
            }
        }

        assert!(form.submit(now));
        assert!(form.is_submitting());
        assert!(!form.submit(now), "double submit while pending is ignored");

        form.finish(now + Duration::from_secs(2));
        assert_eq!(form.message(), Some(FORM_SUCCESS_MESSAGE));
        assert!(form.fields().iter().all(|f| f.value.is_empty()));

        assert!(!form.tick(now + Duration::from_secs(3)));
        assert!(form.tick(now + Duration::from_secs(8)));
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn blur_flags_only_missing_required_fields() {
        let mut form = ContactForm::new(Duration::from_secs(5));
        form.blur(2);
        assert!(!form.fields()[2].flagged);
        form.blur(3);
        assert!(form.fields()[3].flagged);
    }

    #[test]
    fn filter_bar_dedupes_and_cycles() {
        let mut bar = FilterBar::new(vec![
            "Web".to_string(),
            "ml".to_string(),
            "web".to_string(),
        ]);
        assert_eq!(bar.options(), &["all", "web", "ml"]);
        assert_eq!(bar.active(), "all");
        bar.cycle(1);
        assert_eq!(bar.active(), "web");
        bar.cycle(-2);
        assert_eq!(bar.active(), "ml");
    }

    #[test]
    fn cards_match_all_or_substring_category() {
        let categories = vec!["web".to_string(), "machine-learning".to_string()];
        assert!(card_matches("all", &categories));
        assert!(card_matches("web", &categories));
        assert!(card_matches("learning", &categories));
        assert!(!card_matches("games", &categories));
        assert!(card_matches("all", &[]));
    }
}
