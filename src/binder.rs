use std::collections::HashMap;

use crate::video::debug_log;

/// A clickable element that should open the video modal. The source string
/// is read at activation time, so content updates between bind and click are
/// honored the same way a live attribute read would be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub id: String,
    pub source: Option<String>,
}

#[derive(Debug, Default)]
struct Binding {
    bound: bool,
}

/// What a click on a trigger should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The element was never bound; the click falls through untouched.
    NotBound,
    /// Bound, but carrying no source string. Logged, nothing opens.
    MissingSource,
    /// Bound with a source: open the modal with it.
    Open(String),
}

/// Attaches open behavior to trigger elements exactly once each. Re-running
/// `bind` over a grown trigger set (content inserted after initial load)
/// binds only the new elements; a bound flag is never cleared.
#[derive(Debug, Default)]
pub struct LinkBinder {
    bindings: HashMap<String, Binding>,
}

impl LinkBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every not-yet-bound trigger and returns how many were new.
    pub fn bind<'a>(&mut self, triggers: impl IntoIterator<Item = &'a Trigger>) -> usize {
        let mut newly_bound = 0;
        for trigger in triggers {
            let binding = self.bindings.entry(trigger.id.clone()).or_default();
            if binding.bound {
                continue;
            }
            binding.bound = true;
            newly_bound += 1;
        }
        newly_bound
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.bindings.get(id).map(|b| b.bound).unwrap_or(false)
    }

    /// Resolves one click on a trigger. A double-bound element still yields
    /// a single activation per click.
    pub fn activate(&self, trigger: &Trigger) -> Activation {
        if !self.is_bound(&trigger.id) {
            return Activation::NotBound;
        }
        match trigger.source.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() => Activation::Open(source.to_string()),
            _ => {
                debug_log(format!("no video source on trigger {}", trigger.id));
                Activation::MissingSource
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(id: &str, source: Option<&str>) -> Trigger {
        Trigger {
            id: id.to_string(),
            source: source.map(str::to_string),
        }
    }

    #[test]
    fn binds_each_trigger_once() {
        let mut binder = LinkBinder::new();
        let triggers = vec![trigger("a", Some("videos/a.mp4")), trigger("b", None)];
        assert_eq!(binder.bind(&triggers), 2);
        assert_eq!(binder.bind(&triggers), 0);
        assert!(binder.is_bound("a"));
        assert!(binder.is_bound("b"));
    }

    #[test]
    fn rebinding_after_insertion_only_touches_new_triggers() {
        let mut binder = LinkBinder::new();
        let mut triggers = vec![trigger("a", Some("videos/a.mp4"))];
        assert_eq!(binder.bind(&triggers), 1);
        triggers.push(trigger("c", Some("https://youtu.be/xyz")));
        assert_eq!(binder.bind(&triggers), 1);
    }

    #[test]
    fn one_click_yields_one_open_even_after_double_bind() {
        let mut binder = LinkBinder::new();
        let t = trigger("a", Some("videos/a.mp4"));
        binder.bind([&t]);
        binder.bind([&t]);
        assert_eq!(
            binder.activate(&t),
            Activation::Open("videos/a.mp4".to_string())
        );
    }

    #[test]
    fn unbound_trigger_does_not_activate() {
        let binder = LinkBinder::new();
        let t = trigger("a", Some("videos/a.mp4"));
        assert_eq!(binder.activate(&t), Activation::NotBound);
    }

    #[test]
    fn bound_trigger_without_source_reports_missing() {
        let mut binder = LinkBinder::new();
        let t = trigger("a", None);
        binder.bind([&t]);
        assert_eq!(binder.activate(&t), Activation::MissingSource);

        let blank = trigger("b", Some("   "));
        binder.bind([&blank]);
        assert_eq!(binder.activate(&blank), Activation::MissingSource);
    }
}
