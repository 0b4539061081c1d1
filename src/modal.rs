use std::sync::Arc;

use crate::source::{self, SourceKind};
use crate::video::{debug_log, LaunchRequest, MediaLauncher, MediaSession};

/// The modal markup shape the page provides. Constructed once; when the page
/// carries no modal at all, the controller is built from `None` and every
/// operation becomes a silent no-op.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub close_label: String,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            title: "Video preview".to_string(),
            close_label: "Close video".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    OpenEmbedded,
    OpenNative,
}

/// The single media element owned by the modal. Created on open, destroyed
/// on close; open always replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaElement {
    EmbeddedFrame {
        src: String,
        video_id: String,
        allow_fullscreen: bool,
        inline_playback: bool,
    },
    NativePlayer {
        src: String,
        mime: &'static str,
        paused: bool,
    },
}

/// Dual-mode video preview modal.
///
/// States: Closed, OpenEmbedded (hosted video behind an embed URL),
/// OpenNative (direct media file). Transitions happen only on user events.
/// Playback-start failures are swallowed: a native player that could not
/// start stays paused and waits for a manual play request.
pub struct VideoModal {
    chrome: Option<Chrome>,
    launcher: Option<Arc<dyn MediaLauncher>>,
    state: ModalState,
    element: Option<MediaElement>,
    session: Option<Box<dyn MediaSession>>,
    visible: bool,
    aria_hidden: bool,
    close_focused: bool,
    scroll_locked: bool,
    notice: Option<String>,
}

impl VideoModal {
    pub fn new(chrome: Option<Chrome>, launcher: Option<Arc<dyn MediaLauncher>>) -> Self {
        if chrome.is_none() {
            debug_log("modal: no modal chrome on this page, subsystem disabled");
        }
        Self {
            chrome,
            launcher,
            state: ModalState::Closed,
            element: None,
            session: None,
            visible: false,
            aria_hidden: true,
            close_focused: false,
            scroll_locked: false,
            notice: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.chrome.is_some()
    }

    pub fn chrome(&self) -> Option<&Chrome> {
        self.chrome.as_ref()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn aria_hidden(&self) -> bool {
        self.aria_hidden
    }

    pub fn close_focused(&self) -> bool {
        self.close_focused
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn element(&self) -> Option<&MediaElement> {
        self.element.as_ref()
    }

    /// Status text for the page to show, drained on read.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Opens the modal for a raw source string. Rejected without a state
    /// change when the source is blank, classifies to Invalid, or the page
    /// has no modal chrome.
    pub fn open(&mut self, raw: &str, title: &str) {
        if self.chrome.is_none() {
            return;
        }
        let raw = raw.trim();
        if raw.is_empty() {
            debug_log("modal: open requested without a source");
            return;
        }

        // Classify before touching the current content so an unplayable
        // source leaves whatever is showing untouched.
        let element = match source::resolve(raw) {
            SourceKind::Embed(embed) => MediaElement::EmbeddedFrame {
                src: embed.url,
                video_id: embed.video_id,
                allow_fullscreen: true,
                inline_playback: true,
            },
            SourceKind::NativeFile(native) => MediaElement::NativePlayer {
                src: native.path,
                mime: native.mime.as_str(),
                paused: true,
            },
            SourceKind::Invalid => {
                debug_log(format!("modal: unplayable video source {raw}"));
                self.notice = Some("This video link is missing its identifier.".to_string());
                return;
            }
        };

        self.clear_media();

        match element {
            MediaElement::EmbeddedFrame { ref src, .. } => {
                // The frame starts its own playback; a launch failure is
                // logged and swallowed just like a blocked autoplay.
                self.session = self.launch(src, title);
                self.state = ModalState::OpenEmbedded;
            }
            MediaElement::NativePlayer { ref src, .. } => {
                self.session = self.launch(src, title);
                self.state = ModalState::OpenNative;
            }
        }

        let playing = self.session.is_some();
        let mut element = element;
        if let MediaElement::NativePlayer { paused, .. } = &mut element {
            *paused = !playing;
        }
        self.element = Some(element);

        self.visible = true;
        self.aria_hidden = false;
        self.close_focused = true;
        self.scroll_locked = true;
    }

    /// Closes the modal. Idempotent: calling from Closed only re-confirms
    /// the hidden chrome state.
    pub fn close(&mut self) {
        if self.chrome.is_none() {
            return;
        }
        self.clear_media();
        self.visible = false;
        self.aria_hidden = true;
        self.close_focused = false;
        self.scroll_locked = false;
        self.state = ModalState::Closed;
    }

    /// Manual play/pause on an open native player, e.g. after a blocked
    /// playback start. No-op for embedded frames and when closed.
    pub fn toggle_playback(&mut self) {
        if self.state != ModalState::OpenNative {
            return;
        }
        let Some(MediaElement::NativePlayer { src, paused, .. }) = self.element.as_mut() else {
            return;
        };
        if let Some(session) = self.session.as_mut() {
            match session.toggle_pause() {
                Ok(()) => *paused = !*paused,
                Err(err) => debug_log(format!("modal: pause toggle failed: {err:#}")),
            }
            return;
        }
        // Playback never started; this is the user's press of the play
        // button.
        let src = src.clone();
        self.session = self.launch(&src, "");
        let playing = self.session.is_some();
        if let Some(MediaElement::NativePlayer { paused, .. }) = self.element.as_mut() {
            *paused = !playing;
        }
    }

    fn launch(&self, target: &str, title: &str) -> Option<Box<dyn MediaSession>> {
        let Some(launcher) = self.launcher.as_ref() else {
            debug_log("modal: no media launcher wired, element stays paused");
            return None;
        };
        let request = LaunchRequest {
            target: target.to_string(),
            title: title.to_string(),
        };
        match launcher.launch(&request) {
            Ok(session) => Some(session),
            Err(err) => {
                // Playback start rejected; the user sees a paused player.
                debug_log(format!("modal: playback start rejected: {err:#}"));
                None
            }
        }
    }

    fn clear_media(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.element = None;
    }
}

impl Drop for VideoModal {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        launches: Mutex<Vec<String>>,
        sessions: Mutex<Vec<Arc<AtomicBool>>>,
        reject: bool,
    }

    impl RecordingLauncher {
        fn rejecting() -> Self {
            Self {
                reject: true,
                ..Self::default()
            }
        }

        fn launched(&self) -> Vec<String> {
            self.launches.lock().unwrap().clone()
        }

        /// One stop flag per session handed out, in launch order.
        fn stop_flags(&self) -> Vec<Arc<AtomicBool>> {
            self.sessions.lock().unwrap().clone()
        }
    }

    impl MediaLauncher for RecordingLauncher {
        fn launch(&self, request: &LaunchRequest) -> anyhow::Result<Box<dyn MediaSession>> {
            self.launches.lock().unwrap().push(request.target.clone());
            if self.reject {
                return Err(anyhow!("autoplay blocked"));
            }
            let stopped = Arc::new(AtomicBool::new(false));
            self.sessions.lock().unwrap().push(stopped.clone());
            Ok(Box::new(RecordingSession { stopped }))
        }
    }

    struct RecordingSession {
        stopped: Arc<AtomicBool>,
    }

    impl MediaSession for RecordingSession {
        fn toggle_pause(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    fn modal_with(launcher: Arc<RecordingLauncher>) -> VideoModal {
        let launcher: Arc<dyn MediaLauncher> = launcher;
        VideoModal::new(Some(Chrome::default()), Some(launcher))
    }

    #[test]
    fn hosted_watch_url_opens_embedded_frame() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        modal.open("https://www.youtube.com/watch?v=abc123", "Demo");

        assert_eq!(modal.state(), ModalState::OpenEmbedded);
        assert!(modal.visible());
        assert!(!modal.aria_hidden());
        assert!(modal.close_focused());
        assert!(modal.scroll_locked());
        match modal.element().expect("frame present") {
            MediaElement::EmbeddedFrame {
                src,
                video_id,
                allow_fullscreen,
                inline_playback,
            } => {
                assert_eq!(video_id.as_str(), "abc123");
                assert!(src.contains("autoplay=1"));
                assert!(*allow_fullscreen);
                assert!(*inline_playback);
            }
            other => panic!("expected embedded frame, got {other:?}"),
        }
        assert_eq!(launcher.launched().len(), 1);
    }

    #[test]
    fn file_path_opens_native_player_and_attempts_playback() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        modal.open("videos/demo.mp4", "Demo");

        assert_eq!(modal.state(), ModalState::OpenNative);
        assert!(modal.visible());
        match modal.element().expect("player present") {
            MediaElement::NativePlayer { src, mime, paused } => {
                assert_eq!(src.as_str(), "videos/demo.mp4");
                assert_eq!(*mime, "video/mp4");
                assert!(!paused);
            }
            other => panic!("expected native player, got {other:?}"),
        }
        assert_eq!(launcher.launched(), vec!["videos/demo.mp4".to_string()]);
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        modal.open("   ", "Demo");

        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.visible());
        assert!(modal.element().is_none());
        assert!(launcher.launched().is_empty());
    }

    #[test]
    fn invalid_source_leaves_prior_state_untouched() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        modal.open("videos/demo.mp4", "Demo");
        modal.open("https://www.youtube.com/feed/library", "Broken");

        assert_eq!(modal.state(), ModalState::OpenNative);
        assert!(matches!(
            modal.element(),
            Some(MediaElement::NativePlayer { .. })
        ));
        assert!(modal.take_notice().is_some());
        assert_eq!(launcher.launched().len(), 1);
    }

    #[test]
    fn close_is_idempotent() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher);

        modal.close();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(modal.aria_hidden());

        modal.close();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.visible());
        assert!(!modal.scroll_locked());
    }

    #[test]
    fn close_empties_container_and_stops_playback_on_both_branches() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        for (session, src) in ["videos/clip.webm", "https://youtu.be/abc"]
            .into_iter()
            .enumerate()
        {
            modal.open(src, "Demo");
            assert!(modal.is_open());
            modal.close();
            assert!(modal.element().is_none());
            assert!(
                launcher.stop_flags()[session].load(Ordering::SeqCst),
                "close must stop the running session"
            );
            assert!(!modal.scroll_locked());
            assert!(modal.aria_hidden());
            assert!(!modal.visible());
        }
    }

    #[test]
    fn webm_mime_selected_during_open() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher);

        modal.open("videos/clip.webm", "Demo");
        match modal.element().expect("player present") {
            MediaElement::NativePlayer { mime, .. } => assert_eq!(*mime, "video/webm"),
            other => panic!("expected native player, got {other:?}"),
        }
    }

    #[test]
    fn rejected_playback_start_degrades_to_paused() {
        let launcher = Arc::new(RecordingLauncher::rejecting());
        let mut modal = modal_with(launcher.clone());

        modal.open("videos/demo.mp4", "Demo");

        assert_eq!(modal.state(), ModalState::OpenNative);
        assert!(modal.visible());
        match modal.element().expect("player present") {
            MediaElement::NativePlayer { paused, .. } => assert!(*paused),
            other => panic!("expected native player, got {other:?}"),
        }

        // Manual play retries the launch.
        modal.toggle_playback();
        assert_eq!(launcher.launched().len(), 2);
    }

    #[test]
    fn reopening_replaces_media_wholesale() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = modal_with(launcher.clone());

        modal.open("videos/first.mp4", "First");
        modal.open("https://youtu.be/second", "Second");

        assert_eq!(modal.state(), ModalState::OpenEmbedded);
        assert!(matches!(
            modal.element(),
            Some(MediaElement::EmbeddedFrame { .. })
        ));
        assert_eq!(launcher.launched().len(), 2);

        // Replacement stops the first session; the second keeps playing.
        let flags = launcher.stop_flags();
        assert!(flags[0].load(Ordering::SeqCst));
        assert!(!flags[1].load(Ordering::SeqCst));
    }

    #[test]
    fn absent_chrome_disables_every_operation() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut modal = VideoModal::new(None, Some(launcher.clone() as Arc<dyn MediaLauncher>));

        modal.open("videos/demo.mp4", "Demo");
        modal.toggle_playback();
        modal.close();

        assert!(!modal.enabled());
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.visible());
        assert!(modal.element().is_none());
        assert!(launcher.launched().is_empty());
    }
}
