//! Guessing whether the embedded music player is playing.
//!
//! Cross-origin iframes do not report their state, so this only watches where
//! keyboard focus goes: a click inside the player iframe blurs the window and
//! leaves the iframe as the active element, which is counted as a play/pause
//! toggle. Only the click that moves focus into the iframe is seen. While focus
//! stays inside it, further clicks (a pause right after play) fire no window
//! `blur`, so they go unnoticed until focus returns to the page and a later
//! click blurs the window again. Any other click that lands in the iframe is
//! counted too. Treat the result as a hint for decoration, never as truth.

/// How long to wait after `blur` before reading the active element; the
/// browser only settles focus on the iframe after the event.
pub const BLUR_SETTLE_MS: u32 = 100;

/// Kind of element holding focus after the window blurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusedElement {
    Iframe,
    Other,
    Nothing,
}

impl FocusedElement {
    pub fn from_tag_name(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if tag.eq_ignore_ascii_case("iframe") => FocusedElement::Iframe,
            Some(_) => FocusedElement::Other,
            None => FocusedElement::Nothing,
        }
    }
}

/// True when focus moving to `focused` should count as a play/pause click.
pub fn infer_playback_toggle(focused: FocusedElement) -> bool {
    focused == FocusedElement::Iframe
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackDetector {
    playing: bool,
}

impl PlaybackDetector {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns the new state when the blur looks like a toggle.
    pub fn observe_blur(&mut self, focused: FocusedElement) -> Option<bool> {
        infer_playback_toggle(focused).then(|| {
            self.playing = !self.playing;
            self.playing
        })
    }

    /// Overrides the guess, e.g. from a host page that knows better or on
    /// Escape. Returns the new state when it changed.
    pub fn set(&mut self, playing: bool) -> Option<bool> {
        (self.playing != playing).then(|| {
            self.playing = playing;
            playing
        })
    }
}
