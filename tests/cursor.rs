use folio_fx::config::CursorConfig;
use folio_fx::cursor::CursorGlyph;
use folio_fx::geom::Point;
use folio_fx::heuristic::{infer_playback_toggle, FocusedElement, PlaybackDetector};
use pretty_assertions::assert_eq;

#[test]
fn glyph_is_hidden_until_the_pointer_shows_up() {
    let mut glyph = CursorGlyph::new(&CursorConfig::default());
    assert!(!glyph.is_visible());
    assert_eq!(glyph.placement(), None);

    glyph.pointer_moved(Point::new(100.0, 50.0));
    assert_eq!(glyph.placement(), Some(Point::new(86.0, 36.0)));
}

#[test]
fn glyph_hides_on_leave_and_reappears_where_it_was() {
    let mut glyph = CursorGlyph::new(&CursorConfig {
        size_px: 10.0,
        ..CursorConfig::default()
    });
    glyph.pointer_moved(Point::new(20.0, 20.0));
    glyph.pointer_left();
    assert_eq!(glyph.placement(), None);

    glyph.pointer_entered();
    assert_eq!(glyph.placement(), Some(Point::new(15.0, 15.0)));
}

#[test]
fn only_iframes_count_as_player_clicks() {
    assert_eq!(FocusedElement::from_tag_name(Some("IFRAME")), FocusedElement::Iframe);
    assert_eq!(FocusedElement::from_tag_name(Some("iframe")), FocusedElement::Iframe);
    assert_eq!(FocusedElement::from_tag_name(Some("BODY")), FocusedElement::Other);
    assert_eq!(FocusedElement::from_tag_name(None), FocusedElement::Nothing);

    assert!(infer_playback_toggle(FocusedElement::Iframe));
    assert!(!infer_playback_toggle(FocusedElement::Other));
    assert!(!infer_playback_toggle(FocusedElement::Nothing));
}

#[test]
fn each_iframe_blur_toggles_playback() {
    let mut detector = PlaybackDetector::default();
    assert_eq!(detector.observe_blur(FocusedElement::Other), None);
    assert_eq!(detector.observe_blur(FocusedElement::Iframe), Some(true));
    assert!(detector.is_playing());
    assert_eq!(detector.observe_blur(FocusedElement::Nothing), None);
    assert_eq!(detector.observe_blur(FocusedElement::Iframe), Some(false));
}

#[test]
fn explicit_set_reports_only_changes() {
    let mut detector = PlaybackDetector::default();
    assert_eq!(detector.set(false), None);
    assert_eq!(detector.set(true), Some(true));
    assert_eq!(detector.set(true), None);
    // Escape after a toggle
    assert_eq!(detector.set(false), Some(false));
    assert!(!detector.is_playing());
}

#[test]
fn clicks_while_the_iframe_keeps_focus_are_not_seen() {
    let mut detector = PlaybackDetector::default();
    // play: focus moves from the page into the iframe
    assert_eq!(detector.observe_blur(FocusedElement::Iframe), Some(true));
    // pause inside the still-focused iframe fires no blur, so nothing is observed
    assert!(detector.is_playing());
    // back on the page, the next click into the iframe is the one that flips it
    assert_eq!(detector.observe_blur(FocusedElement::Iframe), Some(false));
}
