use folio_fx::config::FocusConfig;
use folio_fx::focus::{focus_pixel_size, is_in_focus, pixel_bucket, ElementRect, FocusProbe};
use pretty_assertions::assert_eq;

const VIEWPORT_H: f64 = 800.0;

fn size(distance: f64) -> f64 {
    focus_pixel_size(distance, VIEWPORT_H, &FocusConfig::default())
}

#[test]
fn focus_zone_is_full_resolution() {
    for distance in [0.0, 1.0, 50.0, 99.9, 100.0] {
        assert_eq!(size(distance), 1.0, "distance {distance}");
    }
}

#[test]
fn pixel_size_grows_monotonically_past_the_zone() {
    let mut previous = 1.0;
    let mut distance = 100.0;
    while distance < 3_000.0 {
        let current = size(distance);
        assert!(current >= previous, "{current} < {previous} at {distance}");
        assert!((1.0..=100.0).contains(&current));
        previous = current;
        distance += 7.5;
    }
}

#[test]
fn saturates_one_viewport_past_the_zone() {
    // (distance - zone) / (viewport - zone) reaches 1 at distance == viewport
    assert_eq!(size(800.0), 100.0);
    assert_eq!(size(10_000.0), 100.0);
    assert_eq!(size(f64::INFINITY), 100.0);
    assert_eq!(size(f64::NAN), 100.0);
    // half way: 1 + 0.5 * 99
    assert_eq!(size(450.0), 50.5);
}

#[test]
fn tiny_viewports_do_not_divide_by_zero() {
    let config = FocusConfig::default();
    let s = focus_pixel_size(100.5, 20.0, &config);
    assert!(s.is_finite());
    assert!((1.0..=100.0).contains(&s));
    assert_eq!(focus_pixel_size(101.0, 0.0, &config), 100.0);
}

#[test]
fn probe_distance_uses_element_center() {
    let probe = FocusProbe {
        element: Some(ElementRect {
            top: 100.0,
            height: 480.0,
        }),
        viewport_height: 800.0,
    };
    // center 340 vs 400
    assert_eq!(probe.distance(), 60.0);

    let missing = FocusProbe {
        element: None,
        viewport_height: 800.0,
    };
    assert_eq!(missing.distance(), f64::INFINITY);
}

#[test]
fn bucket_rounds_and_gates_focus() {
    assert_eq!(pixel_bucket(1.0), 1);
    assert_eq!(pixel_bucket(1.49), 1);
    assert_eq!(pixel_bucket(1.5), 2);
    assert_eq!(pixel_bucket(99.6), 100);
    assert_eq!(pixel_bucket(0.2), 1);
    assert_eq!(pixel_bucket(f64::NAN), 1);

    assert!(is_in_focus(pixel_bucket(size(100.0))));
    assert!(is_in_focus(pixel_bucket(size(103.0))));
    assert!(!is_in_focus(pixel_bucket(size(200.0))));
}
