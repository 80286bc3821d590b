// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn depth_and_projection_constants_are_positive() {
    assert!(Z_MAX > 0.0);
    assert!(PROJECTION_CONSTANT > 0.0);
    assert!(BRIGHTNESS_RAMP > 0.0);
    assert!(RADIUS_SCALE > 0.0);
    assert!(MIN_RADIUS_PX > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_have_logical_relationships() {
    // Stars must finish fading in before they reach the viewer
    assert!(BRIGHTNESS_RAMP <= Z_MAX);

    // Size range is non-empty
    assert!(SIZE_MAX > SIZE_MIN);
    assert!(SIZE_MIN > 0.0);

    // Defaults sit inside the accepted range
    assert!(DEFAULT_STAR_COUNT <= MAX_STAR_COUNT);
    assert!(DEFAULT_SPEED >= 0.0);
    assert!(HERO_STAR_COUNT <= DEFAULT_STAR_COUNT);
    assert!(HERO_SPEED >= 0.0);

    // Smoothing weight is a proper blend factor
    assert!(BUDGET_EWMA_ALPHA > 0.0 && BUDGET_EWMA_ALPHA <= 1.0);
    assert!(FRAME_BUDGET_MS > 0.0);
    assert!(BUDGET_WARN_INTERVAL_FRAMES > 0);
}

#[test]
fn backdrop_never_captures_pointer_input() {
    assert!(BACKDROP_STYLE.contains(&("pointer-events", "none")));
    assert!(BACKDROP_STYLE.contains(&("position", "fixed")));
    assert_eq!(DEVICE_PIXEL_RATIO, 1.0);
}

#[test]
fn dom_contract_names_are_stable() {
    assert_eq!(STARFIELD_CANVAS_ID, "starfield");
    assert!(ATTR_STAR_COUNT.starts_with("data-"));
    assert!(ATTR_SPEED.starts_with("data-"));
}
