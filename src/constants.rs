/// Page-side constants for mounting the starfield.
///
/// Simulation tuning lives in `core::constants`; these cover the DOM contract
/// and the deployment choices made for the hero section.
// Canvas picked up automatically at module start
pub const STARFIELD_CANVAS_ID: &str = "starfield";

// Optional overrides read from that canvas
pub const ATTR_STAR_COUNT: &str = "data-star-count";
pub const ATTR_SPEED: &str = "data-speed";

// Hero section runs a lighter field than the library default
pub const HERO_STAR_COUNT: usize = 120;
pub const HERO_SPEED: f32 = 0.2;

// Backing store scale; high-DPI displays are deliberately rendered at 1x
pub const DEVICE_PIXEL_RATIO: f64 = 1.0;

// Backdrop layout: full-viewport, behind content, never intercepting input
pub const BACKDROP_STYLE: [(&str, &str); 4] = [
    ("position", "fixed"),
    ("inset", "0"),
    ("pointer-events", "none"),
    ("z-index", "0"),
];
