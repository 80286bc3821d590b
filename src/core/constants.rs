/// Starfield simulation and projection constants.
///
/// These express the intended look of the effect (depth range, perspective
/// strength, fade ramp) and keep magic numbers out of the update/render code.
// Depth range: particles live in (0, Z_MAX]
pub const Z_MAX: f32 = 1000.0;

// Perspective divide numerator: k = PROJECTION_CONSTANT / z
pub const PROJECTION_CONSTANT: f32 = 500.0;

// Depth distance over which a star fades from transparent to fully bright
pub const BRIGHTNESS_RAMP: f32 = 500.0;

// On-screen radius = max(MIN_RADIUS_PX, size * k * RADIUS_SCALE)
pub const RADIUS_SCALE: f32 = 0.5;
pub const MIN_RADIUS_PX: f32 = 1.0;

// Per-star size drawn once at creation, uniform in [SIZE_MIN, SIZE_MAX)
pub const SIZE_MIN: f32 = 0.5;
pub const SIZE_MAX: f32 = 2.0;

// Defaults for the configurable surface
pub const DEFAULT_STAR_COUNT: usize = 150;
pub const DEFAULT_SPEED: f32 = 0.2; // depth units per tick
pub const MAX_STAR_COUNT: usize = 10_000;

// Star fill colour (alpha comes from depth)
pub const STAR_RGB: [u8; 3] = [175, 227, 215];

// Update+draw budget for one frame, and how often an overrun may be reported
pub const FRAME_BUDGET_MS: f32 = 4.0;
pub const BUDGET_WARN_INTERVAL_FRAMES: u64 = 600;
pub const BUDGET_EWMA_ALPHA: f32 = 0.1; // new = (1-α)*old + α*sample
