use super::constants::*;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use thiserror::Error;

/// Drawable area in CSS pixels. The simulation origin sits at its centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Non-finite or negative dimensions collapse to 0.
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Edges count as visible.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// One simulated star.
///
/// `position.x`/`position.y` are planar offsets from the viewport centre,
/// `position.z` is depth in `(0, max_depth]`. `size` is fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub size: f32,
}

/// Screen-space result of projecting a particle that is inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedStar {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Per-tick counters returned by [`Starfield::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub respawned: usize,
    pub drawn: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    #[error("speed {speed} is below the smallest step {min} that still moves a star at full depth")]
    SpeedTooSmall { speed: f32, min: f32 },
    #[error("max depth must be finite and positive, got {0}")]
    InvalidDepth(f32),
    #[error("star count {requested} exceeds the limit of {max}")]
    TooManyStars { requested: usize, max: usize },
    #[error("could not parse {field} from {value:?}")]
    Unparsable { field: &'static str, value: String },
}

/// Tunable knobs of the effect.
///
/// - `star_count`: number of particles simulated
/// - `speed`: depth decrement applied to every particle each tick
/// - `max_depth`: depth a particle starts from after a respawn
#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldParams {
    pub star_count: usize,
    pub speed: f32,
    pub max_depth: f32,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            star_count: DEFAULT_STAR_COUNT,
            speed: DEFAULT_SPEED,
            max_depth: Z_MAX,
        }
    }
}

impl StarfieldParams {
    pub fn new(star_count: usize, speed: f32) -> Self {
        Self {
            star_count,
            speed,
            ..Self::default()
        }
    }

    /// Smallest non-zero speed that moves a particle anywhere in `(0, max_depth]`.
    #[inline]
    pub fn min_speed(&self) -> f32 {
        self.max_depth * f32::EPSILON
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ParamsError::InvalidSpeed(self.speed));
        }
        if !self.max_depth.is_finite() || self.max_depth <= 0.0 {
            return Err(ParamsError::InvalidDepth(self.max_depth));
        }
        // Below one f32 step at max depth, `z -= speed` rounds away and stars freeze
        let min = self.min_speed();
        if self.speed > 0.0 && self.speed < min {
            return Err(ParamsError::SpeedTooSmall {
                speed: self.speed,
                min,
            });
        }
        if self.star_count > MAX_STAR_COUNT {
            return Err(ParamsError::TooManyStars {
                requested: self.star_count,
                max: MAX_STAR_COUNT,
            });
        }
        Ok(())
    }

    /// Override fields from string attributes (e.g. `data-star-count`).
    ///
    /// `None` or blank keeps the current value. The result is validated.
    pub fn with_attributes(
        mut self,
        star_count: Option<&str>,
        speed: Option<&str>,
    ) -> Result<Self, ParamsError> {
        if let Some(raw) = star_count.map(str::trim).filter(|s| !s.is_empty()) {
            self.star_count = raw.parse().map_err(|_| ParamsError::Unparsable {
                field: "star count",
                value: raw.to_string(),
            })?;
        }
        if let Some(raw) = speed.map(str::trim).filter(|s| !s.is_empty()) {
            self.speed = raw.parse().map_err(|_| ParamsError::Unparsable {
                field: "speed",
                value: raw.to_string(),
            })?;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Something a starfield can paint onto.
pub trait StarSurface {
    /// Erase the whole drawable area.
    fn clear(&mut self, viewport: Viewport);
    fn fill_star(&mut self, star: &ProjectedStar);
}

/// Perspective-project a particle onto the viewport.
///
/// Returns `None` when the projected centre falls outside the viewport; the
/// particle stays alive, it is just not drawn this frame.
#[inline]
pub fn project(particle: &Particle, viewport: Viewport, max_depth: f32) -> Option<ProjectedStar> {
    let z = particle.position.z;
    let k = PROJECTION_CONSTANT / z;
    let center = particle.position.truncate() * k + viewport.center();
    if !viewport.contains(center) {
        return None;
    }
    let alpha = ((max_depth - z) / BRIGHTNESS_RAMP).clamp(0.0, 1.0);
    let radius = (particle.size * k * RADIUS_SCALE).max(MIN_RADIUS_PX);
    Some(ProjectedStar {
        center,
        radius,
        alpha,
    })
}

/// CSS fill colour for a star at the given alpha.
#[inline]
pub fn fill_style(alpha: f32) -> String {
    let [r, g, b] = STAR_RGB;
    format!("rgba({}, {}, {}, {})", r, g, b, alpha.clamp(0.0, 1.0))
}

/// Fixed-size particle store advanced once per frame.
///
/// Particles fly towards the viewer: every [`step`](Self::step) lowers their
/// depth by `params.speed`, and a particle that reaches depth 0 respawns at
/// `params.max_depth` with fresh planar coordinates. Rendering is a separate,
/// read-only pass so the same state can be painted onto any [`StarSurface`].
pub struct Starfield {
    particles: Vec<Particle>,
    viewport: Viewport,
    params: StarfieldParams,
    rng: StdRng,
    total_respawns: u64,
}

impl Starfield {
    /// Seeded construction, reproducible across runs.
    pub fn new(params: StarfieldParams, viewport: Viewport, seed: u64) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self::populate(params, viewport, StdRng::seed_from_u64(seed)))
    }

    pub fn from_entropy(params: StarfieldParams, viewport: Viewport) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self::populate(params, viewport, StdRng::from_entropy()))
    }

    fn populate(params: StarfieldParams, viewport: Viewport, mut rng: StdRng) -> Self {
        let max_depth = params.max_depth;
        let particles = (0..params.star_count)
            .map(|_| {
                let (x, y) = planar(&mut rng, viewport);
                // (0, max_depth]: never starts at exactly 0
                let z = max_depth - rng.gen_range(0.0..max_depth);
                Particle {
                    position: Vec3::new(x, y, z),
                    size: rng.gen_range(SIZE_MIN..SIZE_MAX),
                }
            })
            .collect();
        Self {
            particles,
            viewport,
            params,
            rng,
            total_respawns: 0,
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    #[inline]
    pub fn total_respawns(&self) -> u64 {
        self.total_respawns
    }

    /// Advance every particle one tick. Returns how many respawned.
    pub fn step(&mut self) -> usize {
        let speed = self.params.speed;
        let max_depth = self.params.max_depth;
        let viewport = self.viewport;
        let mut respawned = 0;
        for p in &mut self.particles {
            p.position.z -= speed;
            if p.position.z <= 0.0 {
                let (x, y) = planar(&mut self.rng, viewport);
                p.position = Vec3::new(x, y, max_depth);
                respawned += 1;
            }
        }
        self.total_respawns += respawned as u64;
        respawned
    }

    /// Visible stars for the current state, in particle order.
    pub fn projected(&self) -> impl Iterator<Item = ProjectedStar> + '_ {
        let viewport = self.viewport;
        let max_depth = self.params.max_depth;
        self.particles
            .iter()
            .filter_map(move |p| project(p, viewport, max_depth))
    }

    /// Clear the surface and paint every visible star. Returns the number drawn.
    pub fn render<S: StarSurface + ?Sized>(&self, surface: &mut S) -> usize {
        surface.clear(self.viewport);
        let mut drawn = 0;
        for star in self.projected() {
            surface.fill_star(&star);
            drawn += 1;
        }
        drawn
    }

    /// One full frame: [`step`](Self::step) then [`render`](Self::render).
    pub fn tick<S: StarSurface + ?Sized>(&mut self, surface: &mut S) -> TickStats {
        let respawned = self.step();
        let drawn = self.render(surface);
        TickStats { respawned, drawn }
    }

    /// Adopt a new viewport. Planar coordinates are redrawn within the new
    /// bounds; depth and size are kept so the field does not visibly jump.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for p in &mut self.particles {
            let (x, y) = planar(&mut self.rng, viewport);
            p.position.x = x;
            p.position.y = y;
        }
    }
}

#[inline]
fn planar(rng: &mut StdRng, viewport: Viewport) -> (f32, f32) {
    (
        centered(rng, viewport.width),
        centered(rng, viewport.height),
    )
}

// Uniform in [-extent/2, extent/2); a degenerate extent pins the axis to 0.
#[inline]
fn centered(rng: &mut StdRng, extent: f32) -> f32 {
    let half = extent * 0.5;
    if half > 0.0 && half.is_finite() {
        rng.gen_range(-half..half)
    } else {
        0.0
    }
}
