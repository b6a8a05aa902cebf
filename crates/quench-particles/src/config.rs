//! Simulation configuration (TOML, layered over built-in defaults)
//!
//! A config file only needs the keys it changes: it is merged key-by-key
//! over [`SimulationConfig::default`] before deserialization, then validated.

use crate::emission::IntensityResponse;
use crate::particle::pool_capacity;
use quench_core::{QuenchError, Result, Rgb, Spline, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One control point of a lifetime curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub t: f32,
    pub value: T,
}

fn keys<T: Copy>(points: &[(f32, T)]) -> Vec<Keyframe<T>> {
    points
        .iter()
        .map(|&(t, value)| Keyframe { t, value })
        .collect()
}

/// Where a plume spawns its particles, relative to the fire anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnGeometryConfig {
    /// Uniform in a box of `half_extents` centred at `anchor + offset`
    Volume { offset: Vec3, half_extents: Vec3 },
    /// Uniform over a `width` × `depth` rectangle at world height `height`, centred over the anchor
    CeilingBand { height: f32, width: f32, depth: f32 },
}

/// What happens to plume particles at the edge of their region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryConfig {
    OpenAir,
    /// Room-bounded spread under the ceiling
    Ceiling {
        height: f32,
        half_width: f32,
        half_depth: f32,
        /// Fraction of speed kept after bouncing off a wall
        wall_damping: f32,
        /// Vertical pull back toward `height`, per metre of displacement
        restoring_strength: f32,
    },
}

/// One fire or smoke particle system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumeConfig {
    /// Particles per second at full intensity
    pub rate: f32,
    /// Explicit pool capacity; derived from rate and life when absent
    pub max_particles: Option<usize>,
    pub life_min: f32,
    pub life_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub spawn: SpawnGeometryConfig,
    pub boundary: BoundaryConfig,
    pub initial_velocity: Vec3,
    /// Per-axis uniform jitter added to the initial velocity
    pub velocity_jitter: f32,
    /// Constant acceleration (buoyancy for flame and smoke)
    pub drift: Vec3,
    /// Per-axis random acceleration each tick
    pub perturbation: f32,
    pub rotation_rate_max: f32,
    pub intensity_response: IntensityResponse,
    /// Multiplier on the spawn size over age
    pub size_curve: Vec<Keyframe<f32>>,
    pub alpha_curve: Vec<Keyframe<f32>>,
    pub color_normal: Vec<Keyframe<Rgb>>,
    /// Palette blended in as the fire is suppressed
    pub color_suppressed: Vec<Keyframe<Rgb>>,
}

impl PlumeConfig {
    /// Flame core: short-lived, bright, scales linearly with intensity
    pub fn flame() -> Self {
        Self {
            rate: 60.0,
            max_particles: None,
            life_min: 0.6,
            life_max: 1.2,
            size_min: 0.35,
            size_max: 0.6,
            spawn: SpawnGeometryConfig::Volume {
                offset: Vec3::new(0.0, 0.1, 0.0),
                half_extents: Vec3::new(0.25, 0.05, 0.25),
            },
            boundary: BoundaryConfig::OpenAir,
            initial_velocity: Vec3::new(0.0, 1.2, 0.0),
            velocity_jitter: 0.25,
            drift: Vec3::new(0.0, 0.8, 0.0),
            perturbation: 0.6,
            rotation_rate_max: 1.5,
            intensity_response: IntensityResponse::Linear,
            size_curve: keys(&[(0.0, 0.6), (0.3, 1.0), (1.0, 0.2)]),
            alpha_curve: keys(&[(0.0, 0.0), (0.1, 1.0), (0.7, 0.8), (1.0, 0.0)]),
            color_normal: keys(&[
                (0.0, Rgb::new(1.0, 0.9, 0.5)),
                (0.4, Rgb::new(1.0, 0.5, 0.1)),
                (1.0, Rgb::new(0.6, 0.1, 0.0)),
            ]),
            color_suppressed: keys(&[
                (0.0, Rgb::new(0.55, 0.55, 0.55)),
                (1.0, Rgb::new(0.35, 0.35, 0.35)),
            ]),
        }
    }

    /// Column of smoke rising off the flame
    pub fn rising_smoke() -> Self {
        Self {
            rate: 25.0,
            max_particles: None,
            life_min: 2.5,
            life_max: 4.0,
            size_min: 0.5,
            size_max: 0.9,
            spawn: SpawnGeometryConfig::Volume {
                offset: Vec3::new(0.0, 0.8, 0.0),
                half_extents: Vec3::new(0.3, 0.2, 0.3),
            },
            boundary: BoundaryConfig::OpenAir,
            initial_velocity: Vec3::new(0.0, 0.9, 0.0),
            velocity_jitter: 0.2,
            drift: Vec3::new(0.0, 0.35, 0.0),
            perturbation: 0.4,
            rotation_rate_max: 0.6,
            intensity_response: IntensityResponse::Offset { threshold: 0.1 },
            size_curve: keys(&[(0.0, 0.5), (1.0, 1.6)]),
            alpha_curve: keys(&[(0.0, 0.0), (0.15, 0.5), (1.0, 0.0)]),
            color_normal: keys(&[
                (0.0, Rgb::new(0.25, 0.22, 0.2)),
                (1.0, Rgb::new(0.12, 0.12, 0.12)),
            ]),
            color_suppressed: keys(&[
                (0.0, Rgb::new(0.7, 0.7, 0.7)),
                (1.0, Rgb::new(0.5, 0.5, 0.5)),
            ]),
        }
    }

    /// Smoke layer spreading under the ceiling
    pub fn ceiling_smoke() -> Self {
        Self {
            rate: 15.0,
            max_particles: None,
            life_min: 5.0,
            life_max: 8.0,
            size_min: 0.9,
            size_max: 1.6,
            spawn: SpawnGeometryConfig::CeilingBand {
                height: 3.0,
                width: 6.0,
                depth: 6.0,
            },
            boundary: BoundaryConfig::Ceiling {
                height: 3.0,
                half_width: 3.0,
                half_depth: 3.0,
                wall_damping: 0.5,
                restoring_strength: 2.0,
            },
            initial_velocity: Vec3::ZERO,
            velocity_jitter: 0.35,
            drift: Vec3::ZERO,
            perturbation: 0.3,
            rotation_rate_max: 0.3,
            intensity_response: IntensityResponse::Offset { threshold: 0.1 },
            size_curve: keys(&[(0.0, 0.7), (1.0, 1.3)]),
            alpha_curve: keys(&[(0.0, 0.0), (0.2, 0.4), (0.8, 0.35), (1.0, 0.0)]),
            color_normal: keys(&[
                (0.0, Rgb::new(0.18, 0.17, 0.16)),
                (1.0, Rgb::new(0.1, 0.1, 0.1)),
            ]),
            color_suppressed: keys(&[
                (0.0, Rgb::new(0.65, 0.65, 0.65)),
                (1.0, Rgb::new(0.55, 0.55, 0.55)),
            ]),
        }
    }

    pub fn size_spline(&self) -> Result<Spline<f32>> {
        curve(&self.size_curve)
    }

    pub fn alpha_spline(&self) -> Result<Spline<f32>> {
        curve(&self.alpha_curve)
    }

    pub fn normal_color_spline(&self) -> Result<Spline<Rgb>> {
        curve(&self.color_normal)
    }

    pub fn suppressed_color_spline(&self) -> Result<Spline<Rgb>> {
        curve(&self.color_suppressed)
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        check_non_negative(&format!("{name}.rate"), self.rate)?;
        check_positive(&format!("{name}.life_min"), self.life_min)?;
        check_ordered(&format!("{name}.life"), self.life_min, self.life_max)?;
        check_non_negative(&format!("{name}.size_min"), self.size_min)?;
        check_ordered(&format!("{name}.size"), self.size_min, self.size_max)?;
        check_non_negative(&format!("{name}.velocity_jitter"), self.velocity_jitter)?;
        check_non_negative(&format!("{name}.perturbation"), self.perturbation)?;
        check_non_negative(&format!("{name}.rotation_rate_max"), self.rotation_rate_max)?;
        check_vec(&format!("{name}.initial_velocity"), self.initial_velocity)?;
        check_vec(&format!("{name}.drift"), self.drift)?;

        if let IntensityResponse::Offset { threshold } = self.intensity_response {
            check_range(&format!("{name}.intensity_response.threshold"), threshold, 0.0, 1.0)?;
        }

        match &self.spawn {
            SpawnGeometryConfig::Volume {
                offset,
                half_extents,
            } => {
                check_vec(&format!("{name}.spawn.offset"), *offset)?;
                check_non_negative(&format!("{name}.spawn.half_extents.x"), half_extents.x)?;
                check_non_negative(&format!("{name}.spawn.half_extents.y"), half_extents.y)?;
                check_non_negative(&format!("{name}.spawn.half_extents.z"), half_extents.z)?;
            }
            SpawnGeometryConfig::CeilingBand {
                height,
                width,
                depth,
            } => {
                check_finite(&format!("{name}.spawn.height"), *height)?;
                check_non_negative(&format!("{name}.spawn.width"), *width)?;
                check_non_negative(&format!("{name}.spawn.depth"), *depth)?;
            }
        }

        if let BoundaryConfig::Ceiling {
            height,
            half_width,
            half_depth,
            wall_damping,
            restoring_strength,
        } = &self.boundary
        {
            check_finite(&format!("{name}.boundary.height"), *height)?;
            check_non_negative(&format!("{name}.boundary.half_width"), *half_width)?;
            check_non_negative(&format!("{name}.boundary.half_depth"), *half_depth)?;
            check_range(&format!("{name}.boundary.wall_damping"), *wall_damping, 0.0, 1.0)?;
            check_non_negative(
                &format!("{name}.boundary.restoring_strength"),
                *restoring_strength,
            )?;
        }

        check_curve(&format!("{name}.size_curve"), &self.size_curve)?;
        check_curve(&format!("{name}.alpha_curve"), &self.alpha_curve)?;
        check_curve(&format!("{name}.color_normal"), &self.color_normal)?;
        check_curve(&format!("{name}.color_suppressed"), &self.color_suppressed)?;
        Ok(())
    }
}

/// Dynamic fire light flicker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Light intensity at full fire
    pub base_intensity: f32,
    /// Relative amplitude of the sinusoidal flicker
    pub flicker_amplitude: f32,
    /// Flicker angular frequency in radians per second
    pub flicker_frequency: f32,
    /// Relative amplitude of the random flicker
    pub jitter: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            base_intensity: 2.5,
            flicker_amplitude: 0.15,
            flicker_frequency: 12.0,
            jitter: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    pub flame: PlumeConfig,
    pub rising_smoke: PlumeConfig,
    pub ceiling_smoke: PlumeConfig,
    pub light: LightConfig,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            flame: PlumeConfig::flame(),
            rising_smoke: PlumeConfig::rising_smoke(),
            ceiling_smoke: PlumeConfig::ceiling_smoke(),
            light: LightConfig::default(),
        }
    }
}

/// Foam spray from the extinguisher nozzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamConfig {
    pub rate: f32,
    pub max_particles: Option<usize>,
    pub life_min: f32,
    pub life_max: f32,
    /// Exit speed along the nozzle axis
    pub speed: f32,
    /// Relative random speed variation, `speed * (1 ± jitter)`
    pub speed_jitter: f32,
    /// Half-angle of the spray cone in degrees
    pub cone_angle: f32,
    pub nozzle_radius: f32,
    pub gravity: f32,
    pub drag: f32,
    pub turbulence: f32,
    /// Age after which airborne foam starts spreading sideways
    pub spread_age_threshold: f32,
    pub spread_strength: f32,
    pub floor_y: f32,
    /// Height above the floor at which grounded foam is pinned
    pub floor_epsilon: f32,
    /// Share of impact speed converted into horizontal spread
    pub ground_spread: f32,
    pub restitution: f32,
    pub ground_drag: f32,
    /// Puddle size growth per second on the ground
    pub puddle_growth: f32,
    pub puddle_max_scale: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub grounded_alpha_scale: f32,
    pub rotation_rate_max: f32,
    pub color: Rgb,
}

impl Default for FoamConfig {
    fn default() -> Self {
        Self {
            rate: 300.0,
            max_particles: None,
            life_min: 1.5,
            life_max: 2.5,
            speed: 8.0,
            speed_jitter: 0.15,
            cone_angle: 8.0,
            nozzle_radius: 0.02,
            gravity: -4.0,
            drag: 0.8,
            turbulence: 1.5,
            spread_age_threshold: 0.25,
            spread_strength: 2.0,
            floor_y: 0.0,
            floor_epsilon: 0.01,
            ground_spread: 1.0,
            restitution: 0.05,
            ground_drag: 4.0,
            puddle_growth: 0.8,
            puddle_max_scale: 2.5,
            size_start: 0.04,
            size_end: 0.3,
            grounded_alpha_scale: 0.7,
            rotation_rate_max: 2.0,
            color: Rgb::new(0.95, 0.97, 1.0),
        }
    }
}

impl FoamConfig {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("foam.rate", self.rate)?;
        check_positive("foam.life_min", self.life_min)?;
        check_ordered("foam.life", self.life_min, self.life_max)?;
        check_non_negative("foam.speed", self.speed)?;
        check_range("foam.speed_jitter", self.speed_jitter, 0.0, 1.0)?;
        check_range("foam.cone_angle", self.cone_angle, 0.0, 180.0)?;
        check_non_negative("foam.nozzle_radius", self.nozzle_radius)?;
        check_finite("foam.gravity", self.gravity)?;
        check_non_negative("foam.drag", self.drag)?;
        check_non_negative("foam.turbulence", self.turbulence)?;
        check_range("foam.spread_age_threshold", self.spread_age_threshold, 0.0, 1.0)?;
        check_non_negative("foam.spread_strength", self.spread_strength)?;
        check_finite("foam.floor_y", self.floor_y)?;
        check_non_negative("foam.floor_epsilon", self.floor_epsilon)?;
        check_non_negative("foam.ground_spread", self.ground_spread)?;
        check_range("foam.restitution", self.restitution, 0.0, 1.0)?;
        check_non_negative("foam.ground_drag", self.ground_drag)?;
        check_non_negative("foam.puddle_growth", self.puddle_growth)?;
        check_range("foam.puddle_max_scale", self.puddle_max_scale, 1.0, f32::MAX)?;
        check_non_negative("foam.size_start", self.size_start)?;
        check_non_negative("foam.size_end", self.size_end)?;
        check_range("foam.grounded_alpha_scale", self.grounded_alpha_scale, 0.0, 1.0)?;
        check_non_negative("foam.rotation_rate_max", self.rotation_rate_max)?;
        Ok(())
    }
}

/// Foam-on-fire coupling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub initial_intensity: f32,
    /// Foam closer than this to the fire anchor counts as hitting the fire
    pub detection_radius: f32,
    /// Suppression only happens while more than this many foam particles are in range
    pub min_particles: usize,
    /// Intensity lost per second under sustained foam contact
    pub suppression_rate: f32,
    /// Intensity at or below which the fire is reported extinguished
    pub extinguish_threshold: f32,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            initial_intensity: 1.0,
            detection_radius: 1.0,
            min_particles: 5,
            suppression_rate: 0.25,
            extinguish_threshold: 0.05,
        }
    }
}

impl SuppressionConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("suppression.initial_intensity", self.initial_intensity, 0.0, 1.0)?;
        check_positive("suppression.detection_radius", self.detection_radius)?;
        check_non_negative("suppression.suppression_rate", self.suppression_rate)?;
        check_range(
            "suppression.extinguish_threshold",
            self.extinguish_threshold,
            0.0,
            1.0,
        )?;
        if self.initial_intensity <= self.extinguish_threshold {
            return Err(QuenchError::InvalidConfig(format!(
                "suppression.initial_intensity ({}) must be above extinguish_threshold ({})",
                self.initial_intensity, self.extinguish_threshold
            )));
        }
        Ok(())
    }
}

/// Render-side bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Re-sort plume particles back-to-front every this many ticks
    pub sort_interval: u32,
    /// Pool over-provisioning factor for rate-derived capacities
    pub pool_headroom: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sort_interval: 6,
            pool_headroom: 1.2,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sort_interval == 0 {
            return Err(QuenchError::InvalidConfig(
                "render.sort_interval must be at least 1".into(),
            ));
        }
        check_range("render.pool_headroom", self.pool_headroom, 1.0, 16.0)?;
        Ok(())
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fire: FireConfig,
    pub foam: FoamConfig,
    pub suppression: SuppressionConfig,
    pub render: RenderConfig,
}

impl SimulationConfig {
    /// Parse a TOML document, layering it over the defaults, and validate.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let overlay: toml::Value = toml::from_str(source)?;
        let mut merged = toml::Value::try_from(Self::default())?;
        merge(&mut merged, overlay);
        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.fire.flame.validate("fire.flame")?;
        self.fire.rising_smoke.validate("fire.rising_smoke")?;
        self.fire.ceiling_smoke.validate("fire.ceiling_smoke")?;
        let light = &self.fire.light;
        check_non_negative("fire.light.base_intensity", light.base_intensity)?;
        check_non_negative("fire.light.flicker_amplitude", light.flicker_amplitude)?;
        check_non_negative("fire.light.flicker_frequency", light.flicker_frequency)?;
        check_non_negative("fire.light.jitter", light.jitter)?;
        self.foam.validate()?;
        self.suppression.validate()?;
        self.render.validate()?;

        let headroom = self.render.pool_headroom;
        for (name, plume) in [
            ("fire.flame", &self.fire.flame),
            ("fire.rising_smoke", &self.fire.rising_smoke),
            ("fire.ceiling_smoke", &self.fire.ceiling_smoke),
        ] {
            pool_capacity(name, plume.rate, plume.life_max, headroom, plume.max_particles)?;
        }
        let foam = &self.foam;
        pool_capacity("foam", foam.rate, foam.life_max, headroom, foam.max_particles)?;
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn curve<T: quench_core::Lerp + Copy>(keys: &[Keyframe<T>]) -> Result<Spline<T>> {
    Spline::new(keys.iter().map(|k| (k.t, k.value)).collect())
}

// ── Validation helpers ──

fn check_finite(field: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QuenchError::InvalidConfig(format!(
            "{field} must be a finite number, got {value}"
        )))
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(QuenchError::out_of_range(field, min, max, value));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f32) -> Result<()> {
    check_range(field, value, 0.0, f32::MAX)
}

fn check_positive(field: &str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(QuenchError::InvalidConfig(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

fn check_ordered(field: &str, min: f32, max: f32) -> Result<()> {
    check_finite(field, max)?;
    if max < min {
        return Err(QuenchError::InvalidConfig(format!(
            "{field}: max ({max}) is below min ({min})"
        )));
    }
    Ok(())
}

fn check_vec(field: &str, v: Vec3) -> Result<()> {
    check_finite(field, v.x)?;
    check_finite(field, v.y)?;
    check_finite(field, v.z)
}

fn check_curve<T>(field: &str, keys: &[Keyframe<T>]) -> Result<()> {
    if keys.is_empty() {
        return Err(QuenchError::InvalidConfig(format!(
            "{field} needs at least one keyframe"
        )));
    }
    for k in keys {
        check_finite(field, k.t)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert!(config.fire.flame.rate > 0.0);
        assert!(config.fire.flame.life_max >= config.fire.flame.life_min);
        assert_eq!(config.render.sort_interval, 6);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let source = r#"
[foam]
rate = 120
gravity = -6

[fire.rising_smoke]
rate = 10.0

[suppression]
suppression_rate = 0.5
"#;
        let config = SimulationConfig::from_toml_str(source).unwrap();
        assert!((config.foam.rate - 120.0).abs() < 1e-6);
        assert!((config.foam.gravity + 6.0).abs() < 1e-6);
        // Untouched foam keys keep their defaults
        assert!((config.foam.speed - 8.0).abs() < 1e-6);
        // Plume overrides keep the plume's own defaults, not another plume's
        let smoke = &config.fire.rising_smoke;
        assert!((smoke.rate - 10.0).abs() < 1e-6);
        assert_eq!(smoke.life_min, PlumeConfig::rising_smoke().life_min);
        assert_eq!(
            smoke.intensity_response,
            IntensityResponse::Offset { threshold: 0.1 }
        );
        assert_eq!(config.fire.flame, PlumeConfig::flame());
        assert!((config.suppression.suppression_rate - 0.5).abs() < 1e-6);
    }

    #[test]
    fn curves_and_geometry_parse() {
        let source = r#"
[fire.flame]
alpha_curve = [{ t = 0.0, value = 1.0 }, { t = 1, value = 0 }]
color_normal = [{ t = 0.0, value = [1.0, 0.0, 0.0] }]

[fire.flame.spawn]
kind = "ceiling_band"
height = 2.5
width = 4
depth = 4
"#;
        let config = SimulationConfig::from_toml_str(source).unwrap();
        let flame = &config.fire.flame;
        assert_eq!(flame.alpha_curve.len(), 2);
        assert_eq!(flame.color_normal[0].value, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(
            flame.spawn,
            SpawnGeometryConfig::CeilingBand {
                height: 2.5,
                width: 4.0,
                depth: 4.0
            }
        );
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err = SimulationConfig::from_toml_str("[foam]\nrate = -1.0\n").unwrap_err();
        assert!(matches!(err, QuenchError::ValueOutOfRange { ref field, .. } if field == "foam.rate"));
    }

    #[test]
    fn zero_life_is_rejected() {
        let mut config = SimulationConfig::default();
        config.fire.flame.life_min = 0.0;
        assert!(matches!(
            config.validate(),
            Err(QuenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_range_and_empty_curve_are_rejected() {
        let mut config = SimulationConfig::default();
        config.fire.rising_smoke.size_max = 0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.fire.ceiling_smoke.alpha_curve.clear();
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.render.sort_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn pools_beyond_the_slot_limit_are_rejected() {
        let err = SimulationConfig::from_toml_str("[fire.flame]\nrate = 1e30\n").unwrap_err();
        assert!(
            matches!(err, QuenchError::ValueOutOfRange { ref field, .. } if field == "fire.flame.rate")
        );

        let err = SimulationConfig::from_toml_str("[foam]\nmax_particles = 2000000\n").unwrap_err();
        assert!(
            matches!(err, QuenchError::ValueOutOfRange { ref field, .. } if field == "foam.max_particles")
        );
    }

    #[test]
    fn foam_pool_defaults_to_rate_sizing() {
        let config = SimulationConfig::default();
        assert_eq!(config.foam.max_particles, None);
        let config = SimulationConfig::from_toml_str("[foam]\nmax_particles = 64\n").unwrap();
        assert_eq!(config.foam.max_particles, Some(64));
    }

    #[test]
    fn fire_must_start_above_extinguish_threshold() {
        let source = "[suppression]\ninitial_intensity = 0.05\nextinguish_threshold = 0.05\n";
        let err = SimulationConfig::from_toml_str(source).unwrap_err();
        assert!(matches!(err, QuenchError::InvalidConfig(_)));

        let source = "[suppression]\ninitial_intensity = 0.5\nextinguish_threshold = 0.4\n";
        assert!(SimulationConfig::from_toml_str(source).is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimulationConfig::from_toml_str("[foam\nrate = 1").unwrap_err();
        assert!(matches!(err, QuenchError::TomlParseError(_)));
    }

    #[test]
    fn dump_round_trips() {
        let config = SimulationConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = SimulationConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
