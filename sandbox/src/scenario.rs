//! Scenario files: a static world, a spawn point and a script of input segments.

use std::path::{Path, PathBuf};

use locomotion::{
    ColliderShapeDef, ConfigError, InputIntent, LocomotionConfig, Point3, Vec2, ViewBasis,
    WorldStaticDef,
};
use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,

    /// Camera yaw (degrees about +Y, 0 looks down +Z) unless a segment overrides it.
    #[serde(default)]
    pub camera_yaw_deg: f32,

    #[serde(default)]
    pub config: LocomotionConfig,

    #[serde(default)]
    pub actor: ActorSpec,

    #[serde(default)]
    pub statics: Vec<StaticSpec>,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

fn default_tick_rate() -> f32 {
    60.0
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorSpec {
    /// Feet position.
    #[serde(default)]
    pub spawn: [f32; 3],
}

impl ActorSpec {
    pub fn spawn_point(&self) -> Point3 {
        Point3::new(self.spawn[0], self.spawn[1], self.spawn[2])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticSpec {
    pub id: u32,
    pub shape: ShapeSpec,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler angles (roll about X, pitch about Y, yaw about Z) in degrees.
    #[serde(default)]
    pub rotation_deg: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    Plane {
        #[serde(default)]
        offset: f32,
    },
    Cuboid {
        half_extents: [f32; 3],
    },
    Sphere {
        radius: f32,
    },
    Capsule {
        radius: f32,
        half_height: f32,
    },
    Cylinder {
        radius: f32,
        half_height: f32,
    },
    Cone {
        radius: f32,
        half_height: f32,
    },
    RoundCuboid {
        half_extents: [f32; 3],
        border_radius: f32,
    },
    RoundCylinder {
        radius: f32,
        half_height: f32,
        border_radius: f32,
    },
    RoundCone {
        radius: f32,
        half_height: f32,
        border_radius: f32,
    },
}

impl From<&ShapeSpec> for ColliderShapeDef {
    fn from(shape: &ShapeSpec) -> Self {
        let v = |a: [f32; 3]| Vector3::new(a[0], a[1], a[2]);
        match *shape {
            ShapeSpec::Plane { offset } => ColliderShapeDef::Plane {
                offset_along_normal: offset,
            },
            ShapeSpec::Cuboid { half_extents } => ColliderShapeDef::Cuboid {
                half_extents: v(half_extents),
            },
            ShapeSpec::Sphere { radius } => ColliderShapeDef::Sphere { radius },
            ShapeSpec::Capsule {
                radius,
                half_height,
            } => ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            },
            ShapeSpec::Cylinder {
                radius,
                half_height,
            } => ColliderShapeDef::CylinderY {
                radius,
                half_height,
            },
            ShapeSpec::Cone {
                radius,
                half_height,
            } => ColliderShapeDef::ConeY {
                radius,
                half_height,
            },
            ShapeSpec::RoundCuboid {
                half_extents,
                border_radius,
            } => ColliderShapeDef::RoundCuboid {
                half_extents: v(half_extents),
                border_radius,
            },
            ShapeSpec::RoundCylinder {
                radius,
                half_height,
                border_radius,
            } => ColliderShapeDef::RoundCylinderY {
                radius,
                half_height,
                border_radius,
            },
            ShapeSpec::RoundCone {
                radius,
                half_height,
                border_radius,
            } => ColliderShapeDef::RoundConeY {
                radius,
                half_height,
                border_radius,
            },
        }
    }
}

impl StaticSpec {
    pub fn to_def(&self) -> WorldStaticDef {
        let [x, y, z] = self.translation;
        let [roll, pitch, yaw] = self.rotation_deg.map(f32::to_radians);
        WorldStaticDef::new(self.id, Vector3::new(x, y, z), (&self.shape).into())
            .with_rotation(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }
}

/// A span of constant input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Segment {
    /// Seconds.
    pub duration: f32,
    /// Camera-relative move axis: x = strafe right, y = forward.
    #[serde(rename = "move")]
    pub move_axis: [f32; 2],
    pub run: bool,
    /// Jump edge on the segment's first tick.
    pub jump: bool,
    /// Crouch toggle edge on the segment's first tick.
    pub crouch: bool,
    pub camera_yaw_deg: Option<f32>,
}

impl Segment {
    pub fn tick_count(&self, dt: f32) -> u32 {
        (self.duration / dt).round().max(0.0) as u32
    }

    pub fn input(&self, first_tick: bool) -> InputIntent {
        InputIntent {
            move_axis: Vec2::new(self.move_axis[0], self.move_axis[1]),
            run_held: self.run,
            jump_pressed: first_tick && self.jump,
            crouch_pressed: first_tick && self.crouch,
        }
    }

    pub fn view(&self, default_yaw_deg: f32) -> ViewBasis {
        ViewBasis::from_yaw(self.camera_yaw_deg.unwrap_or(default_yaw_deg).to_radians())
    }
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ScenarioError::Invalid(format!(
                "tick_rate must be > 0, got {}",
                self.tick_rate
            )));
        }
        if let Some(i) = self
            .segments
            .iter()
            .position(|s| !(s.duration.is_finite() && s.duration >= 0.0))
        {
            return Err(ScenarioError::Invalid(format!(
                "segment {i} has an invalid duration"
            )));
        }
        let mut ids: Vec<u32> = self.statics.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(ScenarioError::Invalid("static ids must be unique".into()));
        }
        self.config.validate()?;
        Ok(())
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    pub fn world_defs(&self) -> Vec<WorldStaticDef> {
        self.statics.iter().map(StaticSpec::to_def).collect()
    }
}
