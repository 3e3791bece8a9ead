/*!
First-person character locomotion.

A tick-driven controller that turns per-frame input intents into a moved body: multi-ray
ground detection, step and slope handling, gravity, coyote-time jumping, crouching and a
six-state locomotion machine (Idle, Walk, Run, Jump, Fall, Crouch).

- sensors:        ground and step probing
- gravity:        vertical velocity and slope sliding
- coyote, jump:   jump eligibility, buffering and impulse
- crouch:         crouch posture and stand-up headroom
- motion:         planar velocity and the final displacement
- state_machine:  transition rules and per-state updates
- controller:     the per-actor orchestrator
- query:          the collision seam; `rapier_world` / `rapier_query` implement it on Rapier
*/

pub mod config;
pub mod constants;
pub mod controller;
pub mod coyote;
pub mod crouch;
pub mod error;
pub mod gravity;
pub mod jump;
pub mod motion;
pub mod query;
pub mod rapier_query;
pub mod rapier_world;
pub mod sensors;
pub mod snapshot;
pub mod state_machine;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export Rapier so hosts can build statics without depending on `rapier3d` directly.
pub use rapier3d;

pub use config::LocomotionConfig;
pub use controller::{Handlers, MovementController};
pub use coyote::CoyoteTimer;
pub use crouch::CrouchController;
pub use error::ConfigError;
pub use gravity::GravityIntegrator;
pub use jump::JumpController;
pub use motion::LocomotionIntegrator;
pub use query::CollisionQuery;
pub use rapier_query::{BodySettings, RapierCollisionQuery};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use sensors::{GroundSensor, StepSensor};
pub use snapshot::{MovementSnapshot, TickReport};
pub use state_machine::{LocomotionStateMachine, Transition, TransitionInputs};
pub use types::{
    CapsuleSpec, GroundSample, InputIntent, LocomotionState, MoveOutcome, MovementContext,
    Point3, QueryHit, StepDecision, UnitVec3, Vec2, Vec3, ViewBasis,
};
