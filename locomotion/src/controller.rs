use crate::config::LocomotionConfig;
use crate::coyote::CoyoteTimer;
use crate::crouch::CrouchController;
use crate::error::ConfigError;
use crate::gravity::GravityIntegrator;
use crate::jump::JumpController;
use crate::motion::LocomotionIntegrator;
use crate::query::CollisionQuery;
use crate::sensors::{GroundSensor, StepSensor};
use crate::snapshot::{MovementSnapshot, TickReport};
use crate::state_machine::LocomotionStateMachine;
use crate::types::{InputIntent, LocomotionState, MovementContext, Point3, Vec3, ViewBasis};

/// The sensors and controllers driven by one [`MovementController`].
#[derive(Clone, Debug)]
pub struct Handlers {
    pub ground: GroundSensor,
    pub step: StepSensor,
    pub gravity: GravityIntegrator,
    pub coyote: CoyoteTimer,
    pub jump: JumpController,
    pub crouch: CrouchController,
    pub locomotion: LocomotionIntegrator,
}

impl Handlers {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            ground: GroundSensor::new(config),
            step: StepSensor::new(config),
            gravity: GravityIntegrator::new(config),
            coyote: CoyoteTimer::new(config),
            jump: JumpController::new(config),
            crouch: CrouchController::new(config),
            locomotion: LocomotionIntegrator::new(config),
        }
    }
}

/// First-person locomotion for one actor.
///
/// Owns the actor's [`MovementContext`] and runs every component in a fixed order each
/// tick:
///
/// 1. input timers (jump buffer, cooldown, ground suppression)
/// 2. ground sensor, coyote timer, step sensor
/// 3. state transition check, then the active state's planar velocity
/// 4. gravity and slope sliding, in fixed `fixed_dt` steps
/// 5. crouch interpolation
/// 6. displacement through the collision query's move primitive
///
/// The controller never owns the world. Each tick borrows a [`CollisionQuery`].
#[derive(Clone, Debug)]
pub struct MovementController {
    config: LocomotionConfig,
    context: MovementContext,
    handlers: Handlers,
    machine: LocomotionStateMachine,
}

impl MovementController {
    /// Validate `config` and place a standing, idle actor with its feet at `spawn`.
    pub fn new(config: LocomotionConfig, spawn: Point3) -> Result<Self, ConfigError> {
        config.validate()?;
        let context = MovementContext::new(
            spawn,
            config.radius,
            config.standing_height,
            config.standing_camera_height,
        );
        let handlers = Handlers::new(&config);
        Ok(Self {
            config,
            context,
            handlers,
            machine: LocomotionStateMachine::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    #[inline]
    pub fn context(&self) -> &MovementContext {
        &self.context
    }

    #[inline]
    pub fn state(&self) -> LocomotionState {
        self.machine.current()
    }

    #[inline]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn snapshot(&self) -> MovementSnapshot {
        MovementSnapshot::from(&self.context)
    }

    /// Move the actor's feet to `position` and drop all velocity.
    pub fn teleport(&mut self, position: Point3) {
        self.context.position = position;
        self.context.horizontal_velocity = Vec3::zeros();
        self.context.slide_velocity = Vec3::zeros();
        self.context.vertical_velocity = 0.0;
        self.context.vertical_displacement = 0.0;
        self.context.body_grounded = false;
    }

    /// Advance the actor by `dt` seconds.
    ///
    /// A non-finite or non-positive `dt` skips the tick and leaves all state untouched.
    pub fn tick<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        input: &InputIntent,
        view: &ViewBasis,
        dt: f32,
    ) -> TickReport {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("skipping locomotion tick with dt = {dt}");
            return TickReport {
                simulated: false,
                transition: None,
                snapshot: self.snapshot(),
            };
        }

        let Self {
            context,
            handlers,
            machine,
            ..
        } = self;

        handlers.jump.register_input(input, dt);
        handlers.ground.tick(dt);
        context.move_direction = LocomotionIntegrator::move_direction(view, input);

        handlers.ground.refresh(query, context);
        handlers.coyote.update(context, dt);
        handlers.step.refresh(query, context);

        let transition = machine.check_switch_states(query, context, handlers, input);
        machine.update_state(context, handlers, input, dt);

        handlers.gravity.step(query, context, dt);
        handlers.crouch.update(context, dt);
        handlers.locomotion.apply(query, context, dt);

        TickReport {
            simulated: true,
            transition,
            snapshot: self.snapshot(),
        }
    }
}
