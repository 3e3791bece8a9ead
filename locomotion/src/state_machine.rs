/*!
Locomotion state machine.

Transitions are a pure function of the current state and a [`TransitionInputs`] snapshot
gathered once per tick after the sensors ran. Side effects live only in the enter/exit
hooks of [`LocomotionStateMachine`].

Rules (first match wins)

| State  | Rules |
|--------|-------|
| Idle   | fell -> Fall; crouch -> Crouch; jump -> Jump; move+run -> Run; move -> Walk |
| Walk   | fell -> Fall; crouch -> Crouch; jump -> Jump; no move -> Idle; run -> Run |
| Run    | fell -> Fall; crouch -> Crouch; jump -> Jump; no move -> Idle; !run -> Walk |
| Crouch | fell -> Fall; crouch toggle with headroom -> Run / Walk / Idle |
| Jump   | landed -> Crouch / Run / Walk / Idle |
| Fall   | landed -> Crouch / Run / Walk / Idle; jump -> Jump |

"fell" is `!grounded && falling`, "landed" is `grounded && vertical_velocity <= 0`, and
"jump" is a requested (pressed or buffered) jump that is currently allowed.
*/

use crate::controller::Handlers;
use crate::query::CollisionQuery;
use crate::types::{InputIntent, LocomotionState, MovementContext};

/// Everything a transition decision depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionInputs {
    pub grounded: bool,
    pub falling: bool,
    pub vertical_velocity: f32,
    pub has_move: bool,
    pub run_held: bool,
    pub crouch_pressed: bool,
    /// Collider currently in (or heading to) the crouch posture.
    pub crouching: bool,
    pub jump_requested: bool,
    /// Coyote time left, cooldown over and headroom for the jump.
    pub can_jump: bool,
    /// Headroom to stand up from a crouch.
    pub can_stand: bool,
}

impl TransitionInputs {
    #[inline]
    fn fell(&self) -> bool {
        !self.grounded && self.falling
    }

    #[inline]
    fn landed(&self) -> bool {
        self.grounded && self.vertical_velocity <= 0.0
    }

    #[inline]
    fn jump(&self) -> bool {
        self.jump_requested && self.can_jump
    }

    /// Grounded state picked from the input alone.
    fn by_input(&self) -> LocomotionState {
        if self.has_move && self.run_held {
            LocomotionState::Run
        } else if self.has_move {
            LocomotionState::Walk
        } else {
            LocomotionState::Idle
        }
    }

    /// Landing state: a crouch (held over from before, or pressed now) wins.
    fn on_landing(&self) -> LocomotionState {
        if self.crouching || self.crouch_pressed {
            LocomotionState::Crouch
        } else {
            self.by_input()
        }
    }
}

impl LocomotionState {
    /// Next state for `inputs`. Returns `self` when no rule fires.
    pub fn next(self, inputs: &TransitionInputs) -> LocomotionState {
        use LocomotionState::*;

        match self {
            Idle | Walk | Run if inputs.fell() => Fall,
            Idle | Walk | Run if inputs.crouch_pressed => Crouch,
            Idle | Walk | Run if inputs.jump() => Jump,
            Idle | Walk | Run => inputs.by_input(),

            Crouch if inputs.fell() => Fall,
            Crouch if inputs.crouch_pressed && inputs.can_stand => inputs.by_input(),
            Crouch => Crouch,

            Jump if inputs.landed() => inputs.on_landing(),
            Jump => Jump,

            Fall if inputs.landed() => inputs.on_landing(),
            Fall if inputs.jump() => Jump,
            Fall => Fall,
        }
    }

    /// States whose rules include a jump transition (and so consume the jump buffer).
    #[inline]
    pub fn accepts_jump(self) -> bool {
        matches!(
            self,
            LocomotionState::Idle
                | LocomotionState::Walk
                | LocomotionState::Run
                | LocomotionState::Fall
        )
    }
}

/// A state change taken during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Transition {
    pub from: LocomotionState,
    pub to: LocomotionState,
}

/// Owns the active state and runs enter/exit hooks and per-state updates.
#[derive(Clone, Debug, Default)]
pub struct LocomotionStateMachine {
    current: LocomotionState,
}

impl LocomotionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> LocomotionState {
        self.current
    }

    /// Gather inputs. Collision-backed checks only run when a rule could use them.
    pub fn gather<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
        handlers: &Handlers,
        input: &InputIntent,
    ) -> TransitionInputs {
        let jump_requested = self.current.accepts_jump() && handlers.jump.is_requested();
        let can_jump = jump_requested && handlers.jump.can_jump(query, context);
        let can_stand = self.current == LocomotionState::Crouch
            && input.crouch_pressed
            && handlers.crouch.can_stand_up(query, context);

        TransitionInputs {
            grounded: context.is_grounded,
            falling: context.is_falling,
            vertical_velocity: context.vertical_velocity,
            has_move: input.has_move(),
            run_held: input.run_held,
            crouch_pressed: input.crouch_pressed,
            crouching: context.is_crouching,
            jump_requested,
            can_jump,
            can_stand,
        }
    }

    /// Evaluate the rules once and switch state if one fires.
    pub fn check_switch_states<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        context: &mut MovementContext,
        handlers: &mut Handlers,
        input: &InputIntent,
    ) -> Option<Transition> {
        let inputs = self.gather(query, context, handlers, input);
        let next = self.current.next(&inputs);
        if next == self.current {
            return None;
        }

        let transition = Transition {
            from: self.current,
            to: next,
        };
        self.exit(query, context, handlers, transition.from);
        self.current = next;
        context.state = next;
        self.enter(context, handlers, transition.to);

        log::debug!("state {} -> {}", transition.from, transition.to);
        Some(transition)
    }

    fn exit<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &mut MovementContext,
        handlers: &mut Handlers,
        state: LocomotionState,
    ) {
        match state {
            LocomotionState::Crouch => {
                // Leaving by falling still tries to stand; blocked stays crouched.
                handlers.crouch.handle_stand_up(query, context);
            }
            LocomotionState::Jump => context.is_jumping = false,
            LocomotionState::Fall => context.is_falling = false,
            LocomotionState::Idle | LocomotionState::Walk | LocomotionState::Run => {}
        }
    }

    fn enter(
        &self,
        context: &mut MovementContext,
        handlers: &mut Handlers,
        state: LocomotionState,
    ) {
        match state {
            LocomotionState::Jump => {
                handlers.jump.perform_jump(context);
                handlers.ground.suppress();
            }
            LocomotionState::Crouch => handlers.crouch.handle_crouch(context),
            LocomotionState::Fall => context.is_falling = true,
            LocomotionState::Idle | LocomotionState::Walk | LocomotionState::Run => {}
        }
    }

    /// Per-state horizontal velocity for this tick.
    pub fn update_state(
        &self,
        context: &mut MovementContext,
        handlers: &Handlers,
        input: &InputIntent,
        dt: f32,
    ) {
        let loco = &handlers.locomotion;
        match self.current {
            LocomotionState::Idle => loco.approach(context, 0.0, dt),
            LocomotionState::Walk => loco.approach(context, loco.walk_speed(), dt),
            LocomotionState::Run => loco.approach(context, loco.run_speed(), dt),
            LocomotionState::Crouch => loco.approach(context, loco.crouch_speed(), dt),
            LocomotionState::Jump | LocomotionState::Fall => {
                loco.air_steer(context, input.run_held)
            }
        }
    }
}
