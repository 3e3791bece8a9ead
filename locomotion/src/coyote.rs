use crate::config::LocomotionConfig;
use crate::types::MovementContext;

/// Grace period after leaving the ground during which a jump is still allowed.
///
/// The counter lives in [`MovementContext::coyote_counter`] so observers can see it; this
/// type only carries the configured maximum.
#[derive(Clone, Copy, Debug)]
pub struct CoyoteTimer {
    max: f32,
}

impl CoyoteTimer {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            max: config.coyote_time,
        }
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Reset to the maximum while grounded, otherwise count down to zero.
    pub fn update(&self, context: &mut MovementContext, dt: f32) {
        context.coyote_counter = if context.is_grounded {
            self.max
        } else {
            (context.coyote_counter - dt).max(0.0)
        };
    }

    #[inline]
    pub fn is_eligible(context: &MovementContext) -> bool {
        context.coyote_counter > 0.0
    }

    /// Spend the remaining grace period (a jump happened).
    #[inline]
    pub fn consume(context: &mut MovementContext) {
        context.coyote_counter = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::Point3;

    fn actor() -> MovementContext {
        MovementContext::new(Point3::origin(), 0.4, 1.8, 1.6)
    }

    #[test]
    fn grounded_resets_to_max() {
        let timer = CoyoteTimer::new(&LocomotionConfig::default());
        let mut ctx = actor();
        ctx.is_grounded = true;
        timer.update(&mut ctx, 0.016);
        assert_eq!(ctx.coyote_counter, timer.max());
        assert!(CoyoteTimer::is_eligible(&ctx));
    }

    #[test]
    fn airborne_expires_after_max() {
        let timer = CoyoteTimer::new(&LocomotionConfig::default());
        let mut ctx = actor();
        ctx.is_grounded = true;
        timer.update(&mut ctx, 0.01);

        ctx.is_grounded = false;
        timer.update(&mut ctx, 0.15);
        assert!(CoyoteTimer::is_eligible(&ctx));

        timer.update(&mut ctx, 0.06);
        assert_eq!(ctx.coyote_counter, 0.0);
        assert!(!CoyoteTimer::is_eligible(&ctx));
    }

    proptest! {
        #[test]
        fn counter_never_increases_while_airborne(steps in prop::collection::vec(0.0f32..0.1, 1..64)) {
            let timer = CoyoteTimer::new(&LocomotionConfig::default());
            let mut ctx = actor();
            ctx.is_grounded = true;
            timer.update(&mut ctx, 0.0);
            ctx.is_grounded = false;

            let mut previous = ctx.coyote_counter;
            for dt in steps {
                timer.update(&mut ctx, dt);
                prop_assert!(ctx.coyote_counter <= previous);
                prop_assert!(ctx.coyote_counter >= 0.0);
                previous = ctx.coyote_counter;
            }
        }
    }
}
