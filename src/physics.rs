use crate::particle::ParticleState;

/// Advances the bodies by one frame.
///
/// Implementations move bodies and change their velocities in place through
/// [`ParticleState::motions_mut`]. Radius, mass, color and the number and
/// order of bodies are fixed; colors and instances are matched to bodies by
/// index.
pub trait PhysicsStep {
    fn advance(&mut self, state: &mut ParticleState, dt: f32);
}

/// Leaves every body where it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct Frozen;

impl PhysicsStep for Frozen {
    fn advance(&mut self, _state: &mut ParticleState, _dt: f32) {}
}

/// Moves every body along its velocity. No forces, no collisions.
#[derive(Debug, Default, Clone, Copy)]
pub struct Drift;

impl PhysicsStep for Drift {
    fn advance(&mut self, state: &mut ParticleState, dt: f32) {
        for motion in state.motions_mut() {
            *motion.position += *motion.velocity * dt;
        }
    }
}

impl<P: PhysicsStep + ?Sized> PhysicsStep for Box<P> {
    fn advance(&mut self, state: &mut ParticleState, dt: f32) {
        (**self).advance(state, dt)
    }
}
