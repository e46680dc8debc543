//! Frame-at-a-time driver tying the particle state to a renderer.

use glam::{Mat4, Vec4};
use log::{debug, error, info};

use crate::{instance::InstanceBuffer, particle::ParticleState, physics::PhysicsStep};

/// The rendering side of the loop: receives instance streams and draws them.
pub trait InstanceSink {
    type Error: std::error::Error;

    /// Replaces the instance transform stream.
    fn write_matrices(&mut self, matrices: &[Mat4]);

    /// Replaces the instance color stream.
    fn write_colors(&mut self, colors: &[Vec4]);

    /// Draws `instance_count` instances and presents the frame.
    ///
    /// A sink that has nothing to present this time around (a surface being
    /// resized, say) returns [`Presentation::Skipped`] instead of an error.
    fn submit(&mut self, instance_count: u32) -> Result<Presentation, Self::Error>;
}

/// What became of a frame handed to [`InstanceSink::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Presented,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame.
    Continue,
    /// The loop is over, don't schedule anything.
    Stopped,
}

pub struct RenderLoop<P> {
    state: ParticleState,
    instances: InstanceBuffer,
    physics: P,

    paused: bool,
    step: bool,
    stopped: bool,
    frame: u64,
}

impl<P: PhysicsStep> RenderLoop<P> {
    pub fn new(state: ParticleState, base_radius: f32, physics: P) -> Self {
        let instances = InstanceBuffer::build_initial(&state, base_radius);

        Self {
            state,
            instances,
            physics,

            paused: false,
            step: false,
            stopped: false,
            frame: 0,
        }
    }

    /// Runs exactly one frame: physics, transform sync, upload of the dirty
    /// streams, then submission.
    ///
    /// A failed submission stops the loop for good and is handed back to the
    /// caller.
    pub fn step<S: InstanceSink>(&mut self, sink: &mut S, dt: f32) -> Result<FrameStatus, S::Error> {
        if self.stopped {
            return Ok(FrameStatus::Stopped);
        }

        if !self.paused || self.step {
            self.physics.advance(&mut self.state, dt);
            self.step = false;
        }

        self.instances.sync_frame(&self.state);

        let dirty = self.instances.take_dirty();
        if dirty.matrix {
            sink.write_matrices(self.instances.matrices());
        }
        if dirty.color {
            sink.write_colors(self.state.colors());
        }

        match sink.submit(self.instances.len() as u32) {
            Ok(Presentation::Presented) => self.frame += 1,
            Ok(Presentation::Skipped) => debug!("Frame {} skipped by the sink", self.frame),
            Err(e) => {
                error!("Frame {} failed to submit, stopping: {e}", self.frame);
                self.stopped = true;
                return Err(e);
            }
        }

        Ok(FrameStatus::Continue)
    }

    pub fn stop(&mut self) {
        if !self.stopped {
            info!("Render loop stopped after {} frames", self.frame);
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance the physics once on the next frame even while paused.
    pub fn request_step(&mut self) {
        self.step = true;
    }

    /// Frames presented so far. Skipped frames don't count.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SimConfig,
        particle::generate_particles_with,
        physics::{Drift, Frozen},
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::fmt;

    #[derive(Debug)]
    struct DeviceLost;

    impl fmt::Display for DeviceLost {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "device lost")
        }
    }

    impl std::error::Error for DeviceLost {}

    #[derive(Debug, PartialEq)]
    enum Call {
        Matrices(Vec<Mat4>),
        Colors(usize),
        Submit(u32),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
        fail_submit: bool,
        skip_submit: bool,
    }

    impl InstanceSink for RecordingSink {
        type Error = DeviceLost;

        fn write_matrices(&mut self, matrices: &[Mat4]) {
            self.calls.push(Call::Matrices(matrices.to_vec()));
        }

        fn write_colors(&mut self, colors: &[Vec4]) {
            self.calls.push(Call::Colors(colors.len()));
        }

        fn submit(&mut self, instance_count: u32) -> Result<Presentation, DeviceLost> {
            self.calls.push(Call::Submit(instance_count));
            if self.fail_submit {
                Err(DeviceLost)
            } else if self.skip_submit {
                Ok(Presentation::Skipped)
            } else {
                Ok(Presentation::Presented)
            }
        }
    }

    fn swarm(particles: u32) -> ParticleState {
        let config = SimConfig {
            particles,
            ..Default::default()
        };
        generate_particles_with(&config, &mut StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn first_frame_uploads_both_streams_then_only_matrices() {
        let mut render_loop = RenderLoop::new(swarm(8), 0.3, Frozen);
        let mut sink = RecordingSink::default();

        assert_eq!(render_loop.step(&mut sink, 0.016).unwrap(), FrameStatus::Continue);
        assert!(matches!(sink.calls[0], Call::Matrices(_)));
        assert_eq!(sink.calls[1], Call::Colors(8));
        assert_eq!(sink.calls[2], Call::Submit(8));

        sink.calls.clear();
        render_loop.step(&mut sink, 0.016).unwrap();
        assert_eq!(sink.calls.len(), 2);
        assert!(matches!(sink.calls[0], Call::Matrices(_)));
        assert_eq!(sink.calls[1], Call::Submit(8));
        assert_eq!(render_loop.frame(), 2);
    }

    #[test]
    fn physics_runs_before_sync() {
        let mut render_loop = RenderLoop::new(swarm(4), 0.3, Drift);
        let mut sink = RecordingSink::default();
        render_loop.step(&mut sink, 1.0).unwrap();

        let Call::Matrices(matrices) = &sink.calls[0] else {
            panic!("expected matrices first, got {:?}", sink.calls[0]);
        };
        for (matrix, body) in matrices.iter().zip(render_loop.state().bodies()) {
            assert_eq!(matrix.w_axis.truncate(), body.position);
        }
    }

    #[test]
    fn paused_loop_only_steps_on_request() {
        let mut render_loop = RenderLoop::new(swarm(4), 0.3, Drift);
        let mut sink = RecordingSink::default();
        let start = render_loop.state().clone();

        render_loop.toggle_pause();
        render_loop.step(&mut sink, 1.0).unwrap();
        assert_eq!(render_loop.state(), &start);

        render_loop.request_step();
        render_loop.step(&mut sink, 1.0).unwrap();
        let stepped = render_loop.state().clone();
        assert_ne!(stepped, start);

        render_loop.step(&mut sink, 1.0).unwrap();
        assert_eq!(render_loop.state(), &stepped);
    }

    #[test]
    fn failed_submit_stops_rescheduling() {
        let mut render_loop = RenderLoop::new(swarm(4), 0.3, Frozen);
        let mut sink = RecordingSink {
            fail_submit: true,
            ..Default::default()
        };

        assert!(render_loop.step(&mut sink, 0.016).is_err());
        assert!(render_loop.is_stopped());

        sink.calls.clear();
        assert_eq!(render_loop.step(&mut sink, 0.016).unwrap(), FrameStatus::Stopped);
        assert!(sink.calls.is_empty());
        assert_eq!(render_loop.frame(), 0);
    }

    #[test]
    fn skipped_frames_keep_running_but_are_not_counted() {
        let mut render_loop = RenderLoop::new(swarm(4), 0.3, Drift);
        let mut sink = RecordingSink {
            skip_submit: true,
            ..Default::default()
        };

        for _ in 0..3 {
            assert_eq!(render_loop.step(&mut sink, 1.0).unwrap(), FrameStatus::Continue);
        }
        assert_eq!(render_loop.frame(), 0);
        assert!(!render_loop.is_stopped());
        // physics and sync still ran for every skipped frame
        assert_eq!(
            sink.calls.iter().filter(|c| matches!(c, Call::Matrices(_))).count(),
            3
        );

        sink.skip_submit = false;
        render_loop.step(&mut sink, 1.0).unwrap();
        assert_eq!(render_loop.frame(), 1);
    }

    #[test]
    fn empty_swarm_still_renders() {
        let mut render_loop = RenderLoop::new(ParticleState::default(), 0.3, Drift);
        let mut sink = RecordingSink::default();
        render_loop.step(&mut sink, 0.016).unwrap();
        assert_eq!(sink.calls.last(), Some(&Call::Submit(0)));
    }
}
