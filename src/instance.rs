//! Per-instance transforms derived from the particle state.

use glam::{Mat4, Vec3};

use crate::particle::ParticleState;

/// Which instance streams changed since they were last uploaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyStreams {
    pub matrix: bool,
    pub color: bool,
}

impl DirtyStreams {
    pub fn any(&self) -> bool {
        self.matrix || self.color
    }
}

/// One column-major 4x4 transform per body, applied to a shared sphere mesh
/// of radius `base_radius`.
///
/// The diagonal holds `radius / base_radius` and is written once on
/// construction. Only the translation column follows the bodies afterwards.
pub struct InstanceBuffer {
    matrices: Vec<Mat4>,
    base_radius: f32,
    dirty: DirtyStreams,
}

impl InstanceBuffer {
    /// Builds the transforms for `state`. Both streams start out dirty.
    pub fn build_initial(state: &ParticleState, base_radius: f32) -> Self {
        let matrices = state
            .bodies()
            .iter()
            .map(|body| {
                let mut matrix = Mat4::from_scale(Vec3::splat(body.radius / base_radius));
                matrix.w_axis = body.position.extend(1.0);
                matrix
            })
            .collect();

        Self {
            matrices,
            base_radius,
            dirty: DirtyStreams {
                matrix: true,
                color: true,
            },
        }
    }

    /// Copies current positions into the translation of every transform and
    /// flags the matrix stream for upload.
    pub fn sync_frame(&mut self, state: &ParticleState) {
        debug_assert_eq!(self.matrices.len(), state.len());

        for (matrix, body) in self.matrices.iter_mut().zip(state.bodies()) {
            matrix.w_axis.x = body.position.x;
            matrix.w_axis.y = body.position.y;
            matrix.w_axis.z = body.position.z;
        }

        self.dirty.matrix = true;
    }

    /// Returns the dirty streams and clears them.
    pub fn take_dirty(&mut self) -> DirtyStreams {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty(&self) -> DirtyStreams {
        self.dirty
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// 16 floats per instance, column-major.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.matrices)
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}
