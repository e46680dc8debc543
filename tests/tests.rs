use std::f32::consts::PI;

use glam::{Mat4, Vec3, Vec4};
use rand::{rngs::StdRng, SeedableRng};
use sphere_swarm::{
    generate_particles, generate_particles_with, particle::sphere_mass, ConfigError, Drift,
    FrameStatus, InstanceBuffer, InstanceSink, Presentation, RenderLoop, SimConfig,
};

/// Sink that keeps a CPU copy of what would be on the GPU.
#[derive(Default)]
struct MirrorSink {
    matrices: Vec<Mat4>,
    colors: Vec<Vec4>,
    matrix_uploads: usize,
    color_uploads: usize,
    frames: u32,
}

impl InstanceSink for MirrorSink {
    type Error = std::io::Error;

    fn write_matrices(&mut self, matrices: &[Mat4]) {
        self.matrices = matrices.to_vec();
        self.matrix_uploads += 1;
    }

    fn write_colors(&mut self, colors: &[Vec4]) {
        self.colors = colors.to_vec();
        self.color_uploads += 1;
    }

    fn submit(&mut self, _instance_count: u32) -> Result<Presentation, std::io::Error> {
        self.frames += 1;
        Ok(Presentation::Presented)
    }
}

// ==================================================================================
// Generation scenarios
// ==================================================================================

#[test]
fn two_equal_spheres_in_an_80_box() {
    let config = SimConfig {
        particles: 2,
        min_radius: 0.3,
        max_radius: 0.3,
        box_size: 80.0,
        seed: Some(2024),
    };
    let state = generate_particles(&config).unwrap();
    assert_eq!(state.len(), 2);

    let extent = 40.0 - 1.1 * 0.3;
    for body in state.bodies() {
        assert_eq!(body.radius, 0.3);
        assert!((body.mass - 0.1131).abs() < 1e-4, "mass {}", body.mass);
        assert!((body.mass - 4.0 / 3.0 * PI * 0.3f32.powi(3)).abs() < 1e-6);

        for c in body.position.to_array() {
            assert!(c.abs() <= extent + 1e-5);
        }

        let p = body.position;
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.velocity.x - 0.01 * r * p.z).abs() < 1e-5);
        assert!((body.velocity.z + 0.01 * r * p.x).abs() < 1e-5);
    }
}

#[test]
fn no_spheres_is_not_an_error() {
    let config = SimConfig {
        particles: 0,
        ..Default::default()
    };
    let state = generate_particles(&config).unwrap();
    assert!(state.is_empty());
    assert!(state.as_flat().is_empty());
    assert!(state.colors_flat().is_empty());

    let mut render_loop = RenderLoop::new(state, config.min_radius, Drift);
    let mut sink = MirrorSink::default();
    assert_eq!(
        render_loop.step(&mut sink, 0.016).unwrap(),
        FrameStatus::Continue
    );
    assert!(render_loop.instances().is_empty());
    assert!(sink.matrices.is_empty());
}

#[test]
fn inverted_radius_range_is_a_config_error() {
    let config = SimConfig {
        particles: 1_000_000,
        min_radius: 2.0,
        max_radius: 1.0,
        ..Default::default()
    };
    let err = generate_particles(&config).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidRadiusRange { min, max } if min == 2.0 && max == 1.0
    ));
}

#[test]
fn every_default_sphere_satisfies_its_invariants() {
    let config = SimConfig::default();
    let state = generate_particles_with(&config, &mut StdRng::seed_from_u64(77)).unwrap();

    for (body, color) in state.bodies().iter().zip(state.colors()) {
        assert!((config.min_radius..=config.max_radius).contains(&body.radius));
        assert!((body.mass - sphere_mass(body.radius)).abs() <= 1e-5 * body.mass);

        let extent = config.box_size / 2.0 - 1.1 * body.radius;
        assert!(body.position.abs().max_element() <= extent);

        assert_eq!(color.w, 1.0);
        assert!(color.truncate().cmpge(Vec3::ZERO).all());
        assert!(color.truncate().cmplt(Vec3::ONE).all());
    }
}

// ==================================================================================
// Instance sync
// ==================================================================================

#[test]
fn build_then_sync_leaves_translations_alone() {
    let state = generate_particles_with(&SimConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap();
    let mut instances = InstanceBuffer::build_initial(&state, 0.3);
    let built = instances.as_flat().to_vec();

    instances.sync_frame(&state);
    for i in 0..state.len() {
        assert_eq!(instances.as_flat()[16 * i + 12..16 * i + 15], built[16 * i + 12..16 * i + 15]);
    }
}

#[test]
fn scale_encodes_radius_over_base_radius() {
    let state = generate_particles_with(&SimConfig::default(), &mut StdRng::seed_from_u64(8)).unwrap();
    let instances = InstanceBuffer::build_initial(&state, 0.3);

    for (matrix, body) in instances.matrices().iter().zip(state.bodies()) {
        let scale = body.radius / 0.3;
        assert_eq!(matrix.x_axis.x, scale);
        assert_eq!(matrix.y_axis.y, scale);
        assert_eq!(matrix.z_axis.z, scale);
        assert_eq!(matrix.w_axis.w, 1.0);
    }
}

#[test]
fn gpu_mirror_tracks_drifting_bodies() {
    let config = SimConfig {
        particles: 32,
        seed: Some(3),
        ..Default::default()
    };
    let state = generate_particles(&config).unwrap();
    let colors = state.colors().to_vec();
    let mut render_loop = RenderLoop::new(state, config.min_radius, Drift);
    let mut sink = MirrorSink::default();

    for _ in 0..10 {
        render_loop.step(&mut sink, 0.5).unwrap();
    }

    assert_eq!(sink.frames, 10);
    assert_eq!(sink.matrix_uploads, 10);
    assert_eq!(sink.color_uploads, 1);
    assert_eq!(sink.colors, colors);

    for (matrix, body) in sink.matrices.iter().zip(render_loop.state().bodies()) {
        assert_eq!(matrix.w_axis.truncate(), body.position);
    }
}

// ==================================================================================
// Config files
// ==================================================================================

#[test]
fn bundled_scenes_load_and_validate() {
    let scenes = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenes");

    let swirl = SimConfig::load(&scenes.join("swirl.toml")).unwrap();
    assert_eq!(swirl, SimConfig::default());

    let pair = SimConfig::load(&scenes.join("pair.toml")).unwrap();
    assert!(pair.validate().is_ok());
    let state = generate_particles(&pair).unwrap();
    assert_eq!(state, generate_particles(&pair).unwrap());
}
