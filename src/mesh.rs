//! Sphere mesh shared by every instance.

use std::collections::HashMap;

use glam::Vec3;

/// Subdivided icosahedron with all vertices on a sphere of the given radius.
///
/// Since the sphere is centered at the origin, a vertex position divided by
/// the radius is also its normal.
pub struct Icosphere {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Icosphere {
    pub fn new(radius: f32, subdivisions: u32) -> Self {
        let t = (1.0 + 5f32.sqrt()) / 2.0;
        let mut vertices: Vec<Vec3> = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ]
        .into_iter()
        .map(|v| Vec3::from_array(v).normalize())
        .collect();

        let mut faces: Vec<[u32; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..subdivisions {
            // edge (low, high) -> index of its midpoint
            let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
            let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Vec3>| {
                let key = (a.min(b), a.max(b));
                *midpoints.entry(key).or_insert_with(|| {
                    let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
                    vertices.push(mid);
                    vertices.len() as u32 - 1
                })
            };

            faces = faces
                .iter()
                .flat_map(|&[a, b, c]| {
                    let ab = midpoint(a, b, &mut vertices);
                    let bc = midpoint(b, c, &mut vertices);
                    let ca = midpoint(c, a, &mut vertices);
                    [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
                })
                .collect();
        }

        for vertex in &mut vertices {
            *vertex *= radius;
        }

        Self {
            vertices,
            indices: faces.into_iter().flatten().collect(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivision_counts() {
        for level in 0..4 {
            let sphere = Icosphere::new(1.0, level);
            let faces = 20 * 4usize.pow(level);
            assert_eq!(sphere.triangle_count(), faces);
            assert_eq!(sphere.vertices.len(), 10 * 4usize.pow(level) + 2);
        }
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let sphere = Icosphere::new(0.3, 3);
        for v in &sphere.vertices {
            assert!((v.length() - 0.3).abs() < 1e-5);
        }
        assert!(sphere
            .indices
            .iter()
            .all(|&i| (i as usize) < sphere.vertices.len()));
    }

    #[test]
    fn triangles_face_outward() {
        let sphere = Icosphere::new(1.0, 2);
        for tri in sphere.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| sphere.vertices[tri[k] as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(a + b + c) > 0.0);
        }
    }
}
