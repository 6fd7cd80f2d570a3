use bytemuck::{Pod, Zeroable};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Mesh vertex. `attrib.x` is 0 for the bell and 1 for tentacles,
/// `attrib.y` runs 0..1 from the crown (or tentacle root) outward.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub attrib: [f32; 2],
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

const BELL_RINGS: u32 = 24;
const BELL_SEGMENTS: u32 = 48;
const TENTACLE_SAMPLES: u32 = 32;
/// Bell height relative to its radius.
const BELL_FLATTEN: f32 = 0.8;
const SCALLOPS: f32 = 8.0;

/// Build the jellyfish: a flattened, scallop-rimmed dome plus `tentacles`
/// ribbons hanging from just inside the rim.
pub fn jellyfish_mesh(radius: f32, tentacles: u32, tentacle_length: f32) -> MeshData {
    let mut mesh = MeshData::default();
    push_bell(&mut mesh, radius);
    for i in 0..tentacles {
        let azimuth = TAU * i as f32 / tentacles.max(1) as f32;
        push_tentacle(&mut mesh, radius * 0.75, azimuth, tentacle_length);
    }
    mesh
}

fn push_bell(mesh: &mut MeshData, radius: f32) {
    let base = mesh.vertices.len() as u32;
    // Slightly past the equator so the rim curls under.
    let max_polar = FRAC_PI_2 * 1.1;

    for ring in 0..=BELL_RINGS {
        let v = ring as f32 / BELL_RINGS as f32;
        let polar = v * max_polar;
        for seg in 0..=BELL_SEGMENTS {
            let azimuth = TAU * seg as f32 / BELL_SEGMENTS as f32;
            let scallop = 1.0 + 0.06 * (azimuth * SCALLOPS).sin() * v.powi(4);
            let r = radius * scallop * polar.sin();
            let position = [
                r * azimuth.cos(),
                radius * BELL_FLATTEN * polar.cos(),
                r * azimuth.sin(),
            ];
            // Ellipsoid normal: gradient of x²/a² + y²/b² + z²/a².
            let n = glam::Vec3::new(
                position[0] / (radius * radius),
                position[1] / (radius * radius * BELL_FLATTEN * BELL_FLATTEN),
                position[2] / (radius * radius),
            )
            .normalize_or(glam::Vec3::Y);
            mesh.vertices.push(MeshVertex {
                position,
                normal: n.to_array(),
                attrib: [0.0, v],
            });
        }
    }

    let stride = BELL_SEGMENTS + 1;
    for ring in 0..BELL_RINGS {
        for seg in 0..BELL_SEGMENTS {
            let a = base + ring * stride + seg;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
}

fn push_tentacle(mesh: &mut MeshData, root_radius: f32, azimuth: f32, length: f32) {
    let base = mesh.vertices.len() as u32;
    let root = glam::Vec3::new(root_radius * azimuth.cos(), 0.0, root_radius * azimuth.sin());
    // Ribbon faces outward from the bell axis.
    let outward = glam::Vec3::new(azimuth.cos(), 0.0, azimuth.sin());
    let side = glam::Vec3::Y.cross(outward);

    for i in 0..=TENTACLE_SAMPLES {
        let along = i as f32 / TENTACLE_SAMPLES as f32;
        let width = 0.05 * (1.0 - along) + 0.005;
        let center = root - glam::Vec3::Y * (length * along);
        for s in [-1.0f32, 1.0] {
            let p = center + side * (width * s);
            mesh.vertices.push(MeshVertex {
                position: p.to_array(),
                normal: outward.to_array(),
                attrib: [1.0, along],
            });
        }
    }

    for i in 0..TENTACLE_SAMPLES {
        let a = base + i * 2;
        mesh.indices.extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let mesh = jellyfish_mesh(1.0, 12, 2.5);
        let bell_verts = (BELL_RINGS as usize + 1) * (BELL_SEGMENTS as usize + 1);
        let tentacle_verts = 12 * (TENTACLE_SAMPLES as usize + 1) * 2;
        assert_eq!(mesh.vertices.len(), bell_verts + tentacle_verts);

        let bell_indices = BELL_RINGS as usize * BELL_SEGMENTS as usize * 6;
        let tentacle_indices = 12 * TENTACLE_SAMPLES as usize * 6;
        assert_eq!(mesh.indices.len(), bell_indices + tentacle_indices);
    }

    #[test]
    fn indices_in_bounds() {
        let mesh = jellyfish_mesh(1.0, 16, 3.0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn large_tentacle_counts_index_past_u16() {
        let mesh = jellyfish_mesh(1.0, 1000, 2.0);
        let n = mesh.vertices.len() as u32;
        assert!(n > u16::MAX as u32);
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.iter().copied().max(), Some(n - 1));
    }

    #[test]
    fn crown_sits_on_axis() {
        let mesh = jellyfish_mesh(2.0, 0, 1.0);
        let crown = mesh.vertices[0];
        assert!(crown.position[0].abs() < 1e-6);
        assert!((crown.position[1] - 2.0 * BELL_FLATTEN).abs() < 1e-6);
        assert_eq!(crown.attrib, [0.0, 0.0]);
    }

    #[test]
    fn tentacles_hang_down_to_length() {
        let mesh = jellyfish_mesh(1.0, 4, 2.0);
        let tentacle: Vec<_> = mesh.vertices.iter().filter(|v| v.attrib[0] == 1.0).collect();
        assert_eq!(tentacle.len(), 4 * (TENTACLE_SAMPLES as usize + 1) * 2);
        let lowest = tentacle
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        assert!((lowest + 2.0).abs() < 1e-5);
        assert!(tentacle.iter().all(|v| (0.0..=1.0).contains(&v.attrib[1])));
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = jellyfish_mesh(1.0, 6, 2.0);
        for v in &mesh.vertices {
            let len = glam::Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }
}
