//! # Primitive Shape Generation
//!
//! Generators for the shapes the anatomy catalog is assembled from. All
//! shapes are centered at the origin with outward normals; placement and
//! scaling happen through scene-node transforms.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box with the given edge lengths.
///
/// Extends `±width/2` in X, `±height/2` in Y, and `±depth/2` in Z. Each face
/// carries its own four vertices so normals stay flat.
pub fn generate_cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    let positions = [
        // Front face (positive Z)
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
        // Back face (negative Z)
        [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd], [hw, -hh, -hd],
        // Left face (negative X)
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        // Right face (positive X)
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        // Top face (positive Y)
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        // Bottom face (negative Y)
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = normals.to_vec();

    // Two counter-clockwise triangles per face.
    data.indices = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    data
}

/// Generate a unit-radius UV sphere.
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI from the north pole
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            // Normal equals position on a unit sphere.
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis, optionally tapered.
///
/// # Arguments
/// * `radius_top` - Radius at `+height/2`
/// * `radius_bottom` - Radius at `-height/2`
/// * `height` - Extent along Y
/// * `segments` - Number of circular segments
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    // Side normals tilt with the taper.
    let slope = (radius_bottom - radius_top) / height;

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();

        let normal_len = (1.0 + slope * slope).sqrt();
        let normal = [cos_a / normal_len, slope / normal_len, sin_a / normal_len];

        // Bottom vertex
        data.vertices
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push(normal);

        // Top vertex
        data.vertices
            .push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push(normal);
    }

    // Side faces
    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(top_current);
        data.indices.push(bottom_next);

        data.indices.push(top_current);
        data.indices.push(top_next);
        data.indices.push(bottom_next);
    }

    // Cap centers
    let center_bottom_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);

    let center_top_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);

    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;

        // Bottom cap
        data.indices.push(center_bottom_idx);
        data.indices.push(next);
        data.indices.push(current);

        // Top cap
        data.indices.push(center_top_idx);
        data.indices.push(current + 1);
        data.indices.push(next + 1);
    }

    data
}

/// Generate a torus lying in the XY plane (ring axis along Z).
///
/// # Arguments
/// * `ring_radius` - Distance from the torus center to the tube center
/// * `tube_radius` - Radius of the tube itself
/// * `ring_segments` - Subdivisions around the ring
/// * `tube_segments` - Subdivisions around the tube
pub fn generate_torus(
    ring_radius: f32,
    tube_radius: f32,
    ring_segments: u32,
    tube_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let ring_segs = ring_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for ring in 0..=ring_segs {
        let u = ring as f32 * 2.0 * PI / ring_segs as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for tube in 0..=tube_segs {
            let v = tube as f32 * 2.0 * PI / tube_segs as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let radial = ring_radius + tube_radius * cos_v;
            data.vertices
                .push([radial * cos_u, radial * sin_u, tube_radius * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
        }
    }

    for ring in 0..ring_segs {
        for tube in 0..tube_segs {
            let first = ring * (tube_segs + 1) + tube;
            let second = first + tube_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn cuboid_generation() {
        let cuboid = generate_cuboid(3.0, 0.8, 2.0);
        assert_eq!(cuboid.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cuboid.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cuboid.triangle_count(), 12);

        let bounds = cuboid.local_bounds();
        assert_eq!(bounds.min, Vector3::new(-1.5, -0.4, -1.0));
        assert_eq!(bounds.max, Vector3::new(1.5, 0.4, 1.0));
    }

    #[test]
    fn sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert!(sphere.vertices.len() > 0);
        assert!(sphere.indices.len() > 0);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        for normal in &sphere.normals {
            let n = Vector3::new(normal[0], normal[1], normal[2]);
            assert!((n.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cylinder_spans_y_axis() {
        let cylinder = generate_cylinder(0.3, 0.4, 0.5, 8);
        let bounds = cylinder.local_bounds();
        assert!((bounds.min.y + 0.25).abs() < 1e-5);
        assert!((bounds.max.y - 0.25).abs() < 1e-5);
        // Widest at the bottom radius.
        assert!((bounds.max.x - 0.4).abs() < 1e-5);
    }

    #[test]
    fn torus_lies_in_xy_plane() {
        let torus = generate_torus(2.0, 0.1, 16, 8);
        let bounds = torus.local_bounds();
        assert!((bounds.max.z - 0.1).abs() < 1e-4);
        assert!((bounds.max.x - 2.1).abs() < 1e-3);
        assert_eq!(torus.vertices.len(), torus.normals.len());
    }
}
