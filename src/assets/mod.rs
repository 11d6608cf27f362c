//! # Asset Loading
//!
//! OBJ-backed anatomy models load independently, one per named system, and
//! every load settles: a parse or I/O failure becomes a
//! [`LoadOutcome::Failed`] marker instead of an error, so one broken model
//! can never wedge the loading overlay or take the rest of the scene down
//! with it. Failed systems simply stay absent from the registry.
//!
//! The aggregate completes once every constituent load has settled,
//! successes and failures alike.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use log::{info, warn};

use crate::gfx::geometry::GeometryData;

/// A successfully loaded model for one system.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub system_id: String,
    pub geometry: GeometryData,
}

/// Settled result of one system's load. Never an error type: failure is a
/// normal, degraded outcome.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Ready(LoadedModel),
    Failed { system_id: String },
}

impl LoadOutcome {
    pub fn system_id(&self) -> &str {
        match self {
            LoadOutcome::Ready(model) => &model.system_id,
            LoadOutcome::Failed { system_id } => system_id,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadOutcome::Ready(_))
    }
}

/// Loads one system's OBJ model, settling to an outcome either way.
pub async fn load_system_model(system_id: String, path: PathBuf) -> LoadOutcome {
    match load_obj_geometry(&path) {
        Ok(geometry) => {
            info!(
                "loaded model for system '{}' ({} triangles)",
                system_id,
                geometry.triangle_count()
            );
            LoadOutcome::Ready(LoadedModel {
                system_id,
                geometry,
            })
        }
        Err(err) => {
            warn!("model for system '{}' unavailable: {:#}", system_id, err);
            LoadOutcome::Failed { system_id }
        }
    }
}

/// Completes when every constituent load has settled, regardless of
/// individual outcomes.
pub async fn settle_all<F>(loads: Vec<F>) -> Vec<LoadOutcome>
where
    F: Future<Output = LoadOutcome>,
{
    join_all(loads).await
}

/// Parses an OBJ file into one merged geometry.
pub fn load_obj_geometry(path: &Path) -> Result<GeometryData> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("failed to load OBJ '{}'", path.display()))?;

    let mut data = GeometryData::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = data.vertices.len() as u32;

        // Use normals from the OBJ when present, otherwise average face
        // normals onto the vertices.
        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            average_face_normals(&mesh.positions, &mesh.indices)
        };

        for i in 0..mesh.positions.len() / 3 {
            data.vertices.push([
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ]);
            data.normals
                .push([normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]);
        }
        data.indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    if data.vertices.is_empty() {
        bail!("'{}' contains no geometry", path.display());
    }

    Ok(data)
}

/// Per-vertex normals from averaged face normals.
fn average_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; positions.len()];
    let mut counts = vec![0u32; vertex_count];

    for triangle in indices.chunks(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];

        let v0 = [positions[i0 * 3], positions[i0 * 3 + 1], positions[i0 * 3 + 2]];
        let v1 = [positions[i1 * 3], positions[i1 * 3 + 1], positions[i1 * 3 + 2]];
        let v2 = [positions[i2 * 3], positions[i2 * 3 + 1], positions[i2 * 3 + 2]];

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &vertex_idx in &[i0, i1, i2] {
            normals[vertex_idx * 3] += face_normal[0];
            normals[vertex_idx * 3 + 1] += face_normal[1];
            normals[vertex_idx * 3 + 2] += face_normal[2];
            counts[vertex_idx] += 1;
        }
    }

    for i in 0..vertex_count {
        if counts[i] > 0 {
            let length = (normals[i * 3].powi(2)
                + normals[i * 3 + 1].powi(2)
                + normals[i * 3 + 2].powi(2))
            .sqrt();
            if length > 0.0 {
                normals[i * 3] /= length;
                normals[i * 3 + 1] /= length;
                normals[i * 3 + 2] /= length;
            }
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn settle_all_completes_with_mixed_outcomes() {
        let loads = vec![
            load_system_model("skeletal".to_string(), PathBuf::from("/nonexistent/a.obj")),
            load_system_model("nervous".to_string(), PathBuf::from("/nonexistent/b.obj")),
        ];
        let outcomes = pollster::block_on(settle_all(loads));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.is_ready()));
        assert_eq!(outcomes[0].system_id(), "skeletal");
        assert_eq!(outcomes[1].system_id(), "nervous");
    }

    #[test]
    fn missing_file_settles_to_failed_not_panic() {
        let outcome = pollster::block_on(load_system_model(
            "circulatory".to_string(),
            PathBuf::from("/definitely/not/here.obj"),
        ));
        assert!(matches!(outcome, LoadOutcome::Failed { system_id } if system_id == "circulatory"));
    }

    #[test]
    fn obj_without_normals_gets_face_normals() {
        let path = std::env::temp_dir().join("vesalius_test_triangle.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let geometry = load_obj_geometry(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        // Triangle in the XY plane: normals point along +Z.
        for normal in &geometry.normals {
            assert!((normal[2] - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn empty_obj_is_an_error_at_the_boundary() {
        let path = std::env::temp_dir().join("vesalius_test_empty.obj");
        fs::write(&path, "# nothing here\n").unwrap();

        let result = load_obj_geometry(&path);
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
