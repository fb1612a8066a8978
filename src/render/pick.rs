//! CPU pick pass
//!
//! Casts a world-space ray against the world AABB of every primitive in a
//! `MemoryScene` and reports the nearest hit. The result is a bare
//! `PrimitiveHandle`; mapping it back to furniture is the registry's job.

use crate::scene::{MemoryScene, PrimitiveHandle};
use glam::Vec3;

/// Below this a direction component counts as parallel to the slab.
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub handle: PrimitiveHandle,
    pub distance: f32,
}

pub fn ray_pick(scene: &MemoryScene, origin: Vec3, dir: Vec3) -> Option<PickHit> {
    if dir.length_squared() <= f32::EPSILON {
        return None;
    }
    let dir = dir.normalize();
    let mut best: Option<PickHit> = None;
    for (handle, state) in scene.primitives() {
        let Some((min, max)) = scene.world_bounds(handle) else {
            continue;
        };
        if !min.is_finite() || !max.is_finite() {
            continue;
        }
        let Some(distance) = slab_entry(origin, dir, min, max) else {
            continue;
        };
        let closer = match &best {
            None => true,
            // Equal distances resolve to the older primitive for stable picks.
            Some(current) => {
                distance < current.distance
                    || (distance == current.distance && handle < current.handle)
            }
        };
        if closer {
            log::trace!("Ray crosses {} at {}", state.name, distance);
            best = Some(PickHit { handle, distance });
        }
    }
    best
}

/// Distance along `dir` at which the ray enters the box, clamped to zero when
/// the origin is already inside.
fn slab_entry(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let parallel = dir.abs().cmplt(Vec3::splat(PARALLEL_EPSILON));
    let outside = origin.cmplt(min) | origin.cmpgt(max);
    if (parallel & outside).any() {
        return None;
    }

    let inv_dir = dir.recip();
    let t1 = (min - origin) * inv_dir;
    let t2 = (max - origin) * inv_dir;
    // Parallel axes already contain the origin and never bound the interval.
    let near = Vec3::select(parallel, Vec3::NEG_INFINITY, t1.min(t2));
    let far = Vec3::select(parallel, Vec3::INFINITY, t1.max(t2));

    let entry = near.max_element().max(0.0);
    let exit = far.min_element();
    (entry <= exit).then_some(entry)
}
