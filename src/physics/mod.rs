//! # Physics Module
//!
//! Voxel-grid physics against the world's solidity data: axis-aligned
//! bounding boxes, swept collision resolution and block raycasting. All
//! queries go through `World::is_solid_at`, so unloaded terrain is simply
//! not solid and never produces phantom contacts.

pub mod aabb;
pub mod collision;
pub mod raycast;

pub use aabb::Aabb;
pub use collision::{resolve_collision, CollisionResult};
pub use raycast::{raycast, RaycastHit, MAX_RAYCAST_DISTANCE};
