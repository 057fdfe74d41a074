//! Headless demo: streams terrain around a moving point, then exercises
//! raycasting, collision and block edits against the loaded world.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use cgmath::{Point2, Point3, Vector3};
use log::{info, warn};

use voxel_world::config::WorldConfig;
use voxel_world::core::MtResource;
use voxel_world::meshing::tasks::remesh_tasks;
use voxel_world::physics::{raycast, resolve_collision, Aabb, MAX_RAYCAST_DISTANCE};
use voxel_world::tasks::TaskManager;
use voxel_world::voxels::block::BlockType;
use voxel_world::voxels::chunk::CHUNK_HEIGHT;
use voxel_world::voxels::tasks::ChunkGenerationTask;
use voxel_world::voxels::world::World;

fn main() {
    voxel_world::init_logging();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "world.json".to_string());
    let config = WorldConfig::load_or_default(Path::new(&config_path));
    info!(
        "seed {}, load radius {}, {} workers",
        config.seed, config.load_radius, config.worker_threads
    );

    let world = MtResource::new(World::new(&config));
    let mut tasks = TaskManager::new(config.worker_threads.max(1), world.clone());

    // Walk the streaming center eastward and let the pipeline keep up.
    let started = Instant::now();
    let mut center = Point2::new(0, 0);
    for step in 0..4 {
        center.x = step * 2;
        let wanted = world.get_mut().update_loaded(center);
        info!(
            "center ({}, {}): requesting {} chunks",
            center.x,
            center.y,
            wanted.len()
        );
        for position in wanted {
            tasks.publish_task(Box::new(ChunkGenerationTask::new(&world.get(), position)));
        }
        drain(&mut tasks);
    }
    report_geometry(&world, center, config.load_radius, started);

    // Pick the ground under a probe point and knock the surface block out.
    let probe_x = 8;
    let probe_z = 8;
    let surface = ground_height(&world.get(), probe_x, probe_z);
    let eye = Point3::new(probe_x as f32 + 0.5, surface as f32 + 3.0, probe_z as f32 + 0.5);
    match raycast(
        &world.get(),
        eye,
        Vector3::new(0.0, -1.0, 0.0),
        MAX_RAYCAST_DISTANCE,
    ) {
        Some(hit) => {
            info!(
                "raycast hit {:?} at distance {:.2}, face normal {:?}",
                hit.block, hit.distance, hit.normal
            );
            if let Err(error) =
                world
                    .get()
                    .set_block(hit.block.x, hit.block.y, hit.block.z, BlockType::AIR.id())
            {
                warn!("failed to break block: {}", error);
            }
        }
        None => info!("raycast found no ground within reach"),
    }
    for task in remesh_tasks(&world) {
        tasks.publish_task(task);
    }
    drain(&mut tasks);

    // Drop a player box onto the edited terrain and let it settle.
    let mut aabb = Aabb::player(Point3::new(
        probe_x as f32 + 0.5,
        surface as f32 + 6.0,
        probe_z as f32 + 0.5,
    ));
    let mut velocity = Vector3::new(0.0, 0.0, 0.0);
    let dt = 1.0 / 60.0;
    for _ in 0..600 {
        velocity.y -= 24.0 * dt;
        let resolved = resolve_collision(&world.get(), &aabb, velocity, dt);
        aabb = resolved.aabb;
        velocity = resolved.velocity;
        if resolved.grounded {
            break;
        }
    }
    info!("player settled with feet at y = {:.2}", aabb.min.y);
}

/// Ticks the manager until all published work has been applied.
fn drain(tasks: &mut TaskManager) {
    while tasks.pending_tasks() > 0 {
        tasks.tick();
        thread::sleep(Duration::from_millis(1));
    }
    tasks.tick();
}

/// Highest solid block in a column, or 0 when the column is empty.
fn ground_height(world: &World, x: i32, z: i32) -> i32 {
    (0..CHUNK_HEIGHT)
        .rev()
        .find(|&y| world.is_solid_at(x, y, z))
        .unwrap_or(0)
}

fn report_geometry(world: &MtResource<World>, center: Point2<i32>, radius: i32, started: Instant) {
    let world = world.get();
    let mut vertices = 0usize;
    let mut indices = 0usize;
    for (_, chunk) in world.chunks_in_radius(center, radius) {
        if let Some(mesh) = chunk.get().mesh.as_ref() {
            vertices += mesh.vertices.len();
            indices += mesh.indices.len();
        }
    }
    info!(
        "{} chunks resident, {} vertices / {} indices in {:?}",
        world.loaded_count(),
        vertices,
        indices,
        started.elapsed()
    );
}
