//! The reference "many random spheres" scene.

use std::sync::Arc;

use rand::RngCore;
use raytrace_math::{gen_f64, Vector3, VectorExt};

use crate::{
    Bvh, Camera, Color, Hittable, HittableList, Material, RenderConfig, RenderResult, Scene, Sphere,
};

/// Radius of the small spheres scattered over the ground.
const SMALL_RADIUS: f64 = 0.2;

/// Grid of small spheres spans `-GRID..GRID` on both x and z.
const GRID: i32 = 11;

/// Pick one of the three material kinds with random parameters.
fn random_material(config: &RenderConfig, rng: &mut dyn RngCore) -> Material {
    let kind = (gen_f64(rng) * 3.0) as u32;
    let albedo = (Color::random(rng) + Color::ONE) / 2.0;
    let blur = gen_f64(rng) / 2.0;
    let refractive_index = gen_f64(rng) + 1.0;

    match kind {
        0 => Material::matte(albedo),
        1 if config.metal_fuzz => Material::fuzzy_metal(albedo, blur),
        1 => Material::metal(albedo, blur),
        _ => Material::glass(albedo, blur, refractive_index),
    }
}

/// Spheres of the reference scene, ground first.
fn reference_objects(config: &RenderConfig, rng: &mut dyn RngCore) -> Vec<Box<dyn Hittable>> {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::new();

    objects.push(Box::new(Sphere::new(
        Vector3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::matte(Color::splat(0.9))),
    )));

    for a in -GRID..GRID {
        for b in -GRID..GRID {
            let center = Vector3::new(
                a as f64 + 0.9 * gen_f64(rng),
                SMALL_RADIUS,
                b as f64 + 0.9 * gen_f64(rng),
            );
            let material = random_material(config, rng);
            objects.push(Box::new(Sphere::new(center, SMALL_RADIUS, Arc::new(material))));
        }
    }

    objects.push(Box::new(Sphere::new(
        Vector3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::glass(Color::ONE, 0.0, 1.5)),
    )));
    objects.push(Box::new(Sphere::new(
        Vector3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::matte(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Box::new(Sphere::new(
        Vector3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    objects
}

/// Build the reference scene: a matte ground sphere, three large feature
/// spheres and a grid of small randomly-placed, randomly-shaded spheres.
///
/// The camera sits at (13, 2, 3) looking at the origin, with the field of
/// view and aperture taken from `config` and the aspect ratio from its
/// image size.
pub fn build_scene(config: &RenderConfig, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    config.validate()?;

    let mut camera = Camera::new()
        .with_position(Vector3::new(13.0, 2.0, 3.0), Vector3::ZERO, Vector3::Y)
        .with_lens(config.vfov_degrees, config.aperture)
        .with_aspect_ratio(config.aspect_ratio());
    camera.initialize();

    let objects = reference_objects(config, rng);
    let count = objects.len();
    let world: Box<dyn Hittable> = if config.use_bvh {
        Box::new(Bvh::build(objects)?)
    } else {
        Box::new(HittableList::from(objects))
    };

    log::info!(
        "Reference scene: {} spheres ({})",
        count,
        if config.use_bvh { "BVH" } else { "flat list" }
    );

    Ok(Scene::new(camera, world))
}
