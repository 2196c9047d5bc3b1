//! Demo scene viewer
//!
//! Builds a small scene (a parent cube with two child cubes, a floor
//! plane, an OBJ model, three coloured point lights, a flashlight and a
//! skybox) and runs the engine against the recording backend for a fixed
//! number of frames. A key script exercises the flashlight toggle and a
//! post-processing effect, and the run is summarised on stdout.

use lantern_engine::prelude::*;
use lantern_engine::render::api::headless::{HeadlessGraphics, ScriptedWindow};
use lantern_engine::foundation::math::Point3;
use log::info;

fn deg(angle: f32) -> f32 {
    angle.to_radians()
}

fn build_scene(
    registry: &mut MeshRegistry,
    gfx: &mut HeadlessGraphics,
) -> Result<Scene, EngineError> {
    let mut scene = Scene::new(
        DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0), 2.0, Vec3::new(-0.2, -1.0, -0.3)),
        Flashlight::default(),
        vec![
            PointLight::new(
                Point3::new(-1.0, 2.0, 2.0),
                Vec3::new(0.0, 1.0, 1.0),
                10.0,
                1.0,
                0.09,
                0.032,
            ),
            PointLight::new(
                Point3::new(2.0, 2.0, -2.0),
                Vec3::new(1.0, 0.0, 0.0),
                2.5,
                1.0,
                0.09,
                0.032,
            ),
            PointLight::new(
                Point3::new(-5.0, 2.0, -5.0),
                Vec3::new(1.0, 1.0, 0.0),
                2.5,
                1.0,
                0.14,
                0.07,
            ),
        ],
        Vec3::new(0.7, 0.7, 1.0),
    )
    .with_skybox(Skybox {
        face_paths: [
            "resources/textures/skybox/right.jpg".to_string(),
            "resources/textures/skybox/left.jpg".to_string(),
            "resources/textures/skybox/top.jpg".to_string(),
            "resources/textures/skybox/bottom.jpg".to_string(),
            "resources/textures/skybox/front.jpg".to_string(),
            "resources/textures/skybox/back.jpg".to_string(),
        ],
    });

    // Crate: a parent cube with two smaller cubes riding on it.
    let cube_mesh = registry.get_or_create(&ShapeKind::Cube, gfx)?;
    let crate_textures = vec![
        registry.load_texture("resources/textures/container.png", gfx)?,
        registry.load_texture("resources/textures/container_specular.png", gfx)?,
    ];
    let crate_shape = Shape::new(cube_mesh, Material::new(crate_textures));

    let parent = scene.graph.insert(
        None,
        Mat4::new_translation(&Vec3::new(-2.0, 0.0, -2.0))
            * Mat4::from_axis_angle(&Vec3::y_axis(), deg(45.0)),
        Vec3::new(2.0, 2.0, 2.0),
        NodeKind::Drawable(crate_shape.clone()),
    )?;
    scene.graph.insert(
        Some(parent),
        Mat4::new_translation(&Vec3::new(0.0, 0.75, 0.0))
            * Mat4::from_axis_angle(&Vec3::y_axis(), deg(30.0)),
        Vec3::new(0.5, 0.5, 0.5),
        NodeKind::Drawable(crate_shape.clone()),
    )?;
    scene.graph.insert(
        Some(parent),
        Mat4::new_translation(&Vec3::new(2.0, -0.2, 0.0))
            * Mat4::from_axis_angle(&Vec3::y_axis(), deg(60.0)),
        Vec3::new(0.6, 0.6, 0.6),
        NodeKind::Drawable(crate_shape),
    )?;

    // Floor plane.
    let square_mesh = registry.get_or_create(&ShapeKind::Square, gfx)?;
    let floor_texture = registry.load_texture("resources/textures/floor.png", gfx)?;
    scene.graph.insert(
        None,
        Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0))
            * Mat4::from_axis_angle(&Vec3::x_axis(), deg(90.0)),
        Vec3::new(50.0, 50.0, 50.0),
        NodeKind::Drawable(Shape::new(square_mesh, Material::new(vec![floor_texture]))),
    )?;

    // OBJ model, mirroring the skybox.
    let dragon_mesh =
        registry.get_or_create(&ShapeKind::Obj("resources/models/dragon.obj".to_string()), gfx)?;
    scene.graph.insert(
        None,
        Mat4::new_translation(&Vec3::new(2.0, -1.0, 2.0))
            * Mat4::from_axis_angle(&Vec3::y_axis(), deg(-135.0)),
        Vec3::new(0.25, 0.25, 0.25),
        NodeKind::Drawable(Shape::new(dragon_mesh, Material::reflective(Vec::new(), 0.5))),
    )?;

    Ok(scene)
}

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = RendererConfig::default();
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let scene = build_scene(&mut registry, &mut gfx)?;

    // 120 frames; F is pressed over frames 10-12 (toggling the flashlight
    // on its release) and effect 4 (blur) is selected at frame 30.
    let window = ScriptedWindow::with_frames(120)
        .with_size(config.window.width, config.window.height)
        .hold_key(KeyCode::F, 10..13)
        .hold_key(KeyCode::Num4, 30..31)
        .hold_key(KeyCode::W, 40..80);

    let mut engine = Engine::new(config, gfx, window, registry, scene)?;
    engine.run()?;

    let gfx = engine.graphics();
    info!(
        "run complete: {} submissions recorded, {} resources still live",
        gfx.submissions().len(),
        gfx.live_resources()
    );
    println!(
        "rendered 120 frames headless; flashlight on: {}, effect: {:?}",
        engine.scene().flashlight.enabled,
        engine.effect()
    );
    Ok(())
}
