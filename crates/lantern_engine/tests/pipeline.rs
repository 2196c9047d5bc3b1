//! Pipeline-level tests against the recording backend
//!
//! These drive the full pass sequence with a small scene and assert on the
//! submission log: pass ordering, shadow sampler placement and the
//! composite pass's effect encoding.

use lantern_engine::foundation::math::{Mat4, Point3, Vec3};
use lantern_engine::prelude::*;
use lantern_engine::render::api::headless::{HeadlessGraphics, Submission};

fn test_scene(registry: &mut MeshRegistry, gfx: &mut HeadlessGraphics) -> Scene {
    let mut scene = Scene::new(
        DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0), 2.0, Vec3::new(-0.2, -1.0, -0.3)),
        Flashlight::default(),
        vec![PointLight::new(
            Point3::new(-1.0, 2.0, 2.0),
            Vec3::new(0.0, 1.0, 1.0),
            10.0,
            1.0,
            0.09,
            0.032,
        )],
        Vec3::new(0.7, 0.7, 1.0),
    );

    let cube = registry
        .get_or_create(&ShapeKind::Cube, gfx)
        .expect("cube mesh");
    let diffuse = registry
        .load_texture("textures/crate.png", gfx)
        .expect("diffuse");
    let specular = registry
        .load_texture("textures/crate_specular.png", gfx)
        .expect("specular");
    scene
        .graph
        .insert(
            None,
            Mat4::identity(),
            Vec3::new(1.0, 1.0, 1.0),
            NodeKind::Drawable(Shape::new(cube, Material::new(vec![diffuse, specular]))),
        )
        .expect("insert cube");
    scene
}

fn frame_context(effect: PostEffect) -> FrameContext {
    FrameContext {
        view: Mat4::identity(),
        projection: Mat4::identity(),
        camera_position: Point3::new(0.0, 0.0, 3.0),
        camera_front: Vec3::new(0.0, 0.0, -1.0),
        viewport: (1280, 720),
        dir_light_space: Mat4::identity(),
        point_light_space: None,
        point_light_position: Point3::origin(),
        far_plane: 25.0,
        effect,
    }
}

fn render_one_frame(effect: PostEffect) -> HeadlessGraphics {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let scene = test_scene(&mut registry, &mut gfx);

    let config = RendererConfig::default();
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");

    gfx.clear_log();
    let mut ctx = frame_context(effect);
    pipeline
        .render_frame(&scene, &mut ctx, &mut gfx)
        .expect("render frame");
    gfx
}

#[test]
fn passes_run_in_pipeline_order() {
    let gfx = render_one_frame(PostEffect::None);

    let dir_depth = gfx.first_use_of_program("dir_depth").expect("dir depth ran");
    let point_depth = gfx
        .first_use_of_program("point_depth")
        .expect("point depth ran");
    let lit = gfx
        .first_use_of_program("phong_shadowed")
        .expect("lit pass ran");
    let markers = gfx
        .first_use_of_program("light_marker")
        .expect("marker pass ran");
    let composite = gfx.first_use_of_program("composite").expect("composite ran");

    assert!(dir_depth < lit, "lit pass must follow the directional depth pass");
    assert!(point_depth < lit, "lit pass must follow the point depth pass");
    assert!(lit < markers);
    assert!(markers < composite, "composite must run last");
}

#[test]
fn lit_pass_renders_into_the_offscreen_target() {
    let gfx = render_one_frame(PostEffect::None);

    let lit = gfx.first_use_of_program("phong_shadowed").expect("lit ran");
    // The last framebuffer bind before the lit pass must be an off-screen
    // target, and the default framebuffer is only rebound by composite.
    let bind_before_lit = gfx.submissions()[..lit]
        .iter()
        .rev()
        .find_map(|s| match s {
            Submission::BindFramebuffer(target) => Some(*target),
            _ => None,
        })
        .expect("a framebuffer bind precedes the lit pass");
    assert!(bind_before_lit.is_some(), "lit pass draws off-screen");

    let composite = gfx.first_use_of_program("composite").expect("composite ran");
    let default_bind = gfx
        .position_of(|s| matches!(s, Submission::BindFramebuffer(None)))
        .expect("default framebuffer bound");
    assert!(default_bind < composite);
}

#[test]
fn shadow_samplers_sit_past_the_material_textures() {
    let gfx = render_one_frame(PostEffect::None);

    // The test drawable's material occupies units 0 and 1, so both shadow
    // samplers land on units 2 and 3.
    assert_eq!(gfx.last_uploaded_int("shadowMap"), Some(2));
    assert_eq!(gfx.last_uploaded_int("shadowCubeMap"), Some(3));
    assert!(gfx
        .position_of(|s| matches!(s, Submission::BindTexture { unit: 2, .. }))
        .is_some());
    assert!(gfx
        .position_of(|s| matches!(s, Submission::BindTexture { unit: 3, .. }))
        .is_some());
}

#[test]
fn depth_pass_restores_viewport_and_cull_face() {
    let gfx = render_one_frame(PostEffect::None);

    let front = gfx
        .position_of(|s| matches!(s, Submission::SetCullFace(c) if *c == lantern_engine::render::api::CullFace::Front))
        .expect("front-face culling during the directional depth pass");
    let back_after = gfx.submissions()[front..]
        .iter()
        .position(|s| {
            matches!(s, Submission::SetCullFace(c) if *c == lantern_engine::render::api::CullFace::Back)
        })
        .expect("cull face restored");
    assert!(back_after > 0);

    // Shadow-map viewport is set, then the window viewport is restored.
    assert!(gfx
        .position_of(|s| matches!(s, Submission::SetViewport { width: 1024, height: 1024 }))
        .is_some());
    assert!(gfx
        .position_of(|s| matches!(s, Submission::SetViewport { width: 1280, height: 720 }))
        .is_some());
}

#[test]
fn point_depth_uploads_all_six_face_matrices() {
    let gfx = render_one_frame(PostEffect::None);
    for i in 0..6 {
        let name = format!("shadowMatrices[{i}]");
        assert!(
            gfx.position_of(|s| matches!(s, Submission::UploadMat4 { name: n } if *n == name))
                .is_some(),
            "missing {name}"
        );
    }
}

#[test]
fn composite_encodes_colour_remap_effects_by_id() {
    let gfx = render_one_frame(PostEffect::Greyscale);
    assert_eq!(gfx.last_uploaded_int("effectToUse"), Some(2));
    assert!(gfx.last_uploaded_float_array("kernel3x3").is_none());
}

#[test]
fn composite_uploads_kernel_with_sentinel_id() {
    let gfx = render_one_frame(PostEffect::Blur);
    assert_eq!(gfx.last_uploaded_int("effectToUse"), Some(3));
    let kernel = gfx
        .last_uploaded_float_array("kernel3x3")
        .expect("kernel uploaded");
    assert_eq!(kernel, PostEffect::Blur.kernel().expect("blur kernel"));

    let gfx = render_one_frame(PostEffect::EdgeDetect);
    assert_eq!(gfx.last_uploaded_int("effectToUse"), Some(3));
    let kernel = gfx
        .last_uploaded_float_array("kernel3x3")
        .expect("kernel uploaded");
    assert_eq!(kernel, PostEffect::EdgeDetect.kernel().expect("edge kernel"));
}

#[test]
fn point_depth_tracks_a_moving_light() {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let mut scene = test_scene(&mut registry, &mut gfx);

    let config = RendererConfig::default();
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");

    scene.point_lights[0].position = Point3::new(4.0, 5.0, 6.0);
    gfx.clear_log();
    let mut ctx = frame_context(PostEffect::None);
    pipeline
        .render_frame(&scene, &mut ctx, &mut gfx)
        .expect("render frame");

    assert_eq!(gfx.last_uploaded_vec3("lightPos"), Some([4.0, 5.0, 6.0]));
}

#[test]
fn reflective_drawables_sample_the_skybox_cubemap() {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let mut scene = test_scene(&mut registry, &mut gfx);
    scene.skybox = Some(Skybox {
        face_paths: std::array::from_fn(|i| format!("textures/sky_{i}.jpg")),
    });

    let cube = registry
        .get_or_create(&ShapeKind::Cube, &mut gfx)
        .expect("cube mesh");
    scene
        .graph
        .insert(
            None,
            Mat4::new_translation(&Vec3::new(2.0, 0.0, 0.0)),
            Vec3::new(1.0, 1.0, 1.0),
            NodeKind::Drawable(Shape::new(cube, Material::reflective(Vec::new(), 1.0))),
        )
        .expect("insert mirror cube");

    let config = RendererConfig::default();
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");

    gfx.clear_log();
    let mut ctx = frame_context(PostEffect::None);
    pipeline
        .render_frame(&scene, &mut ctx, &mut gfx)
        .expect("render frame");

    // The mirror cube has no material textures, so its shadow samplers
    // sit on units 0 and 1 and the environment cubemap lands on unit 2.
    assert_eq!(gfx.last_uploaded_int("skybox"), Some(2));
    assert_eq!(gfx.last_uploaded_int("isReflectiveMaterial"), Some(1));

    // Without a reflective drawable, no environment sampler is placed.
    let plain = render_one_frame(PostEffect::None);
    assert!(plain.last_uploaded_int("skybox").is_none());
    assert_eq!(plain.last_uploaded_int("isReflectiveMaterial"), Some(0));
}

#[test]
fn scene_without_point_lights_skips_the_cubemap_pass() {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let mut scene = test_scene(&mut registry, &mut gfx);
    scene.point_lights.clear();

    let config = RendererConfig::default();
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");

    gfx.clear_log();
    let mut ctx = frame_context(PostEffect::None);
    pipeline
        .render_frame(&scene, &mut ctx, &mut gfx)
        .expect("render frame");

    assert!(gfx.first_use_of_program("point_depth").is_none());
    assert!(gfx.last_uploaded_int("shadowCubeMap").is_none());
    // The directional shadow path still runs.
    assert!(gfx.first_use_of_program("dir_depth").is_some());
    assert_eq!(gfx.last_uploaded_int("shadowMap"), Some(2));
}

#[test]
fn disabled_shadows_fall_back_to_plain_phong() {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let scene = test_scene(&mut registry, &mut gfx);

    let mut config = RendererConfig::default();
    config.shadow.enabled = false;
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");

    gfx.clear_log();
    let mut ctx = frame_context(PostEffect::None);
    pipeline
        .render_frame(&scene, &mut ctx, &mut gfx)
        .expect("render frame");

    assert!(gfx.first_use_of_program("phong").is_some());
    assert!(gfx.first_use_of_program("dir_depth").is_none());
    assert!(gfx.first_use_of_program("point_depth").is_none());
    assert!(gfx.last_uploaded_int("shadowMap").is_none());
}

#[test]
fn teardown_releases_everything() {
    let mut gfx = HeadlessGraphics::new();
    let mut registry = MeshRegistry::new();
    let scene = test_scene(&mut registry, &mut gfx);

    let config = RendererConfig::default();
    let mut pipeline = RenderPipeline::new(&config);
    pipeline.prepare(&scene, &mut gfx).expect("prepare");
    assert!(gfx.live_resources() > 0);

    pipeline.teardown(&mut gfx);
    registry.teardown(&mut gfx);
    assert_eq!(gfx.live_resources(), 0);
}
