use super::*;
use crate::foundation::core::{Canvas, Rgb};
use crate::graph::GraphBuilder;
use crate::material::{DissolveMaterial, FractalNoiseMaterial, SineColorMaterial};
use crate::raymarch::{Sphere, WavingPlane};
use crate::render::Sample;

fn center(time: f64) -> PixelSample {
    let canvas = Canvas {
        width: 3,
        height: 3,
    };
    PixelSample::new(canvas, 1, 1, time)
}

fn sphere_camera() -> LookAtCamera {
    LookAtCamera::new(DVec3::new(0.0, 0.0, -1.5), DVec3::ZERO)
}

fn small_sphere() -> Sphere {
    Sphere {
        center: DVec3::ZERO,
        radius: 0.4,
    }
}

#[test]
fn graph_shader_reads_the_material_color() {
    let m = FractalNoiseMaterial::default();
    let shader = GraphShader::from_material(&m).unwrap();
    let bound = m.bind().unwrap();
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let mut scratch = Vec::new();
    for (x, y) in [(0, 0), (3, 1), (7, 3)] {
        let px = PixelSample::new(canvas, x, y, 2.0);
        let got = shader.shade(&px, &mut scratch);
        let color = bound
            .eval_with_scratch(DVec3::new(px.uv.x, px.uv.y, 0.0), 2.0, &mut Vec::new())
            .to_rgb();
        assert_eq!(got, Sample::opaque(color));
    }
}

#[test]
fn graph_shader_uses_the_alpha_output() {
    let mut b = GraphBuilder::new();
    let red = b.constant(DVec3::new(1.0, 0.0, 0.0));
    let uv = b.uv();
    let u = b.swizzle(uv, "x").unwrap();
    b.output("color", red).unwrap();
    b.output("alpha", u).unwrap();
    let graph = b.build().unwrap();

    let shader = GraphShader::new(&graph, Domain::Planar, &ParamSet::new()).unwrap();
    let px = PixelSample::new(
        Canvas {
            width: 4,
            height: 1,
        },
        1,
        0,
        0.0,
    );
    let s = shader.shade(&px, &mut Vec::new());
    assert_eq!(s, Sample::new(Rgb::new(1.0, 0.0, 0.0), 0.375));
}

#[test]
fn scalar_color_renders_gray() {
    let mut b = GraphBuilder::new();
    let t = b.time();
    b.output("v", t).unwrap();
    let graph = b.build().unwrap();
    let shader = GraphShader::new(&graph, Domain::Planar, &ParamSet::new()).unwrap();
    let s = shader.shade(&center(0.25), &mut Vec::new());
    assert_eq!(s, Sample::opaque(Rgb::new(0.25, 0.25, 0.25)));
}

#[test]
fn output_widths_are_checked() {
    let mut b = GraphBuilder::new();
    let uv = b.uv();
    b.output("color", uv).unwrap();
    let graph = b.build().unwrap();
    assert!(matches!(
        GraphShader::new(&graph, Domain::Planar, &ParamSet::new()),
        Err(ProcfieldError::InvalidGraph(_))
    ));

    let mut b = GraphBuilder::new();
    let one = b.scalar(1.0);
    let uv = b.uv();
    b.output("color", one).unwrap();
    b.output("alpha", uv).unwrap();
    let graph = b.build().unwrap();
    assert!(matches!(
        GraphShader::new(&graph, Domain::Planar, &ParamSet::new()),
        Err(ProcfieldError::InvalidGraph(_))
    ));
}

#[test]
fn missing_params_fail_at_construction() {
    let m = FractalNoiseMaterial::default();
    let graph = m.build_graph().unwrap();
    assert!(matches!(
        GraphShader::new(&graph, Domain::Planar, &ParamSet::new()),
        Err(ProcfieldError::UnboundInput(_))
    ));
}

#[test]
fn raymarch_shader_shades_hits_and_paints_misses_with_sky() {
    let shader = RaymarchShader::new(WavingPlane::default());
    let px = center(0.0);
    let hit = shader.trace(px.screen, 0.0).expect("center ray hits the plane");
    let s = shader.shade(&px, &mut Vec::new());
    assert_eq!(s, Sample::opaque(shader.surface.shade(&hit, 0.0)));
    assert_ne!(s.color, sky_background(px.screen));

    let looking_up = RaymarchShader {
        camera: LookAtCamera::new(DVec3::new(0.0, 2.0, 0.0), DVec3::new(0.0, 3.0, 5.0)),
        ..RaymarchShader::new(WavingPlane::default())
    };
    assert!(looking_up.trace(px.screen, 0.0).is_none());
    let s = looking_up.shade(&px, &mut Vec::new());
    assert_eq!(s, Sample::opaque(sky_background(px.screen)));
}

#[test]
fn surface_material_is_evaluated_at_the_hit_point() {
    let m = SineColorMaterial::default();
    let shader = SurfaceMaterialShader::from_material(small_sphere(), &m)
        .unwrap()
        .with_camera(sphere_camera());
    let s = shader.shade(&center(0.0), &mut Vec::new());
    let expected = Rgb::new(0.5, 0.5, ((-0.8f64).sin() + 1.0) * 0.5);
    assert_eq!(s.alpha, 1.0);
    assert!((s.color.to_dvec3() - expected.to_dvec3()).abs().max_element() < 1e-9);

    let lit = shader.clone().lit(true).shade(&center(0.0), &mut Vec::new());
    let light = MarchConfig::default()
        .lighting
        .intensity(DVec3::new(0.0, 0.0, -1.0));
    let expected = expected.scale(light);
    assert!((lit.color.to_dvec3() - expected.to_dvec3()).abs().max_element() < 1e-6);
}

#[test]
fn dissolved_surface_shows_the_sky() {
    let gone = DissolveMaterial {
        threshold_offset: 5.0,
        ..DissolveMaterial::default()
    };
    let shader = SurfaceMaterialShader::from_material(small_sphere(), &gone)
        .unwrap()
        .with_camera(sphere_camera());
    let px = center(0.0);
    assert_eq!(
        shader.shade(&px, &mut Vec::new()),
        Sample::opaque(sky_background(px.screen))
    );

    let solid = DissolveMaterial {
        threshold_offset: -5.0,
        ..DissolveMaterial::default()
    };
    let shader = SurfaceMaterialShader::from_material(small_sphere(), &solid)
        .unwrap()
        .with_camera(sphere_camera());
    let s = shader.shade(&px, &mut Vec::new());
    assert!((s.color.to_dvec3() - solid.base_color.to_dvec3()).abs().max_element() < 1e-12);
}

#[test]
fn shaders_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphShader>();
    assert_send_sync::<RaymarchShader<WavingPlane>>();
    assert_send_sync::<SurfaceMaterialShader<Sphere>>();
}
