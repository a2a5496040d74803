use super::*;
use crate::graph::GraphBuilder;
use crate::raymarch::march::{MarchConfig, Ray, raymarch};

#[test]
fn sphere_and_plane_distances() {
    let s = Sphere {
        center: DVec3::new(1.0, 0.0, 0.0),
        radius: 0.5,
    };
    assert_eq!(s.distance(DVec3::new(3.0, 0.0, 0.0)), 1.5);
    assert_eq!(s.distance(DVec3::new(1.0, 0.0, 0.0)), -0.5);

    let p = Plane::default();
    assert_eq!(p.distance(DVec3::new(4.0, 2.0, -1.0)), 2.0);
    assert_eq!(p.distance(DVec3::new(0.0, -0.5, 0.0)), -0.5);
}

#[test]
fn waving_plane_matches_its_height_function() {
    let w = WavingPlane::default().at_time(0.7);
    let p = DVec3::new(0.3, 0.4, -1.2);
    let expected = p.y - ((0.3_f64 * 3.0 + 0.7).sin() * 0.15 + (-1.2_f64 * 2.5 + 0.7).cos() * 0.15);
    assert!((w.distance(p) - expected).abs() < 1e-15);
    // Waves never leave the amplitude band.
    for i in 0..100 {
        let x = f64::from(i) * 0.173;
        assert!(w.height(x, -x).abs() <= 2.0 * w.amplitude);
    }
}

#[test]
fn waving_plane_is_hit_from_above() {
    let w = WavingPlane::default();
    let ray = Ray::new(DVec3::new(0.0, 2.0, -4.0), DVec3::new(0.0, -2.0, 4.0));
    let hit = raymarch(&ray, &w, &MarchConfig::default()).expect("plane hit");
    assert!(w.distance(hit.point).abs() < 1e-3);
    assert!(hit.normal.y > 0.5);
}

#[test]
fn graph_sdf_matches_the_closed_form() {
    let mut b = GraphBuilder::new();
    let p = b.position();
    let len = b.length(p).unwrap();
    let r = b.param("radius", 1).unwrap();
    let d = b.sub(len, r).unwrap();
    b.output("distance", d).unwrap();
    let graph = b.build().unwrap();

    let sdf = GraphSdf::new(&graph, &ParamSet::new().with("radius", 1.0), 0.0).unwrap();
    let q = DVec3::new(0.0, 3.0, 4.0);
    assert_eq!(sdf.distance(q), 4.0);

    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    let hit = raymarch(&ray, &sdf, &MarchConfig::default()).expect("hit");
    assert!((hit.point.z + 1.0).abs() < 1e-3);
}

#[test]
fn graph_sdf_requires_a_scalar_output() {
    let mut b = GraphBuilder::new();
    let p = b.position();
    b.output("p", p).unwrap();
    let graph = b.build().unwrap();
    assert!(GraphSdf::new(&graph, &ParamSet::new(), 0.0).is_err());
}

#[test]
fn graph_sdf_reports_unbound_params() {
    let mut b = GraphBuilder::new();
    let r = b.param("radius", 1).unwrap();
    b.output("d", r).unwrap();
    let graph = b.build().unwrap();
    assert!(matches!(
        GraphSdf::new(&graph, &ParamSet::new(), 0.0),
        Err(ProcfieldError::UnboundInput(_))
    ));
}

#[test]
fn graph_sdf_distance_at_follows_time() {
    let mut b = GraphBuilder::new();
    let p = b.position();
    let len = b.length(p).unwrap();
    let t = b.time();
    let d = b.sub(len, t).unwrap();
    b.output("d", d).unwrap();
    let graph = b.build().unwrap();

    let sdf = GraphSdf::new(&graph, &ParamSet::new(), 1.0).unwrap();
    let q = DVec3::new(3.0, 0.0, 0.0);
    assert_eq!(sdf.time(), 1.0);
    assert_eq!(sdf.distance(q), 2.0);
    assert_eq!(sdf.distance_at(q, 2.5), 0.5);
}

#[test]
fn static_fields_ignore_time() {
    let s = Sphere::default();
    let p = DVec3::new(0.0, 2.0, 0.0);
    assert_eq!(s.distance_at(p, 0.0), s.distance_at(p, 9.0));
    let plane = Plane::default();
    assert_eq!(plane.distance_at(p, 3.0), 2.0);

    let w = WavingPlane::default();
    assert_eq!(w.distance_at(p, 0.4), w.at_time(0.4).distance(p));
    assert_ne!(w.distance_at(p, 0.0), w.distance_at(p, 1.0));
}
