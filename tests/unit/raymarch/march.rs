use super::*;
use crate::raymarch::sdf::Sphere;

fn unit_sphere(p: DVec3) -> f64 {
    p.length() - 1.0
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 3.0, 4.0));
    assert_eq!(r.direction, DVec3::new(0.0, 0.6, 0.8));
    assert_eq!(r.at(5.0), DVec3::new(0.0, 3.0, 4.0));
    assert_eq!(Ray::new(DVec3::ONE, DVec3::ZERO).direction, DVec3::ZERO);
}

#[test]
fn head_on_ray_hits_the_unit_sphere() {
    let cfg = MarchConfig::default();
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    let hit = raymarch(&ray, &unit_sphere, &cfg).expect("hit");

    assert!((hit.point - DVec3::new(0.0, 0.0, -1.0)).length() <= cfg.surface_epsilon);
    assert!((hit.normal - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    assert!((hit.distance - 4.0).abs() <= cfg.surface_epsilon);
    assert_eq!(hit.steps, 1);
}

#[test]
fn parallel_ray_escapes() {
    let cfg = MarchConfig::default();
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::X);
    match march(&ray, &unit_sphere, &cfg) {
        MarchOutcome::Miss {
            reason, distance, ..
        } => {
            assert_eq!(reason, MissReason::Escaped);
            assert!(distance > cfg.max_distance);
        }
        other => panic!("expected miss, got {other:?}"),
    }
}

#[test]
fn surfaces_past_the_far_limit_are_misses() {
    let cfg = MarchConfig {
        max_distance: 3.0,
        ..MarchConfig::default()
    };
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    assert_eq!(
        march(&ray, &unit_sphere, &cfg),
        MarchOutcome::Miss {
            reason: MissReason::Escaped,
            steps: 1,
            distance: 4.0,
        }
    );

    // The same surface inside the limit is still found.
    let near = MarchConfig {
        max_distance: 4.0,
        ..MarchConfig::default()
    };
    let hit = raymarch(&ray, &unit_sphere, &near).expect("hit");
    assert_eq!(hit.distance, 4.0);
}

#[test]
fn step_budget_exhaustion_is_a_miss() {
    // Grazing ray: distances shrink but never drop under epsilon within two steps.
    let cfg = MarchConfig {
        max_steps: 2,
        ..MarchConfig::default()
    };
    let ray = Ray::new(DVec3::new(0.0, 1.5, -5.0), DVec3::Z);
    let outcome = march(&ray, &unit_sphere, &cfg);
    assert_eq!(
        outcome,
        MarchOutcome::Miss {
            reason: MissReason::StepBudget,
            steps: 2,
            distance: outcome_distance(&outcome),
        }
    );
    assert_eq!(outcome.state(), MarchState::Miss);
}

fn outcome_distance(o: &MarchOutcome) -> f64 {
    match o {
        MarchOutcome::Hit(h) => h.distance,
        MarchOutcome::Miss { distance, .. } => *distance,
    }
}

#[test]
fn origin_inside_the_surface_hits_immediately() {
    let ray = Ray::new(DVec3::ZERO, DVec3::X);
    let hit = raymarch(&ray, &unit_sphere, &MarchConfig::default()).expect("hit");
    assert_eq!(hit.steps, 0);
    assert_eq!(hit.distance, 0.0);
    // Gradient vanishes at the center.
    assert_eq!(hit.normal, DVec3::ZERO);
    assert_eq!(hit.light, MarchConfig::default().lighting.ambient);
}

#[test]
fn nan_distance_is_a_miss() {
    let nan_field = |_: DVec3| f64::NAN;
    let ray = Ray::new(DVec3::ZERO, DVec3::Z);
    match march(&ray, &nan_field, &MarchConfig::default()) {
        MarchOutcome::Miss { reason, steps, .. } => {
            assert_eq!(reason, MissReason::NonFinite);
            assert_eq!(steps, 0);
        }
        other => panic!("expected miss, got {other:?}"),
    }
}

#[test]
fn marcher_walks_the_state_machine() {
    let cfg = MarchConfig::default();
    let sphere = Sphere::default();
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    let mut m = Marcher::new(&ray, &sphere, &cfg);
    assert_eq!(m.state(), MarchState::Marching);
    assert!(m.step().is_none());
    assert_eq!(m.point(), DVec3::new(0.0, 0.0, -1.0));
    assert_eq!(m.traveled(), 4.0);
    let outcome = m.step().expect("terminal");
    assert_eq!(outcome.state(), MarchState::Hit);
    assert_eq!(m.state(), MarchState::Hit);
    // Terminal states are sticky.
    assert_eq!(m.step(), Some(outcome));
}

#[test]
fn hit_light_uses_config_lighting() {
    let cfg = MarchConfig::default();
    let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
    let hit = raymarch(&ray, &unit_sphere, &cfg).expect("hit");
    // normal (0,0,-1) against normalize(1,1,-1): 1/sqrt(3).
    let expected = (1.0 / 3f64.sqrt()) * 0.8 + 0.2;
    assert!((hit.light - expected).abs() < 1e-6);
}

#[test]
fn estimated_normals_match_analytic_ones() {
    for p in [
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, -1.0, 0.0),
        DVec3::new(0.6, 0.0, 0.8),
    ] {
        let n = estimate_normal(&unit_sphere, p, 1e-4);
        assert!((n - p).length() < 1e-6, "normal at {p}: {n}");
    }
}

#[test]
fn config_validation() {
    assert!(MarchConfig::default().validate().is_ok());
    for bad in [
        MarchConfig {
            max_steps: 0,
            ..MarchConfig::default()
        },
        MarchConfig {
            max_distance: 0.0,
            ..MarchConfig::default()
        },
        MarchConfig {
            surface_epsilon: -1.0,
            ..MarchConfig::default()
        },
        MarchConfig {
            normal_offset: f64::NAN,
            ..MarchConfig::default()
        },
    ] {
        assert!(bad.validate().is_err(), "{bad:?}");
    }
}
