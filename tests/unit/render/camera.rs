use super::*;

#[test]
fn default_camera_looks_down_at_the_origin() {
    let cam = LookAtCamera::default();
    cam.validate().unwrap();
    let b = cam.basis();
    let expected = DVec3::new(0.0, -2.0, 4.0).normalize();
    assert!((b.forward - expected).length() < 1e-12);
    assert!((b.right - DVec3::X).length() < 1e-12);
    assert!(b.up.y > 0.0);
    assert!(b.up.dot(b.forward).abs() < 1e-12);
    assert!((b.up.length() - 1.0).abs() < 1e-12);
}

#[test]
fn center_ray_follows_the_view_direction() {
    let cam = LookAtCamera::default();
    let ray = cam.ray(DVec2::ZERO);
    assert_eq!(ray.origin, cam.eye);
    assert!((ray.direction - cam.basis().forward).length() < 1e-12);

    let upper = cam.ray(DVec2::new(0.0, 0.5));
    assert!(upper.direction.y > ray.direction.y);
    let right = cam.ray(DVec2::new(0.5, 0.0));
    assert!(right.direction.x > 0.0);
}

#[test]
fn longer_focal_length_narrows_the_view() {
    let wide = LookAtCamera::default();
    let narrow = LookAtCamera {
        focal_length: 2.0,
        ..wide
    };
    let s = DVec2::new(0.5, 0.0);
    let f = wide.basis().forward;
    assert!(narrow.ray(s).direction.dot(f) > wide.ray(s).direction.dot(f));
}

#[test]
fn degenerate_placements_are_rejected() {
    assert!(LookAtCamera::new(DVec3::ONE, DVec3::ONE).validate().is_err());
    assert!(
        LookAtCamera::new(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO)
            .validate()
            .is_err()
    );
    let bad_focal = LookAtCamera {
        focal_length: 0.0,
        ..LookAtCamera::default()
    };
    assert!(bad_focal.validate().is_err());
}

#[test]
fn camera_deserializes_with_defaults() {
    let cam: LookAtCamera = serde_json::from_str(r#"{"eye":[0.0,0.0,-3.0]}"#).unwrap();
    assert_eq!(cam.eye, DVec3::new(0.0, 0.0, -3.0));
    assert_eq!(cam.target, DVec3::ZERO);
    assert_eq!(cam.focal_length, 1.0);
}
