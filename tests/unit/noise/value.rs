use super::*;

#[test]
fn integer_coordinates_return_the_corner_hash_exactly() {
    for x in -6..6 {
        for y in -6..6 {
            let c = DVec2::new(f64::from(x), f64::from(y));
            assert_eq!(value_noise2(c), hash12(c));
            let c3 = DVec3::new(f64::from(x), f64::from(y), f64::from(x * y));
            assert_eq!(value_noise3(c3), hash13(c3));
        }
    }
}

#[test]
fn output_stays_in_unit_range() {
    for i in 0..2000 {
        let t = f64::from(i);
        let p = DVec2::new(t * 0.173 - 91.0, (t * 0.917).cos() * 33.0);
        let v = value_noise2(p);
        assert!((0.0..=1.0).contains(&v), "value_noise2({p}) = {v}");
        let v = value_noise3(p.extend(t * 0.05));
        assert!((0.0..=1.0).contains(&v), "value_noise3 = {v}");
    }
}

#[test]
fn continuous_across_cell_edges() {
    for k in -4..4 {
        let edge = f64::from(k);
        let left = value_noise2(DVec2::new(edge - 1e-9, 0.37));
        let right = value_noise2(DVec2::new(edge + 1e-9, 0.37));
        assert!((left - right).abs() < 1e-6, "jump at x={edge}: {left} vs {right}");
    }
}

#[test]
fn slope_vanishes_at_lattice_points() {
    let h = 1e-6;
    let p = DVec2::new(3.0, -2.0);
    let d = (value_noise2(p + DVec2::new(h, 0.0)) - value_noise2(p)) / h;
    assert!(d.abs() < 1e-3, "derivative at corner should be ~0, got {d}");
}

#[test]
fn nan_propagates() {
    assert!(value_noise2(DVec2::new(f64::NAN, 1.0)).is_nan());
    assert!(value_noise3(DVec3::new(0.5, 0.5, f64::NAN)).is_nan());
}
