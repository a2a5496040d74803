use super::*;

fn sweep3() -> impl Iterator<Item = DVec3> {
    (0..400).map(|i| {
        let t = i as f64;
        DVec3::new(t * 0.731 - 150.0, (t * 1.37).sin() * 80.0, t * -0.113 + 7.5)
    })
}

#[test]
fn hashes_are_bit_for_bit_deterministic() {
    for p in sweep3() {
        assert_eq!(hash13(p).to_bits(), hash13(p).to_bits());
        assert_eq!(hash12(p.truncate()).to_bits(), hash12(p.truncate()).to_bits());
        let a = hash_dir3(p);
        let b = hash_dir3(p);
        assert_eq!(a.to_array().map(f64::to_bits), b.to_array().map(f64::to_bits));
    }
}

#[test]
fn scalar_hashes_stay_in_half_open_unit_range() {
    for p in sweep3() {
        let h = hash13(p);
        assert!((0.0..1.0).contains(&h), "hash13({p}) = {h}");
        let h = hash12(p.truncate());
        assert!((0.0..1.0).contains(&h), "hash12({p}) = {h}");
    }
}

#[test]
fn direction_hash_is_centered() {
    for p in sweep3() {
        let d = hash_dir3(p.floor());
        for c in d.to_array() {
            assert!((-0.5..0.5).contains(&c), "component {c} out of range");
        }
    }
}

#[test]
fn hash_is_order_sensitive() {
    let a = hash12(DVec2::new(3.0, 7.0));
    let b = hash12(DVec2::new(7.0, 3.0));
    assert_ne!(a, b);
}

#[test]
fn nan_input_propagates() {
    assert!(hash12(DVec2::new(f64::NAN, 0.0)).is_nan());
    assert!(hash_dir3(DVec3::new(0.0, f64::NAN, 0.0)).x.is_nan());
}
