use super::*;

fn probe_points() -> impl Iterator<Item = DVec3> {
    (0..400).map(|i| {
        let t = f64::from(i);
        DVec3::new(
            (t * 0.311).sin() * 17.0,
            t * 0.047 - 9.0,
            (t * 0.173).cos() * 5.0,
        )
    })
}

#[test]
fn zero_octaves_is_constant_zero() {
    let params = FractalParams::new(0, 2.0, 0.5);
    for p in probe_points() {
        assert_eq!(fbm3(p, &params), 0.0);
        assert_eq!(fbm2(p.truncate(), &params), 0.0);
    }
}

#[test]
fn single_octave_matches_the_basis() {
    let value = FractalParams::new(1, 2.0, 0.5).with_basis(NoiseBasis::Value);
    let simplex = FractalParams::new(1, 2.0, 0.5);
    for p in probe_points() {
        assert_eq!(fbm2(p.truncate(), &value), value_noise2(p.truncate()));
        assert_eq!(fbm3(p, &value), value_noise3(p));
        assert_eq!(fbm3(p, &simplex), simplex3_unit(p));
    }
}

#[test]
fn adding_an_octave_moves_the_sum_by_at_most_gain_pow_k() {
    for basis in [NoiseBasis::Value, NoiseBasis::Simplex] {
        for gain in [0.3, 0.5, 0.7] {
            for k in 1..6u32 {
                let lo = FractalParams::new(k, 2.0, gain).with_basis(basis);
                let hi = FractalParams::new(k + 1, 2.0, gain).with_basis(basis);
                let bound = gain.powi(k as i32) + 1e-12;
                for p in probe_points() {
                    let d = (fbm3(p, &hi) - fbm3(p, &lo)).abs();
                    assert!(d <= bound, "{basis:?} gain={gain} k={k} p={p}: {d} > {bound}");
                }
            }
        }
    }
}

#[test]
fn output_stays_in_unit_range() {
    let params = FractalParams::new(8, 2.3, 0.45);
    for p in probe_points() {
        let v = fbm3(p, &params);
        assert!((0.0..=1.0).contains(&v), "fbm3({p}) = {v}");
        let w = warp2(p.truncate(), &params, &WarpParams::default());
        assert!((0.0..=1.0).contains(&w), "warp2({p}) = {w}");
    }
}

#[test]
fn warp_with_zero_amplitude_equals_plain_fbm() {
    let params = FractalParams::default();
    let flat = WarpParams {
        levels: 3,
        amplitude: 0.0,
    };
    for p in probe_points() {
        assert_eq!(warp3(p, &params, &flat), fbm3(p, &params));
        assert_eq!(warp2(p.truncate(), &params, &flat), fbm2(p.truncate(), &params));
    }
}

#[test]
fn warp_with_zero_levels_equals_plain_fbm() {
    let params = FractalParams::default();
    let none = WarpParams {
        levels: 0,
        amplitude: 4.0,
    };
    let p = DVec3::new(0.25, -1.5, 3.0);
    assert_eq!(warp3(p, &params, &none), fbm3(p, &params));
}

#[test]
fn warp_matches_explicit_nesting() {
    let params = FractalParams::new(4, 2.0, 0.5);
    let warp = WarpParams::default();
    let p = DVec2::new(1.7, -0.4);
    let inner = fbm2(p, &params);
    let middle = fbm2(p + DVec2::splat(inner), &params);
    let expected = fbm2(p + DVec2::splat(middle), &params);
    assert_eq!(warp2(p, &params, &warp), expected);
}

#[test]
fn deterministic_across_calls() {
    let params = FractalParams::new(6, 2.3, 0.45);
    for p in probe_points() {
        assert_eq!(
            warp3(p, &params, &WarpParams::default()).to_bits(),
            warp3(p, &params, &WarpParams::default()).to_bits()
        );
    }
}

#[test]
fn default_rotation_is_orthonormal() {
    let params = FractalParams::default();
    let r2 = params.rotation2 * params.rotation2.transpose();
    let r3 = params.rotation3 * params.rotation3.transpose();
    assert!(r2.abs_diff_eq(DMat2::IDENTITY, 1e-12));
    assert!(r3.abs_diff_eq(DMat3::IDENTITY, 1e-12));
}

#[test]
fn total_amplitude_is_a_geometric_sum() {
    assert_eq!(FractalParams::new(0, 2.0, 0.5).total_amplitude(), 0.0);
    assert_eq!(FractalParams::new(3, 2.0, 0.5).total_amplitude(), 1.75);
}

#[test]
fn validate_rejects_unusable_parameters() {
    assert!(FractalParams::default().validate().is_ok());
    assert!(FractalParams::new(MAX_OCTAVES + 1, 2.0, 0.5).validate().is_err());
    assert!(FractalParams::new(4, 0.0, 0.5).validate().is_err());
    assert!(FractalParams::new(4, f64::NAN, 0.5).validate().is_err());
    assert!(FractalParams::new(4, 2.0, -0.1).validate().is_err());
    assert!(
        WarpParams {
            levels: 2,
            amplitude: f64::INFINITY
        }
        .validate()
        .is_err()
    );
}

#[test]
fn serde_fills_missing_fields_with_defaults() {
    let params: FractalParams =
        serde_json::from_str(r#"{"octaves": 8, "lacunarity": 2.3, "basis": "value"}"#).unwrap();
    assert_eq!(params.octaves, 8);
    assert_eq!(params.lacunarity, 2.3);
    assert_eq!(params.gain, 0.5);
    assert_eq!(params.basis, NoiseBasis::Value);
    assert_eq!(params.rotation2, FractalParams::default().rotation2);

    let warp: WarpParams = serde_json::from_str("{}").unwrap();
    assert_eq!(warp, WarpParams::default());
}
