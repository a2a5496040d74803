use super::*;
use crate::foundation::math::smoothstep;
use crate::graph::Value;

#[test]
fn threshold_oscillates_around_the_offset() {
    let m = DissolveMaterial::default();
    assert_eq!(m.threshold(0.0), -0.27);
    let quarter = std::f64::consts::FRAC_PI_2 / m.animation_speed;
    assert!((m.threshold(quarter) - 0.73).abs() < 1e-12);
}

#[test]
fn alpha_and_glow_follow_the_noise_band() {
    let m = DissolveMaterial {
        threshold_offset: 0.5,
        glow_width: 0.2,
        ..DissolveMaterial::default()
    };
    let bound = m.bind().unwrap();
    let mut scratch = Vec::new();
    let time = 0.0;
    let th = m.threshold(time);
    for i in 0..50 {
        let t = f64::from(i) * 0.1;
        let p = DVec3::new(t.sin() * 0.4, t.cos() * 0.4, t * 0.05 - 0.2);
        let outs = bound.eval_outputs(p, time, &mut scratch);

        let n = m.noise(p);
        let up = smoothstep(th - m.glow_width, th, n);
        let down = smoothstep(th, th + m.glow_width, n);
        let expected = m.base_color.mix(m.glow_color, up - down).to_dvec3();

        assert_eq!(outs[1], Value::Scalar(up));
        assert!((outs[0].to_dvec3() - expected).abs().max_element() < 1e-12);
    }
}

#[test]
fn default_threshold_crosses_the_noise_range() {
    let m = DissolveMaterial::default();
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for i in 0..12 {
        for j in 0..12 {
            for k in 0..12 {
                let p = DVec3::new(f64::from(i), f64::from(j), f64::from(k)) * 0.17 - 1.0;
                let n = m.noise(p);
                assert!((-1.0..=1.0).contains(&n));
                lo = lo.min(n);
                hi = hi.max(n);
            }
        }
    }
    // The resting threshold sits inside the sampled noise, so an edge band is visible.
    let th = m.threshold(0.0);
    assert!(lo < th && th < hi, "noise [{lo}, {hi}] vs threshold {th}");
}

#[test]
fn far_thresholds_show_plain_base_color() {
    for (offset, alpha) in [(-5.0, 1.0), (5.0, 0.0)] {
        let m = DissolveMaterial {
            threshold_offset: offset,
            ..DissolveMaterial::default()
        };
        let bound = m.bind().unwrap();
        let outs = bound.eval_outputs(DVec3::new(0.1, -0.2, 0.3), 1.0, &mut Vec::new());
        assert_eq!(outs[1], Value::Scalar(alpha));
        assert_eq!(outs[0].to_rgb(), m.base_color);
    }
}

#[test]
fn needs_a_volume_domain() {
    let m = DissolveMaterial::default();
    let graph = m.build_graph().unwrap();
    assert!(graph.uses_position());
    assert!(matches!(
        graph.bind(Domain::Planar, &m.params()),
        Err(ProcfieldError::UnboundInput(_))
    ));
}

#[test]
fn rejects_empty_glow_band() {
    let m = DissolveMaterial {
        glow_width: 0.0,
        ..DissolveMaterial::default()
    };
    assert!(m.validate().is_err());
    assert!(m.build_graph().is_err());
}
