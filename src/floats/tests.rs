// Tests for the floats module
use super::*;
use crate::data::DataSource;

#[test]
fn test_width_parameters() {
    for width in [FloatWidth::Width32, FloatWidth::Width64] {
        assert_eq!(
            1 + width.exponent_bits() + width.mantissa_bits(),
            width.bits()
        );
        assert_eq!(width.max_exponent() as i32, 2 * width.bias() + 1);
    }
    assert_eq!(FloatWidth::Width32.max_value(), f64::from(f32::MAX));
}

#[test]
fn test_ufloat_exp() {
    assert_eq!(ufloat_exp(0.0, FloatWidth::Width64), -1023);
    assert_eq!(ufloat_exp(1.0, FloatWidth::Width64), 0);
    assert_eq!(ufloat_exp(3.0, FloatWidth::Width64), 1);
    assert_eq!(ufloat_exp(0.25, FloatWidth::Width64), -2);
    assert_eq!(ufloat_exp(f64::MAX, FloatWidth::Width64), 1023);
    assert_eq!(ufloat_exp(0.0, FloatWidth::Width32), -127);
    assert_eq!(ufloat_exp(f64::from(f32::MAX), FloatWidth::Width32), 127);
}

#[test]
fn test_bit_reinterpretation() {
    for &v in &[0.0, 1.0, -2.5, 1e-40, 3.0e38] {
        assert_eq!(int_to_float(float_to_int(v, FloatWidth::Width64), FloatWidth::Width64), v);
    }
    assert_eq!(float_to_int(1.0, FloatWidth::Width32), 0x3F80_0000);
    assert_eq!(int_to_float(0x3F80_0000, FloatWidth::Width32), 1.0);
}

#[test]
fn test_zeroed_bits_give_one() {
    let mut source = DataSource::from_vec(vec![0; 64]);
    assert_eq!(float64s().value(&mut source).unwrap(), 1.0);
    let mut source = DataSource::from_vec(vec![0; 64]);
    assert_eq!(float32s_ex(true, true).value(&mut source).unwrap(), 1.0);
}

#[test]
fn test_special_draw_gives_zero() {
    // The special coin comes up, index 0 is zero, then the sign bit.
    let mut source = DataSource::from_vec(vec![u64::MAX, 0, 0]);
    assert_eq!(float64s().value(&mut source).unwrap(), 0.0);

    let mut source = DataSource::from_vec(vec![u64::MAX, 0, 1]);
    let f = float64s().value(&mut source).unwrap();
    assert!(f == 0.0 && f.is_sign_negative());
}

#[test]
fn test_unit_interval_rejects_out_of_range_significand() {
    // Exponent magnitude width 0 (exponent 0); the first significand has one
    // fractional bit set (1.5) and is rejected, the second has none (1.0).
    let mut source = DataSource::from_vec(vec![0, 1, 1, 0]);
    let f = gen_ufloat_range(&mut source, 0.0, 1.0, FloatWidth::Width64).unwrap();
    assert_eq!(f, 1.0);

    let groups = source.trace().groups();
    let signif: Vec<_> = groups
        .iter()
        .filter(|g| g.label == FLOAT_SIGNIF_LABEL)
        .collect();
    assert_eq!(signif.len(), 2);
    assert!(signif[0].discard);
    assert!(!signif[1].discard);
    let exp = groups.iter().find(|g| g.label == FLOAT_EXP_LABEL).unwrap();
    assert!(!exp.discard && !exp.forced);
}

#[test]
fn test_unit_interval_always_in_range() {
    let mut source = DataSource::from_seed(17);
    for _ in 0..2000 {
        let f = gen_ufloat_range(&mut source, 0.0, 1.0, FloatWidth::Width64).unwrap();
        assert!((0.0..=1.0).contains(&f), "{} outside [0, 1]", f);
    }
    assert!(source.trace().is_well_nested());
}

#[test]
fn test_ufloat_range_respects_nonzero_min() {
    let mut source = DataSource::from_seed(18);
    for _ in 0..500 {
        let f = gen_ufloat_range(&mut source, 1.0, 1.75, FloatWidth::Width64).unwrap();
        assert!((1.0..=1.75).contains(&f), "{} outside [1, 1.75]", f);
        let g = gen_ufloat_range(&mut source, 0.5, 100.0, FloatWidth::Width32).unwrap();
        assert!((0.5..=100.0).contains(&g), "{} outside [0.5, 100]", g);
    }
}

#[test]
#[should_panic(expected = "could not construct a valid generator: float range [-1, 1]")]
fn test_ufloat_range_rejects_negative_min() {
    let mut source = DataSource::from_seed(0);
    let _ = gen_ufloat_range(&mut source, -1.0, 1.0, FloatWidth::Width64);
}

#[test]
#[should_panic(expected = "could not construct a valid generator: float range [2, 2]")]
fn test_ufloat_range_rejects_empty_range() {
    let mut source = DataSource::from_seed(0);
    let _ = gen_ufloat_range(&mut source, 2.0, 2.0, FloatWidth::Width64);
}

#[test]
fn test_default_floats_are_finite() {
    let mut source = DataSource::from_seed(19);
    let g64 = float64s();
    let g32 = float32s();
    for _ in 0..3000 {
        let f = g64.value(&mut source).unwrap();
        assert!(f.is_finite() && f.abs() <= f64::MAX, "got {}", f);
        let h = g32.value(&mut source).unwrap();
        assert!(h.is_finite() && h.abs() <= f32::MAX, "got {}", h);
    }
}

#[test]
fn test_floats_span_the_range() {
    let mut source = DataSource::from_seed(20);
    let values: Vec<f64> = (0..5000)
        .map(|_| float64s().value(&mut source).unwrap())
        .collect();
    assert!(values.iter().any(|&f| f == 0.0));
    assert!(values.iter().any(|&f| f != 0.0 && f.abs() < f64::MIN_POSITIVE));
    assert!(values.iter().any(|&f| f.abs() > 1e100));
    assert!(values.iter().any(|&f| f < 0.0));
    assert!(values.iter().any(|&f| f > 0.0));
}

#[test]
fn test_ordinary_magnitudes_are_common() {
    let mut source = DataSource::from_seed(25);
    let g64 = float64s();
    let ordinary = (0..2000)
        .map(|_| g64.value(&mut source).unwrap().abs())
        .filter(|f| (1e-6..=1e6).contains(f))
        .count();
    assert!(ordinary > 600, "only {} of 2000 in [1e-6, 1e6]", ordinary);

    let g32 = float32s();
    let ordinary = (0..2000)
        .map(|_| g32.value(&mut source).unwrap().abs())
        .filter(|f| (1e-6..=1e6).contains(f))
        .count();
    assert!(ordinary > 600, "only {} of 2000 f32 in [1e-6, 1e6]", ordinary);
}

#[test]
fn test_ufloat_range_favours_exponents_near_zero() {
    let mut source = DataSource::from_seed(26);
    let near_one = (0..1000)
        .map(|_| gen_ufloat_range(&mut source, 0.0, f64::MAX, FloatWidth::Width64).unwrap())
        .filter(|&f| (1.0 / 1024.0..1024.0).contains(&f))
        .count();
    assert!(near_one > 200, "only {} of 1000 near 1", near_one);
}

#[test]
fn test_float32_subnormals_reachable() {
    let mut source = DataSource::from_seed(21);
    let gen = float32s();
    assert!((0..5000).any(|_| {
        let f = gen.value(&mut source).unwrap();
        f != 0.0 && f.abs() < f32::MIN_POSITIVE
    }));
}

#[test]
fn test_extended_floats_reach_specials() {
    let mut source = DataSource::from_seed(22);
    let gen = float64s_ex(true, true);
    let values: Vec<f64> = (0..4000).map(|_| gen.value(&mut source).unwrap()).collect();
    assert!(values.iter().any(|f| f.is_nan()));
    assert!(values.iter().any(|&f| f == f64::INFINITY));
    assert!(values.iter().any(|&f| f == f64::NEG_INFINITY));
    assert!(values
        .iter()
        .filter(|f| f.is_finite())
        .all(|f| f.abs() <= f64::MAX));
}

#[test]
fn test_partial_special_policies() {
    let mut source = DataSource::from_seed(23);
    let inf_only = float32s_ex(true, false);
    let nan_only = float32s_ex(false, true);
    for _ in 0..2000 {
        assert!(!inf_only.value(&mut source).unwrap().is_nan());
        assert!(!nan_only.value(&mut source).unwrap().is_infinite());
    }
}

#[test]
fn test_admissibility_policy() {
    let nan_only = FloatGen::<f64>::new(false, true);
    assert!(nan_only.admissible(1.0));
    assert!(nan_only.admissible(f64::NAN));
    assert!(!nan_only.admissible(f64::INFINITY));
    assert!(!nan_only.admissible(f64::NEG_INFINITY));

    let f32s = FloatGen::<f32>::new(false, false);
    assert!(f32s.admissible(f32::MAX));
    assert!(!f32s.admissible(f32::INFINITY));
    assert!(!f32s.admissible(f32::NAN));
}

#[test]
fn test_zero_budget_is_exhausted() {
    let mut source = DataSource::from_seed(24);
    assert_eq!(
        float64s().tries(0).value(&mut source),
        Err(DrawError::exhausted(FAILED_TO_GEN_FLOAT, 0))
    );
}

#[test]
fn test_descriptions() {
    assert_eq!(float32s().describe(), "float32s()");
    assert_eq!(float64s().describe(), "float64s()");
    assert_eq!(
        float64s_ex(true, false).describe(),
        "float64s_ex(allow_inf=true, allow_nan=false)"
    );
    assert_eq!(
        float32s_ex(false, false).describe(),
        "float32s()"
    );
}
