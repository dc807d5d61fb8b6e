use super::*;

fn store_with(values: &[(FieldName, &str)]) -> FormStateStore {
    let mut store = FormStateStore::new();
    for (field, value) in values {
        store.set_field(*field, *value).expect("free-entry field");
    }
    store
}

fn ratio(record: &FormRecord, field: FieldName) -> f64 {
    record.get(field).parse::<f64>().expect("numeric derived value")
}

#[test]
fn new_record_starts_with_every_field_blank() {
    let store = FormStateStore::new();
    assert_eq!(store.record().iter().count(), 14);
    assert!(store.record().iter().all(|(_, value)| value.is_empty()));
}

#[test]
fn mutation_ratio_for_three_and_one_is_three_quarters() {
    let store = store_with(&[(FieldName::NFeaturePos, "3"), (FieldName::NFeatureNeg, "1")]);
    assert_eq!(store.record().get(FieldName::MutationRatio), "0.75");
}

#[test]
fn mutation_ratio_matches_formula_for_positive_sums() {
    let pairs: [(f64, f64); 6] = [
        (1.0, 1.0),
        (0.0, 4.0),
        (7.5, 2.5),
        (120.0, 3.0),
        (-1.0, 3.0),
        (1e-3, 0.0),
    ];
    for (pos, neg) in pairs {
        let store = store_with(&[
            (FieldName::NFeaturePos, pos.to_string().as_str()),
            (FieldName::NFeatureNeg, neg.to_string().as_str()),
        ]);
        let expected = pos / (pos + neg);
        let actual = ratio(store.record(), FieldName::MutationRatio);
        assert!((actual - expected).abs() < 1e-12, "{pos}/{neg}: {actual} != {expected}");
    }
}

#[test]
fn mutation_ratio_keeps_previous_value_when_sum_is_not_positive() {
    let mut store = store_with(&[(FieldName::NFeaturePos, "3"), (FieldName::NFeatureNeg, "1")]);

    let record = store.set_field(FieldName::NFeatureNeg, "-3").expect("set");
    assert_eq!(record.get(FieldName::MutationRatio), "0.75");

    let record = store.set_field(FieldName::NFeatureNeg, "-5").expect("set");
    assert_eq!(record.get(FieldName::MutationRatio), "0.75");

    store.set_field(FieldName::NFeaturePos, "0").expect("set");
    let record = store.set_field(FieldName::NFeatureNeg, "1").expect("set");
    assert_eq!(record.get(FieldName::MutationRatio), "0");

    let record = store.set_field(FieldName::NFeatureNeg, "0").expect("set");
    assert_eq!(record.get(FieldName::MutationRatio), "0");
}

#[test]
fn non_numeric_counts_leave_mutation_ratio_unchanged() {
    let mut store = store_with(&[(FieldName::NFeaturePos, "1"), (FieldName::NFeatureNeg, "3")]);
    assert_eq!(store.record().get(FieldName::MutationRatio), "0.25");

    for junk in ["abc", "", "  ", "NaN", "inf", "-", ".", "e5", ",5"] {
        let record = store.set_field(FieldName::NFeaturePos, junk).expect("set");
        assert_eq!(record.get(FieldName::MutationRatio), "0.25", "input {junk:?}");
        assert_eq!(record.get(FieldName::NFeaturePos), junk);
    }

    store.set_field(FieldName::NFeaturePos, "1").expect("set");
    let record = store.set_field(FieldName::NFeatureNeg, "x").expect("set");
    assert_eq!(record.get(FieldName::MutationRatio), "0.25");
}

#[test]
fn counts_are_read_from_their_leading_number() {
    let cases = [
        ("3abc", "0.75"),
        ("3e", "0.75"),
        ("3e-", "0.75"),
        ("  3.", "0.75"),
        ("1,5", "0.5"),
        ("9 mutations", "0.9"),
        ("3e0x", "0.75"),
    ];
    for (pos, expected) in cases {
        let store = store_with(&[(FieldName::NFeaturePos, pos), (FieldName::NFeatureNeg, "1")]);
        assert_eq!(store.record().get(FieldName::MutationRatio), expected, "input {pos:?}");
    }
}

#[test]
fn parse_float_takes_longest_decimal_prefix() {
    assert_eq!(parse_float("3abc"), Some(3.0));
    assert_eq!(parse_float("3e"), Some(3.0));
    assert_eq!(parse_float("3e5"), Some(300000.0));
    assert_eq!(parse_float("-.5x"), Some(-0.5));
    assert_eq!(parse_float(" +2.5e-1 "), Some(0.25));
    assert_eq!(parse_float("-Infinity!"), Some(f64::NEG_INFINITY));
    assert_eq!(parse_float("infinity"), None);
    assert_eq!(parse_float("NaN"), None);
    assert_eq!(parse_float("+"), None);
    assert_eq!(parse_float("x3"), None);
}

#[test]
fn mutation_ratio_stays_blank_until_both_counts_parse() {
    let store = store_with(&[(FieldName::NFeaturePos, "5")]);
    assert_eq!(store.record().get(FieldName::MutationRatio), "");
}

#[test]
fn response_ratio_divides_by_epsilon_when_negative_mean_is_zero() {
    let store = store_with(&[
        (FieldName::LogIc50MeanPos, "2"),
        (FieldName::LogIc50MeanNeg, "0"),
    ]);
    let actual = ratio(store.record(), FieldName::MutationResponseRatio);
    assert!((actual - 2_000_000.0).abs() < 1e-3, "{actual}");
}

#[test]
fn response_ratio_matches_formula() {
    let pairs: [(f64, f64); 5] = [
        (2.0, 4.0),
        (-1.5, 0.5),
        (0.0, 3.0),
        (3.25, -1.0),
        (1.0, -RESPONSE_RATIO_EPSILON),
    ];
    for (pos, neg) in pairs {
        let mut store = FormStateStore::new();
        store.set_field(FieldName::LogIc50MeanPos, pos.to_string()).expect("set");
        let record = store
            .set_field(FieldName::LogIc50MeanNeg, neg.to_string())
            .expect("set");

        let expected = pos / (neg + RESPONSE_RATIO_EPSILON);
        let text = record.get(FieldName::MutationResponseRatio);
        if expected.is_finite() {
            let actual: f64 = text.parse().expect("numeric");
            assert!((actual - expected).abs() <= expected.abs() * 1e-12, "{pos}/{neg}");
        } else {
            assert_eq!(text, format_number(expected));
        }
    }
}

#[test]
fn response_ratio_keeps_previous_value_on_unparseable_mean() {
    let mut store = store_with(&[
        (FieldName::LogIc50MeanPos, "1"),
        (FieldName::LogIc50MeanNeg, "1"),
    ]);
    let before = store.record().get(FieldName::MutationResponseRatio).to_string();

    let record = store.set_field(FieldName::LogIc50MeanNeg, "-").expect("set");
    assert_eq!(record.get(FieldName::MutationResponseRatio), before);
}

#[test]
fn derived_fields_reject_direct_edits() {
    let mut store = store_with(&[(FieldName::NFeaturePos, "3"), (FieldName::NFeatureNeg, "1")]);
    let before = store.record().clone();

    for field in [FieldName::MutationRatio, FieldName::MutationResponseRatio] {
        let err = store.set_field(field, "42").expect_err("derived");
        assert_eq!(err, FormError::ReadOnlyField(field));
    }
    assert_eq!(store.record(), &before);
}

#[test]
fn set_field_by_name_rejects_unknown_names() {
    let mut store = FormStateStore::new();
    let err = store
        .set_field_by_name("n_feature_total", "3")
        .expect_err("unknown");
    assert_eq!(err, FormError::UnknownField("n_feature_total".to_string()));

    let record = store.set_field_by_name("feature_name", "ABCB1_mut").expect("known");
    assert_eq!(record.get(FieldName::FeatureName), "ABCB1_mut");
}

#[test]
fn returned_record_is_a_snapshot() {
    let mut store = FormStateStore::new();
    let first = store.set_field(FieldName::TargetPathway, "DNA replication").expect("set");
    store.set_field(FieldName::TargetPathway, "Apoptosis").expect("set");

    assert_eq!(first.get(FieldName::TargetPathway), "DNA replication");
    assert_eq!(store.record().get(FieldName::TargetPathway), "Apoptosis");
}

#[test]
fn with_field_does_not_modify_the_source_record() {
    let base = FormRecord::default();
    let next = base
        .with_field(FieldName::NFeaturePos, "1")
        .and_then(|record| record.with_field(FieldName::NFeatureNeg, "1"))
        .expect("set");

    assert_eq!(base.get(FieldName::MutationRatio), "");
    assert_eq!(next.get(FieldName::MutationRatio), "0.5");
}

#[test]
fn missing_required_lists_blank_free_entry_fields_only() {
    let store = store_with(&[
        (FieldName::TargetPathway, "DNA replication"),
        (FieldName::FeatureName, "  "),
    ]);
    let missing = store.record().missing_required();
    assert_eq!(missing.len(), 11);
    assert_eq!(missing[0], FieldName::FeatureName);
    assert!(!missing.contains(&FieldName::MutationRatio));
}

#[test]
fn format_number_renders_non_finite_values() {
    assert_eq!(format_number(0.75), "0.75");
    assert_eq!(format_number(2.0), "2");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(parse_float(&format_number(f64::INFINITY)), Some(f64::INFINITY));
    assert_eq!(format_number(-0.0), "0");
}

#[test]
fn format_number_uses_exponent_form_outside_plain_range() {
    assert_eq!(format_number(1e-6), "0.000001");
    assert_eq!(format_number(1.5e-7), "1.5e-7");
    assert_eq!(format_number(-2.5e-9), "-2.5e-9");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1.25e25), "1.25e+25");
    assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
}

#[test]
fn tiny_and_huge_ratios_render_in_exponent_form() {
    let store = store_with(&[
        (FieldName::NFeaturePos, "1e-7"),
        (FieldName::NFeatureNeg, "1"),
        (FieldName::LogIc50MeanPos, "1e15"),
        (FieldName::LogIc50MeanNeg, "0"),
    ]);
    let record = store.record();

    let mutation_ratio = record.get(FieldName::MutationRatio);
    assert!(mutation_ratio.ends_with("e-8"), "{mutation_ratio}");
    assert_eq!(parse_float(mutation_ratio), Some(1e-7 / (1e-7 + 1.0)));

    let response_ratio = record.get(FieldName::MutationResponseRatio);
    assert!(response_ratio.contains("e+2"), "{response_ratio}");
    assert_eq!(parse_float(response_ratio), Some(1e15 / RESPONSE_RATIO_EPSILON));
}
