use super::*;
use crate::pipeline::test_support::{academic_profile, community_profile};

#[test]
fn community_scenario_lands_mid_range() {
    let engine = FormulasEngine::new();
    let profile = community_profile();

    let hcs = engine.compute_hcs(&profile);
    assert!((0.5..=0.6).contains(&hcs), "hcs {hcs} outside 0.5-0.6");

    let sidi = engine.compute_sidi(&profile);
    assert!(sidi < 1.0, "epic without custom apis should be easy, got {sidi}");
    assert_eq!(sidi, 0.6);
}

#[test]
fn academic_profile_saturates_capped_inputs() {
    let engine = FormulasEngine::new();
    let profile = academic_profile();

    assert_eq!(engine.compute_hcs(&profile), 0.89);
    assert_eq!(engine.compute_sidi(&profile), 0.917);
}

#[test]
fn metrics_are_bit_identical_across_calls() {
    let engine = FormulasEngine::new();
    for profile in [community_profile(), academic_profile()] {
        let first = engine.compute(&profile);
        for _ in 0..5 {
            let again = engine.compute(&profile);
            assert_eq!(first.hcs.to_bits(), again.hcs.to_bits());
            assert_eq!(first.sidi.to_bits(), again.sidi.to_bits());
            assert_eq!(first.raf, again.raf);
        }
    }
}

#[test]
fn hcs_stays_in_unit_interval_at_bed_boundaries() {
    let engine = FormulasEngine::new();
    for beds in [1, 5000] {
        for mut profile in [community_profile(), academic_profile()] {
            profile.bed_count = beds;
            let hcs = engine.compute_hcs(&profile);
            assert!((0.0..=1.0).contains(&hcs), "hcs {hcs} at {beds} beds");
        }
    }

    let mut oversized = community_profile();
    oversized.bed_count = u32::MAX;
    assert!(engine.compute_hcs(&oversized) <= 1.0);
}

#[test]
fn sidi_is_positive_for_every_shape() {
    let engine = FormulasEngine::new();
    let mut profile = community_profile();
    profile.primary_ehr = None;
    assert_eq!(engine.compute_sidi(&profile), 0.7);

    profile.primary_ehr = Some("Homegrown EHR".to_string());
    profile.interoperability_standards = vec!["FHIR R4".to_string(), "HL7v2".to_string()];
    assert!(engine.compute_sidi(&profile) > 0.0);

    profile.additional_ehrs = (0..40).map(|n| format!("ehr-{n}")).collect();
    profile.custom_apis = true;
    let sidi = engine.compute_sidi(&profile);
    assert!(sidi > 0.0);
    // extra vendors are capped at ten
    assert_eq!(sidi, 2.117);
}

#[test]
fn compliance_weight_caps_at_one() {
    assert_eq!(compliance_weight(&[]), 0.6);
    assert_eq!(compliance_weight(&["hipaa".to_string()]), 0.75);
    let everything = ["HIPAA", "HITRUST", "SOC 2", "GDPR"].map(str::to_string);
    assert_eq!(compliance_weight(&everything), 1.0);
}

#[test]
fn raf_sizes_small_hospital_with_minimum_fleet() {
    let engine = FormulasEngine::new();
    let profile = community_profile();
    let raf = engine.compute_raf(&profile, 0.5, 0.6);

    assert_eq!(raf.servers.application, 2);
    assert_eq!(raf.servers.database, 2);
    assert_eq!(raf.servers.integration, 2);
    assert_eq!(raf.servers.total, 6);
    assert_eq!(raf.cpu_cores, 2 * 8 + 2 * 16 + 2 * 4);
    assert_eq!(raf.memory_gb, 2 * 32 + 2 * 128 + 2 * 16);
    assert_eq!(raf.storage.hot_tb, 1.5);
    assert_eq!(raf.storage.warm_tb, 3.0);
    assert_eq!(raf.storage.cold_tb, 7.5);
    assert_eq!(raf.cost.monthly_usd, 1400.0 + 1760.0 + 150.0 + 150.0 + 75.0);
    assert_eq!(raf.cost.annual_usd, raf.cost.monthly_usd * 12.0);
}

#[test]
fn raf_clamps_out_of_domain_inputs() {
    let engine = FormulasEngine::new();
    let profile = academic_profile();

    let nan = engine.compute_raf(&profile, f64::NAN, f64::NAN);
    let defaults = engine.compute_raf(&profile, 0.5, 1.0);
    assert_eq!(nan, defaults);

    let huge = engine.compute_raf(&profile, 40.0, 1e9);
    assert_eq!(huge, engine.compute_raf(&profile, 1.0, 10.0));
    assert_eq!(huge.servers.application, 18);
    assert_eq!(huge.servers.integration, 20);
}

#[test]
fn vendor_index_recognises_aliases() {
    assert_eq!(vendor_index(Some("Epic Systems")), 0.9);
    assert_eq!(vendor_index(Some("Cerner")), 0.85);
    assert_eq!(vendor_index(Some("MEDITECH Expanse")), 0.75);
    assert_eq!(vendor_index(Some("Unknown Vendor")), 0.8);
    assert_eq!(vendor_index(None), 0.8);
}

#[test]
fn vendor_index_ignores_partial_words() {
    assert_eq!(vendor_index(Some("e")), 0.8);
    assert_eq!(vendor_index(Some("health")), 0.8);
    assert_eq!(vendor_index(Some("Epicure Records")), 0.8);
    assert_eq!(vendor_index(Some("Oracle Health EHR")), 0.85);
    assert_eq!(vendor_index(Some("Allscripts Sunrise")), 0.7);
}
