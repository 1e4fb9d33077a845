use super::{community_fixture, profile_fixture, Fixture};
use crate::pipeline::specification::{
    ImplementationApproach, ImplementationPlan, SpecSection, SpecificationGenerator,
};
use crate::pipeline::test_support::academic_profile;

fn plan(fixture: &Fixture) -> ImplementationPlan {
    SpecificationGenerator::new().generate_implementation_plan(
        &fixture.processed.profile,
        &fixture.assessment,
        &fixture.metrics,
    )
}

#[test]
fn community_plan_uses_standard_approach() {
    let plan = plan(&community_fixture());

    assert_eq!(plan.approach, ImplementationApproach::Standard);
    let durations: Vec<f64> = plan.phases.iter().map(|phase| phase.duration_months).collect();
    assert_eq!(durations, vec![3.15, 4.2, 2.1, 1.05]);
    let staffing: Vec<u32> = plan.phases.iter().map(|phase| phase.staff_fte).collect();
    assert_eq!(staffing, vec![5, 7, 6, 9]);

    assert_eq!(plan.total_duration_months, 10.5);
    assert_eq!(plan.risk_buffer, 0.1);
    assert_eq!(plan.risk_adjusted_duration_months, 11.55);
    assert_eq!(plan.target_months, 12.0);

    let resources = &plan.resource_optimization;
    assert_eq!(resources.available_fte, 12);
    assert_eq!(resources.peak_demand_fte, 9);
    assert_eq!(resources.utilization, 0.75);
    assert_eq!(resources.shortfall_fte, 0);
}

#[test]
fn academic_plan_is_phased_and_understaffed() {
    let plan = plan(&profile_fixture(academic_profile()));

    assert_eq!(plan.approach, ImplementationApproach::Phased);
    let durations: Vec<f64> = plan.phases.iter().map(|phase| phase.duration_months).collect();
    assert_eq!(durations, vec![5.22, 6.96, 3.48, 1.74]);
    assert_eq!(plan.total_duration_months, 17.4);
    assert_eq!(plan.risk_buffer, 0.3);
    assert_eq!(plan.risk_adjusted_duration_months, 22.62);
    assert_eq!(plan.target_months, 6.0);

    let resources = &plan.resource_optimization;
    assert_eq!(resources.peak_demand_fte, 12);
    assert_eq!(resources.utilization, 4.0);
    assert_eq!(resources.shortfall_fte, 9);
    assert!(resources.recommendation.contains("9 contracted FTE"));
    assert_eq!(resources.contracted_fte, 0);
    assert_eq!(plan.revised_target_months, None);
    assert_eq!(plan.effective_target_months(), 6.0);
}

#[test]
fn contracted_staff_leave_internal_figures_alone() {
    let plan = plan(&profile_fixture(academic_profile()));
    let declared = &plan.resource_optimization;

    let covered = declared.with_contracted(9);
    assert_eq!(covered.available_fte, declared.available_fte);
    assert_eq!(covered.utilization, declared.utilization);
    assert_eq!(covered.shortfall_fte, 9);
    assert_eq!(covered.staffed_fte(), 12);
    assert_eq!(covered.staffed_utilization(), 1.0);
    assert_eq!(covered.uncovered_fte(), 0);
    assert!(covered.recommendation.contains("cover the 9 FTE internal shortfall"));

    let partial = declared.with_contracted(3);
    assert_eq!(partial.uncovered_fte(), 6);
    assert_eq!(partial.staffed_utilization(), 2.0);
}

#[test]
fn approach_thresholds() {
    assert_eq!(
        ImplementationApproach::select(3.0, 50),
        ImplementationApproach::Accelerated
    );
    assert_eq!(
        ImplementationApproach::select(3.0, 100),
        ImplementationApproach::Standard
    );
    assert_eq!(
        ImplementationApproach::select(7.0, 10),
        ImplementationApproach::Phased
    );
    assert_eq!(
        ImplementationApproach::select(5.0, 500),
        ImplementationApproach::Phased
    );
}

#[test]
fn unknown_staffing_defaults_to_five() {
    let mut fixture = community_fixture();
    fixture.processed.profile.it_staff_count = None;

    let plan = plan(&fixture);

    assert_eq!(plan.resource_optimization.available_fte, 5);
    assert_eq!(plan.resource_optimization.shortfall_fte, 4);
}

#[test]
fn attaching_a_plan_leaves_the_input_untouched() {
    let fixture = community_fixture();
    let generator = SpecificationGenerator::new();
    let spec = generator.map_requirements_to_specification(
        &fixture.processed,
        &fixture.requirements,
        &fixture.metrics,
        &fixture.assessment,
    );
    let plan = plan(&fixture);

    let attached = generator.attach_plan(&spec, &plan);

    assert!(spec.implementation_timeline.is_none());
    assert!(attached.missing_sections().is_empty());
    let timeline = attached
        .implementation_timeline
        .as_ref()
        .expect("timeline attached");
    assert_eq!(timeline.phases.len(), 4);
    assert_eq!(timeline.risk_adjusted_months, 11.55);
    assert!(attached.has_section(SpecSection::ResourceAllocation));
}
