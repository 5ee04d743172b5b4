//! End-to-end tests for the claim splitting pipeline

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{HourWindow, Money};
use domain_splitting::{
    ClaimProcessor, GroupingScope, LineItemDraft, RuleApplied, SplitConfig, Violation,
};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn draft(
    claim: &str,
    revenue: Option<&str>,
    hcpcs: Option<&str>,
    description: &str,
    date: DateTime<Utc>,
    charge: Decimal,
) -> LineItemDraft {
    LineItemDraft {
        patient_id: Some("P001".to_string()),
        claim_id: Some(claim.to_string()),
        revenue_code: revenue.map(String::from),
        hcpcs_code: hcpcs.map(String::from),
        description: Some(description.to_string()),
        service_date: Some(date),
        units: Some(1),
        charge_amount: Some(charge),
        total_charges: None,
    }
}

fn other_row(claim: &str, date: DateTime<Utc>, charge: Decimal) -> LineItemDraft {
    draft(claim, Some("0270"), None, "MED/SURG SUPPLY", date, charge)
}

fn processor() -> ClaimProcessor {
    ClaimProcessor::new(SplitConfig::default()).unwrap()
}

// ============================================================================
// Splitting Scenarios
// ============================================================================

mod splitting_scenarios {
    use super::*;

    #[test]
    fn test_simple_split_thirty_lines() {
        // 30 uniform lines, limit 28: exactly 2 claims, 28 + 2, cut after line 28
        let rows: Vec<LineItemDraft> = (0..30)
            .map(|_| other_row("C100", ts(10, 8), dec!(100.00)))
            .collect();
        let result = processor().process(rows);

        assert_eq!(result.plans.len(), 1);
        let plan = &result.plans[0];
        assert_eq!(plan.claims.len(), 2);
        assert_eq!(plan.claims[0].line_count(), 28);
        assert_eq!(plan.claims[1].line_count(), 2);
        assert_eq!(plan.claims[0].ordinals().last(), Some(&27));
        assert_eq!(plan.claims[1].ordinals(), vec![28, 29]);
        assert!(result.all_valid());
    }

    #[test]
    fn test_no_split_under_limit() {
        let rows: Vec<LineItemDraft> = (0..28)
            .map(|_| other_row("C100", ts(10, 8), dec!(50.00)))
            .collect();
        let result = processor().process(rows);

        assert_eq!(result.plans[0].claims.len(), 1);
        assert!(!result.plans[0].was_split());
    }

    #[test]
    fn test_forced_split_oversized_group() {
        // one visit group of 35 (1 ER anchor + 34 associated services)
        let mut rows = vec![draft(
            "C100",
            Some("0450"),
            None,
            "ER VISIT",
            ts(10, 6),
            dec!(2500.00),
        )];
        for i in 0..34 {
            rows.push(draft(
                "C100",
                Some("0350"),
                None,
                "CT SCAN",
                ts(10, 7 + (i % 3)),
                dec!(400.00),
            ));
        }
        let result = processor().process(rows);

        let plan = &result.plans[0];
        assert_eq!(plan.claims.len(), 2);
        assert_eq!(plan.claims[0].line_count(), 28);
        assert_eq!(plan.claims[1].line_count(), 7);
        assert!(plan.groups.iter().any(|g| g.forced));

        let forced: Vec<_> = result
            .audit
            .records()
            .iter()
            .filter(|r| matches!(r.rule, RuleApplied::ForcedSplit { parts: 2, .. }))
            .collect();
        assert_eq!(forced.len(), 1);
        assert_eq!(forced[0].affected_ordinals.len(), 35);

        // membership integrity passes because of the matching record
        assert!(result.all_valid());
    }

    #[test]
    fn test_output_claims_keep_parent_claim_number() {
        let rows: Vec<LineItemDraft> = (0..30)
            .map(|_| other_row("C777", ts(10, 8), dec!(10.00)))
            .collect();
        let result = processor().process(rows);

        let plan = &result.plans[0];
        assert_eq!(plan.claims[0].reference(), "C777-01");
        assert_eq!(plan.claims[1].reference(), "C777-02");
        assert!(plan
            .claims
            .iter()
            .all(|c| c.claim_number.as_str() == "C777"));
    }
}

// ============================================================================
// ER Consolidation and Visit Grouping
// ============================================================================

mod grouping_scenarios {
    use super::*;

    #[test]
    fn test_er_consolidation_with_imaging() {
        // two ER visits 3 hours apart plus imaging 1 hour after the second:
        // a single visit group anchored at the first ER visit
        let rows = vec![
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(1800.00)),
            draft("C100", Some("0451"), None, "ER VISIT", ts(10, 9), dec!(900.00)),
            draft("C100", None, Some("70450"), "CT HEAD", ts(10, 10), dec!(650.00)),
        ];
        let result = processor().process(rows);

        let plan = &result.plans[0];
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].anchor_time, ts(10, 6));
        assert_eq!(
            plan.groups[0].ordinals.iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(result
            .audit
            .records()
            .iter()
            .any(|r| matches!(r.rule, RuleApplied::ConsolidatedEr { merged_visits: 2, .. })));
    }

    #[test]
    fn test_er_consolidation_is_transitive() {
        // chain spaced at window/2: one group even though the ends exceed it
        let config = SplitConfig {
            er_consolidation: HourWindow::new(6).unwrap(),
            ..SplitConfig::default()
        };
        let processor = ClaimProcessor::new(config).unwrap();
        let rows = vec![
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 0), dec!(100.00)),
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 3), dec!(100.00)),
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(100.00)),
        ];
        let result = processor.process(rows);

        assert_eq!(result.plans[0].groups.len(), 1);
        assert_eq!(result.plans[0].groups[0].ordinals.len(), 3);
    }

    #[test]
    fn test_distant_visits_stay_separate() {
        let rows = vec![
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(100.00)),
            draft("C100", Some("0450"), None, "ER VISIT", ts(12, 10), dec!(100.00)),
        ];
        let result = processor().process(rows);

        assert_eq!(result.plans[0].groups.len(), 2);
    }

    #[test]
    fn test_er_groups_ride_ahead_of_other_services() {
        // the ER group outranks earlier low-priority services in the output
        let rows = vec![
            other_row("C100", ts(9, 8), dec!(20.00)),
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(1500.00)),
        ];
        let result = processor().process(rows);

        let first = &result.plans[0].claims[0].lines[0];
        assert_eq!(first.item.ordinal(), 1);
    }
}

// ============================================================================
// Intake and Row Validation
// ============================================================================

mod intake_scenarios {
    use super::*;

    #[test]
    fn test_invalid_row_excluded_but_run_continues() {
        // 10 rows, one with a negative charge: 9 planned, 1 reported
        let mut rows: Vec<LineItemDraft> = (0..9)
            .map(|_| other_row("C100", ts(10, 8), dec!(100.00)))
            .collect();
        let mut bad = other_row("C100", ts(10, 9), dec!(-50.00));
        bad.description = Some("REFUND".to_string());
        rows.insert(4, bad);

        let result = processor().process(rows);

        assert_eq!(result.rejected_rows.len(), 1);
        assert_eq!(result.rejected_rows[0].ordinal, 4);
        let plan = &result.plans[0];
        assert_eq!(plan.line_count(), 9);
        // charge preservation holds over the valid rows only
        assert_eq!(plan.total_charges(), Money::new(dec!(900.00)));
        assert!(result.all_valid());
    }

    #[test]
    fn test_all_rows_invalid_yields_no_plans() {
        let rows = vec![
            LineItemDraft::default(),
            LineItemDraft {
                patient_id: Some("P001".to_string()),
                ..LineItemDraft::default()
            },
        ];
        let result = processor().process(rows);

        assert!(result.plans.is_empty());
        assert_eq!(result.rejected_rows.len(), 2);
        assert_eq!(result.summary.rejected_rows, 2);
    }
}

// ============================================================================
// Conservation and Determinism
// ============================================================================

mod invariant_scenarios {
    use super::*;

    #[test]
    fn test_conservation_across_mixed_claims() {
        let mut rows = Vec::new();
        for day in [9, 10, 11] {
            rows.push(draft("C100", Some("0450"), None, "ER VISIT", ts(day, 6), dec!(1000.00)));
            for hour in [7, 8, 9] {
                rows.push(draft("C100", None, Some("80053"), "LAB PANEL", ts(day, hour), dec!(75.25)));
            }
        }
        let total: Decimal = dec!(1000.00) * dec!(3) + dec!(75.25) * dec!(9);
        let result = processor().process(rows.clone());

        let mut seen: Vec<usize> = result.plans.iter().flat_map(|p| p.ordinals()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..rows.len()).collect::<Vec<_>>());

        let charges: Money = result.plans.iter().map(|p| p.total_charges()).sum();
        assert_eq!(charges, Money::new(total));
        assert!(result.all_valid());
    }

    #[test]
    fn test_determinism_byte_identical_plans() {
        let rows: Vec<LineItemDraft> = (0..40)
            .map(|i| {
                if i % 7 == 0 {
                    draft("C100", Some("0450"), None, "ER VISIT", ts(10, i % 24), dec!(500.00))
                } else {
                    other_row("C100", ts(10, i % 24), dec!(42.42))
                }
            })
            .collect();

        let first = processor().process(rows.clone());
        let second = processor().process(rows);

        let a = serde_json::to_string(&first.plans).unwrap();
        let b = serde_json::to_string(&second.plans).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validation_verdict_recorded_per_claim() {
        let rows = vec![
            other_row("C100", ts(10, 8), dec!(10.00)),
            other_row("C200", ts(10, 9), dec!(20.00)),
        ];
        let result = processor().process(rows);

        let verdicts = result
            .audit
            .records()
            .iter()
            .filter(|r| matches!(r.rule, RuleApplied::ValidationPassed))
            .count();
        assert_eq!(verdicts, 2);
    }

    #[test]
    fn test_limit_compliance_without_forced_split() {
        let rows: Vec<LineItemDraft> = (0..90)
            .map(|i| other_row("C100", ts(10, i % 24), dec!(5.00)))
            .collect();
        let result = processor().process(rows);

        for plan in &result.plans {
            for claim in &plan.claims {
                assert!(claim.line_count() <= 28);
            }
        }
        assert!(result.all_valid());
    }
}

// ============================================================================
// Scoping
// ============================================================================

mod scoping_scenarios {
    use super::*;

    #[test]
    fn test_claims_processed_independently() {
        let rows = vec![
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(100.00)),
            draft("C200", Some("0350"), None, "CT SCAN", ts(10, 7), dec!(200.00)),
        ];
        let result = processor().process(rows);

        // the imaging row belongs to another claim: it must not be absorbed
        // into the first claim's ER group
        assert_eq!(result.plans.len(), 2);
        assert!(result.plans.iter().all(|p| p.line_count() == 1));
    }

    #[test]
    fn test_per_patient_scope_merges_claims() {
        let config = SplitConfig {
            scope: GroupingScope::PerPatient,
            ..SplitConfig::default()
        };
        let processor = ClaimProcessor::new(config).unwrap();
        let rows = vec![
            draft("C100", Some("0450"), None, "ER VISIT", ts(10, 6), dec!(100.00)),
            draft("C200", Some("0350"), None, "CT SCAN", ts(10, 7), dec!(200.00)),
        ];
        let result = processor.process(rows);

        assert_eq!(result.plans.len(), 1);
        assert_eq!(result.plans[0].line_count(), 2);
    }
}

// ============================================================================
// Validation Reporting
// ============================================================================

mod validation_reporting {
    use super::*;

    #[test]
    fn test_reports_align_with_plans() {
        let rows = vec![
            other_row("C100", ts(10, 8), dec!(10.00)),
            other_row("C200", ts(10, 9), dec!(20.00)),
        ];
        let result = processor().process(rows);

        assert_eq!(result.plans.len(), result.validations.len());
        for (plan, report) in result.plans.iter().zip(&result.validations) {
            assert_eq!(plan.source, report.source);
            assert!(report.passed);
        }
    }

    #[test]
    fn test_violations_serialize_structurally() {
        let violation = Violation::LineLimitExceeded {
            claim_reference: "C100-01".to_string(),
            lines: 30,
            limit: 28,
        };
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["violation"], "line_limit_exceeded");
        assert_eq!(json["limit"], 28);
    }
}
