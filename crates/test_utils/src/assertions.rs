//! Custom assertion helpers for pipeline invariants

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_splitting::{LineItemDraft, ProcessingResult};

/// Asserts every valid input row appears exactly once across all plans
///
/// Expected ordinals are the input positions minus the rejected rows.
pub fn assert_conservation(input_rows: usize, result: &ProcessingResult) {
    let mut expected: Vec<usize> = (0..input_rows).collect();
    expected.retain(|ordinal| {
        !result
            .rejected_rows
            .iter()
            .any(|rejection| rejection.ordinal == *ordinal)
    });

    let mut seen: Vec<usize> = result.plans.iter().flat_map(|p| p.ordinals()).collect();
    seen.sort_unstable();
    assert_eq!(
        seen, expected,
        "plan ordinals do not match the valid input rows"
    );
}

/// Asserts the summed plan charges equal the summed valid input charges
pub fn assert_charges_preserved(drafts: &[LineItemDraft], result: &ProcessingResult) {
    let expected: Money = drafts
        .iter()
        .enumerate()
        .filter(|(ordinal, _)| {
            !result
                .rejected_rows
                .iter()
                .any(|rejection| rejection.ordinal == *ordinal)
        })
        .map(|(_, d)| Money::new(d.charge_amount.unwrap_or(Decimal::ZERO)))
        .sum();
    let actual: Money = result.plans.iter().map(|p| p.total_charges()).sum();
    assert_eq!(expected, actual, "charge total changed during splitting");
}

/// Asserts no output claim exceeds the limit unless a forced split covers it
pub fn assert_limit_compliance(result: &ProcessingResult, max_lines: usize) {
    for plan in &result.plans {
        let forced = result.audit.forced_split_groups(&plan.source);
        for claim in &plan.claims {
            if claim.line_count() > max_lines {
                assert!(
                    claim.lines.iter().any(|l| forced.contains(&l.group)),
                    "claim {} exceeds the limit without a forced split",
                    claim.reference()
                );
            }
        }
    }
}

/// Asserts every plan passed integrity validation
pub fn assert_all_valid(result: &ProcessingResult) {
    for report in &result.validations {
        assert!(
            report.passed,
            "claim {} failed validation: {:?}",
            report.source, report.violations
        );
    }
}
