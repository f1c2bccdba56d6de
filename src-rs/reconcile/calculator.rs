use crate::task::RepairTask;

/// Parses an operator-entered amount.
///
/// Blank, zero, non-numeric and non-finite input all count as "not entered yet".
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value != 0.0)
}

/// Amount still owed on `task` for a bill of `entered_total`.
///
/// `None` means there is nothing to show: no usable total, or a bill smaller
/// than the advance already paid. `Some(0.0)` is a real amount.
pub fn compute_to_be_paid(task: Option<&RepairTask>, entered_total: &str) -> Option<f64> {
    to_be_paid_for(task, parse_amount(entered_total)?)
}

/// Same as [`compute_to_be_paid`] for an already parsed total.
pub fn to_be_paid_for(task: Option<&RepairTask>, total: f64) -> Option<f64> {
    match task {
        Some(task) if task.is_advance() => {
            let remaining = total - task.advance();
            (remaining >= 0.0).then_some(remaining)
        }
        _ => Some(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::PaymentType;
    use rstest::rstest;

    fn advance(how_much: Option<f64>) -> RepairTask {
        RepairTask {
            payment_type: Some(PaymentType::Advance),
            how_much,
            ..RepairTask::new("TK-1")
        }
    }

    fn paid_by(kind: &str) -> RepairTask {
        RepairTask {
            payment_type: Some(PaymentType::from(kind)),
            ..RepairTask::new("TK-2")
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("0")]
    #[case("0.00")]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    fn unusable_totals_have_no_value(#[case] entered: &str) {
        assert_eq!(compute_to_be_paid(Some(&advance(Some(500.0))), entered), None);
        assert_eq!(compute_to_be_paid(Some(&paid_by("Cash")), entered), None);
        assert_eq!(compute_to_be_paid(None, entered), None);
    }

    #[rstest]
    #[case("1200", Some(700.0))]
    #[case("500", Some(0.0))]
    #[case("300", None)]
    #[case(" 650.5 ", Some(150.5))]
    fn advance_is_netted_out(#[case] entered: &str, #[case] expected: Option<f64>) {
        assert_eq!(
            compute_to_be_paid(Some(&advance(Some(500.0))), entered),
            expected
        );
    }

    #[test]
    fn missing_advance_amount_counts_as_zero() {
        assert_eq!(compute_to_be_paid(Some(&advance(None)), "400"), Some(400.0));
    }

    #[test]
    fn other_payment_types_pay_the_full_total() {
        assert_eq!(compute_to_be_paid(Some(&paid_by("Cash")), "900"), Some(900.0));
    }

    #[test]
    fn advance_amount_is_ignored_without_advance_terms() {
        let task = RepairTask {
            how_much: Some(300.0),
            ..paid_by("Cheque")
        };
        assert_eq!(compute_to_be_paid(Some(&task), "900"), Some(900.0));
    }

    #[test]
    fn no_selection_or_unset_payment_type_pays_the_total() {
        assert_eq!(compute_to_be_paid(None, "250"), Some(250.0));
        assert_eq!(
            compute_to_be_paid(Some(&RepairTask::new("TK-3")), "250"),
            Some(250.0)
        );
    }

    #[test]
    fn negative_total_passes_through_without_advance() {
        assert_eq!(compute_to_be_paid(None, "-20"), Some(-20.0));
    }
}
