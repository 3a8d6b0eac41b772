//! The modifier stack: sum, multiply, round, then split.
//!
//! The order is fixed. Multiplying happens on the full sum and is rounded
//! half-up afterwards; splitting floor-divides the rounded value and only
//! then adds any per-charge bonus.

use serde::Serialize;

/// One additive contribution, with the text shown for it in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// The amount added.
    pub value: i64,
    /// Breakdown text, e.g. `25 (MR⋅B)` or `2d20 (14, 14)`.
    pub label: String,
}

impl Component {
    /// A component whose label is `value (tag)`.
    pub fn tagged(value: i64, tag: impl std::fmt::Display) -> Self {
        Self {
            value,
            label: format!("{value} ({tag})"),
        }
    }

    /// A component with a free-form label.
    pub fn labeled(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// How a total is divided between charges or targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split {
    /// Trigger label that chose this split, if any.
    pub mode: Option<String>,
    /// Floor divisor.
    pub divisor: i64,
    /// Flat bonus added to each share after dividing.
    pub per_charge: i64,
    /// Who receives each share, e.g. `3 allies`.
    pub recipients: String,
}

/// Every intermediate value of one stack evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Sum of all components.
    pub subtotal: i64,
    /// Subtotal after the multiplier, rounded half-up.
    pub multiplied: i64,
    /// The final amount, per share when split.
    pub total: i64,
}

/// Largest magnitude accepted for a single numeric modifier.
pub const MAX_MODIFIER: i64 = 1_000_000;

/// Round to nearest, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Evaluate the stack.
pub fn resolve_total(components: &[Component], multiplier: f64, split: Option<&Split>) -> Resolution {
    let subtotal = components.iter().fold(0i64, |a, c| a.saturating_add(c.value));
    let multiplied = round_half_up(subtotal as f64 * multiplier);
    let total = match split {
        Some(split) if split.divisor > 0 => multiplied
            .div_euclid(split.divisor)
            .saturating_add(split.per_charge),
        Some(split) => multiplied.saturating_add(split.per_charge),
        None => multiplied,
    };
    Resolution {
        subtotal,
        multiplied,
        total,
    }
}

/// Join component labels with ` + ` and append the multiplier and divisor.
///
/// The multiplier is only shown when it differs from 1 or `always_show`
/// is set.
pub fn render_calculation(
    components: &[Component],
    multiplier: f64,
    always_show: bool,
    split: Option<&Split>,
) -> String {
    let mut calc = components
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    if always_show || multiplier != 1.0 {
        calc.push_str(&format!(" ×{multiplier}"));
    }
    if let Some(split) = split.filter(|s| s.divisor > 1) {
        calc.push_str(&format!(" ÷ {}", split.divisor));
    }
    calc
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn split(divisor: i64, per_charge: i64) -> Split {
        Split {
            mode: None,
            divisor,
            per_charge,
            recipients: "1 target".to_string(),
        }
    }

    #[test]
    fn half_up_matches_js_round() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(100.8), 101);
    }

    #[test]
    fn multiply_before_dividing() {
        let parts = [Component::tagged(7, "sum")];
        let r = resolve_total(&parts, 3.0, Some(&split(3, 0)));
        assert_eq!(r.multiplied, 21);
        assert_eq!(r.total, 7);
        assert_ne!(r.total, (7 / 3) * 3);
    }

    #[test]
    fn per_charge_bonus_after_division() {
        let parts = [Component::tagged(100, "roll"), Component::tagged(10, "MR⋅D")];
        let r = resolve_total(&parts, 1.0, Some(&split(3, 5)));
        assert_eq!(r.subtotal, 110);
        assert_eq!(r.total, 36 + 5);
    }

    #[test]
    fn rounding_happens_after_multiplying() {
        let parts = [Component::tagged(83, "sum")];
        let r = resolve_total(&parts, 1.2, None);
        assert_eq!(r.multiplied, 100);
        let r = resolve_total(&[Component::tagged(101, "sum")], 1.7, None);
        assert_eq!(r.multiplied, 172);
    }

    #[test]
    fn negative_totals_floor_downward() {
        let r = resolve_total(&[Component::tagged(-7, "mods")], 1.0, Some(&split(3, 0)));
        assert_eq!(r.total, -3);
    }

    #[test]
    fn calculation_text() {
        let parts = [
            Component::labeled(28, "2d20 (14, 14)"),
            Component::tagged(25, "MR⋅B"),
            Component::tagged(25, "WR⋅B"),
            Component::tagged(5, "mods"),
        ];
        assert_eq!(
            render_calculation(&parts, 1.0, false, Some(&split(3, 0))),
            "2d20 (14, 14) + 25 (MR⋅B) + 25 (WR⋅B) + 5 (mods) ÷ 3"
        );
        assert_eq!(
            render_calculation(&parts[..1], 7.0, true, None),
            "2d20 (14, 14) ×7"
        );
    }

    proptest! {
        #[test]
        fn exact_multiples_survive_the_split(sum in -500i64..500, k in 1i64..8) {
            let r = resolve_total(&[Component::tagged(sum, "sum")], k as f64, Some(&split(k, 0)));
            prop_assert_eq!(r.total, sum);
        }

        #[test]
        fn unit_multiplier_is_identity(values in proptest::collection::vec(-200i64..200, 0..8)) {
            let parts: Vec<Component> = values.iter().map(|&v| Component::tagged(v, "x")).collect();
            let r = resolve_total(&parts, 1.0, None);
            prop_assert_eq!(r.total, values.iter().sum::<i64>());
        }
    }
}
