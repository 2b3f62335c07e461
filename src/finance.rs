//! General functions related to finance.
use crate::units::{Dimensionless, Money, MoneyPerYear, Year};
use anyhow::{Result, ensure};
use log::debug;
use std::ops::RangeInclusive;

/// The range of discount rates searched for an internal rate of return (-50% to +200%)
pub const IRR_SEARCH_RANGE: RangeInclusive<f64> = -0.5..=2.0;

/// Bisection stops once |NPV| at the midpoint falls below this amount (currency units)
pub const IRR_NPV_TOLERANCE: Money = Money(1.0);

/// Maximum number of bisection steps when searching for an internal rate of return
pub const IRR_MAX_ITERATIONS: u32 = 100;

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of an asset: `capex * crf` is the
/// constant annual charge which repays `capex` over `lifetime` years at `discount_rate`. With a
/// zero discount rate this is exactly `1 / lifetime`.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Result<Dimensionless> {
    ensure!(lifetime > 0, "Amortisation lifetime must be at least one year");
    ensure!(
        discount_rate.is_finite() && discount_rate >= Dimensionless(0.0),
        "Discount rate must be a finite, non-negative number"
    );

    if discount_rate == Dimensionless(0.0) {
        return Ok(Dimensionless(1.0) / Dimensionless(f64::from(lifetime)));
    }

    // r / (1 - (1 + r)^-n), evaluated without cancellation for rates close to zero
    let rate = discount_rate.value();
    let annuity_fraction = -(-f64::from(lifetime) * rate.ln_1p()).exp_m1();
    Ok(Dimensionless(rate / annuity_fraction))
}

/// Calculates the constant annual charge which amortises `capital_cost`
pub fn annual_capital_cost(
    capital_cost: Money,
    lifetime: u32,
    discount_rate: Dimensionless,
) -> Result<MoneyPerYear> {
    let crf = capital_recovery_factor(lifetime, discount_rate)?;
    Ok(capital_cost * crf / Year(1.0))
}

/// Present value of a constant annual amount received at the end of each of `lifetime` years
pub fn annuity_present_value(
    annual_amount: MoneyPerYear,
    lifetime: u32,
    discount_rate: Dimensionless,
) -> Result<Money> {
    let crf = capital_recovery_factor(lifetime, discount_rate)?;
    Ok(annual_amount * Year(1.0) / crf)
}

/// Calculates the net present value of a series of cash flows.
///
/// Index 0 is year 0 and is not discounted; entry `t` is divided by `(1 + rate)^t`.
pub fn npv(cash_flows: &[Money], discount_rate: Dimensionless) -> Money {
    let growth = 1.0 + discount_rate.value();
    let mut discount = 1.0;
    let mut total = Money(0.0);
    for cash_flow in cash_flows {
        total = total + *cash_flow / Dimensionless(discount);
        discount *= growth;
    }

    total
}

/// Calculates the internal rate of return of a series of cash flows by bisection.
///
/// The search is confined to [`IRR_SEARCH_RANGE`]. If NPV does not change sign across the range
/// then `Ok(None)` is returned: the project never breaks even at any rate considered. Bisection
/// stops as soon as |NPV| at the midpoint is below [`IRR_NPV_TOLERANCE`]; if that never happens
/// within [`IRR_MAX_ITERATIONS`] steps, the midpoint of the final bracket is returned.
///
/// # Returns
///
/// An error if the series has fewer than two entries or contains only zeros.
pub fn irr(cash_flows: &[Money]) -> Result<Option<Dimensionless>> {
    ensure!(
        cash_flows.len() >= 2,
        "Cash flow series must cover at least two years to have an internal rate of return"
    );
    ensure!(
        cash_flows.iter().any(|cash_flow| *cash_flow != Money(0.0)),
        "Cash flow series is entirely zero"
    );

    let mut lo = Dimensionless(*IRR_SEARCH_RANGE.start());
    let mut hi = Dimensionless(*IRR_SEARCH_RANGE.end());
    let mut npv_lo = npv(cash_flows, lo);
    let npv_hi = npv(cash_flows, hi);
    if npv_lo.value() * npv_hi.value() >= 0.0 {
        debug!("No sign change in NPV between {lo:?} and {hi:?}: no IRR in search range");
        return Ok(None);
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (lo + hi) / Dimensionless(2.0);
        let npv_mid = npv(cash_flows, mid);
        if npv_mid.value().abs() < IRR_NPV_TOLERANCE.value() {
            return Ok(Some(mid));
        }

        if npv_lo.value() * npv_mid.value() < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = npv_mid;
        }
    }

    debug!("IRR bisection hit the iteration cap without meeting the NPV tolerance");
    Ok(Some((lo + hi) / Dimensionless(2.0)))
}

/// The cash flows of a project: an outlay in year 0 followed by a constant annual amount.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CashFlowSeries(Vec<Money>);

impl CashFlowSeries {
    /// Build a series of `years + 1` entries: `-capital_cost`, then `annual_amount` for each year
    pub fn new(capital_cost: Money, annual_amount: MoneyPerYear, years: u32) -> Result<Self> {
        ensure!(years > 0, "Project life must be at least one year");

        let per_year = annual_amount * Year(1.0);
        let flows = std::iter::once(-capital_cost)
            .chain((0..years).map(|_| per_year))
            .collect();

        Ok(Self(flows))
    }

    /// The cash flows, indexed by year
    pub fn as_slice(&self) -> &[Money] {
        &self.0
    }

    /// Net present value of the series at the given discount rate
    pub fn npv(&self, discount_rate: Dimensionless) -> Money {
        npv(&self.0, discount_rate)
    }

    /// Internal rate of return of the series, if one exists in the search range
    pub fn irr(&self) -> Result<Option<Dimensionless>> {
        irr(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn money(values: &[f64]) -> Vec<Money> {
        values.iter().copied().map(Money).collect()
    }

    #[rstest]
    #[case(10, 0.0, 0.1)] // Edge case: discount_rate==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(5, 0.03, 0.2183545714005762)]
    #[case(25, 0.08, 0.09367877905196811)]
    #[case(1, 0.5, 1.5)]
    fn test_capital_recovery_factor(
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(lifetime, Dimensionless(discount_rate)).unwrap();
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    #[case(50)]
    fn test_capital_recovery_factor_zero_rate_is_straight_line(#[case] lifetime: u32) {
        let result = capital_recovery_factor(lifetime, Dimensionless(0.0)).unwrap();
        assert_eq!(result, Dimensionless(1.0 / lifetime as f64));
    }

    #[test]
    fn test_capital_recovery_factor_stable_over_range() {
        for lifetime in 1..=50 {
            for step in 0..=50 {
                let rate = Dimensionless(f64::from(step) * 0.01);
                let crf = capital_recovery_factor(lifetime, rate).unwrap();
                assert!(crf.is_finite());
                // Never cheaper than straight-line repayment
                assert!(crf.value() >= 1.0 / f64::from(lifetime) - 1e-12);
            }
        }
    }

    #[rstest]
    #[case(1e-9)]
    #[case(1e-12)]
    #[case(1e-15)]
    #[case(1e-17)]
    #[case(f64::MIN_POSITIVE)]
    fn test_capital_recovery_factor_near_zero_rate_tends_to_straight_line(#[case] rate: f64) {
        let crf = capital_recovery_factor(20, Dimensionless(rate)).unwrap();
        assert!(crf.is_finite());
        assert_approx_eq!(f64, crf.value(), 0.05, epsilon = 1e-8);
    }

    #[test]
    fn test_capital_recovery_factor_invalid() {
        assert_error!(
            capital_recovery_factor(0, Dimensionless(0.05)),
            "Amortisation lifetime must be at least one year"
        );
        assert_error!(
            capital_recovery_factor(10, Dimensionless(-0.01)),
            "Discount rate must be a finite, non-negative number"
        );
    }

    #[rstest]
    #[case(1000.0, 10, 0.05, 129.5045749654567)]
    #[case(500.0, 5, 0.03, 109.17728570028798)]
    #[case(2000.0, 20, 0.0, 100.0)] // Zero discount rate
    fn test_annual_capital_cost(
        #[case] capital_cost: f64,
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result =
            annual_capital_cost(Money(capital_cost), lifetime, Dimensionless(discount_rate))
                .unwrap();
        assert_approx_eq!(MoneyPerYear, result, MoneyPerYear(expected), epsilon = 1e-8);
    }

    #[rstest]
    #[case(100.0, 20, 0.0, 2000.0)]
    #[case(129.5045749654567, 10, 0.05, 1000.0)]
    fn test_annuity_present_value(
        #[case] annual_amount: f64,
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = annuity_present_value(
            MoneyPerYear(annual_amount),
            lifetime,
            Dimensionless(discount_rate),
        )
        .unwrap();
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-8);
    }

    #[rstest]
    #[case(&[-100.0, 60.0, 60.0], 0.0, 20.0)]
    #[case(&[-100.0, 110.0], 0.1, 0.0)]
    #[case(&[50.0, -121.0], 0.1, -60.0)]
    #[case(&[-1000.0, 500.0, 500.0, 500.0], 0.05, 361.6240146852392)]
    fn test_npv(#[case] cash_flows: &[f64], #[case] rate: f64, #[case] expected: f64) {
        let result = npv(&money(cash_flows), Dimensionless(rate));
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-9);
    }

    #[test]
    fn test_npv_empty() {
        assert_eq!(npv(&[], Dimensionless(0.08)), Money(0.0));
    }

    #[rstest]
    #[case(&[-100.0, 110.0])]
    #[case(&[-1000.0, 300.0, 400.0, 500.0])]
    #[case(&[-22_995_762.7, 4_913_263.3, 4_913_263.3, 4_913_263.3, 4_913_263.3, 4_913_263.3])]
    #[case(&[-1000.0, 400.0, 400.0])] // Negative IRR
    fn test_irr_zeroes_npv(#[case] cash_flows: &[f64]) {
        let cash_flows = money(cash_flows);
        let rate = irr(&cash_flows).unwrap().unwrap();
        assert!(IRR_SEARCH_RANGE.contains(&rate.value()));
        assert!(npv(&cash_flows, rate).value().abs() < IRR_NPV_TOLERANCE.value());
    }

    #[test]
    fn test_irr_simple() {
        let rate = irr(&money(&[-100_000.0, 110_000.0])).unwrap().unwrap();
        assert_approx_eq!(f64, rate.value(), 0.1, epsilon = 1e-4);
    }

    #[rstest]
    #[case(&[-100.0, -10.0, -10.0])] // All negative
    #[case(&[100.0, 10.0, 10.0])] // All positive
    #[case(&[-1000.0, 1.0, 1.0])] // Loss too large to recover even at -50%
    fn test_irr_none(#[case] cash_flows: &[f64]) {
        assert_eq!(irr(&money(cash_flows)).unwrap(), None);
    }

    #[test]
    fn test_irr_degenerate() {
        assert_error!(
            irr(&money(&[-100.0])),
            "Cash flow series must cover at least two years to have an internal rate of return"
        );
        assert_error!(irr(&money(&[0.0, 0.0, 0.0])), "Cash flow series is entirely zero");
    }

    #[test]
    fn test_cash_flow_series() {
        let series = CashFlowSeries::new(Money(1000.0), MoneyPerYear(300.0), 3).unwrap();
        assert_eq!(series.as_slice(), money(&[-1000.0, 300.0, 300.0, 300.0]));
        assert_eq!(series.npv(Dimensionless(0.0)), Money(-100.0));
        assert_eq!(series.irr().unwrap().map(|r| r.value() < 0.0), Some(true));
    }

    #[test]
    fn test_cash_flow_series_invalid_life() {
        assert_error!(
            CashFlowSeries::new(Money(1000.0), MoneyPerYear(300.0), 0),
            "Project life must be at least one year"
        );
    }
}
