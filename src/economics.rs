//! The financial evaluation of the fleet conversion.
//!
//! Every function here is a pure function of a fully resolved [`ParameterSet`] plus the handful of
//! quantities which sensitivity analysis varies directly (electricity price, carbon price etc.).
//!
//! [`ParameterSet`]: crate::parameters::ParameterSet
pub mod annual_costs;
pub use annual_costs::{AnnualCostResult, calculate_annual_costs};
pub mod appraisal;
pub use appraisal::{FinancialResult, calculate_financials};
pub mod breakeven;
pub use breakeven::diesel_breakeven_price;
pub mod lcoh;
pub use lcoh::{LcohResult, STACK_REPLACEMENT_INTERVAL, calculate_lcoh};
