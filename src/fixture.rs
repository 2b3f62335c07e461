//! Fixtures for tests

use crate::parameters::ParameterSet;
use crate::sensitivity::SweepConfig;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The baseline parameter set
#[fixture]
pub fn params() -> ParameterSet {
    ParameterSet::default()
}

/// A coarse sweep configuration, to keep tests quick
#[fixture]
pub fn sweep_config() -> SweepConfig {
    SweepConfig {
        electricity_steps: 5,
        heatmap_steps: 4,
        ..SweepConfig::default()
    }
}
