pub mod analysis;
pub mod coefficients;
pub mod direct_form;
pub mod filter;

pub use analysis::{
    FrequencyPoint, StabilityReport, frequency_response, impulse_response, measure_gain_db,
    poles, response_at, stability, unwrap_phase,
};
pub use coefficients::Coefficients;
pub use direct_form::DirectFormFilter;
pub use filter::Filter;
