mod signal;

pub use signal::{SineOscillator, generate_sine, unit_impulse};
