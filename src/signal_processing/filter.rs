/// Common trait for sample-by-sample filters
///
/// Implemented by `DirectFormFilter`. Analysis helpers are generic over it so
/// they can drive any stateful filter with synthetic input.
pub trait Filter {
    /// Process a single sample through the filter
    fn process(&mut self, sample: f32) -> f32;

    /// Process a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
