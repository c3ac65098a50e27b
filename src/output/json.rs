use serde_json::json;

use super::{Formatter, SampleOutput, iso8601_timestamp};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, sample: &SampleOutput) -> String {
        json!({
            "ts": iso8601_timestamp(),
            "index": sample.index,
            "time_s": sample.time_secs,
            "input": sample.input,
            "output": sample.output,
        })
        .to_string()
    }
}
