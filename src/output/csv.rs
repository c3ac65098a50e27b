use super::{Formatter, SampleOutput, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, sample: &SampleOutput) -> String {
        format!(
            "{},{},{:.6},{:.6},{:.6}",
            iso8601_timestamp(),
            sample.index,
            sample.time_secs,
            sample.input,
            sample.output
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,index,time_s,input,output")
    }
}
