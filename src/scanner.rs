use crate::prelude::*;
use results_shared::RawRecord;

const RECORD_SEPARATOR: char = ':';
const RECORD_START: char = '{';

/// Extract the record embedded in a `<prefix>:<json object>` line.
///
/// Lines without a `:`, or whose content after the first `:` does not start with `{`, carry no
/// record. A line that looks like a record but does not parse as one is an error.
pub fn scan_line(line: &str) -> Result<Option<RawRecord>> {
    let Some((_, payload)) = line.split_once(RECORD_SEPARATOR) else {
        return Ok(None);
    };

    let payload = payload.trim();
    if !payload.starts_with(RECORD_START) {
        return Ok(None);
    }

    RawRecord::from_json_str(payload)
        .map(Some)
        .with_context(|| format!("Malformed record: {payload}"))
}
