//! scale-stream-sources: Reading source implementations for scale-stream.

mod log_tail;

pub use log_tail::{
    day_key, fetch_latest, log_file_path, parse_weight_line, LogTailSource, TAIL_LINES,
    WEIGHT_MARKER,
};
