//! Log tail reading source
//!
//! The scale service writes one log file per day (`service-YYYYMMDD.log`)
//! and logs every weight it receives as
//! `... Weight received from <scale-id>: <value> <unit>`. This source reads
//! the end of today's file and reports the most recent such line.

use chrono::{DateTime, Local};
use log::debug;
use scale_stream_core::ReadingSource;
use scale_stream_types::{Reading, ReadingStatus, DEFAULT_UNIT};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Phrase identifying a weight line
pub const WEIGHT_MARKER: &str = "Weight received from";

/// Number of trailing lines examined on each poll
pub const TAIL_LINES: usize = 50;

/// Bytes read per backwards step when looking for the tail
const TAIL_CHUNK: u64 = 8 * 1024;

/// Day key (`YYYYMMDD`) selecting the log file for `date`
pub fn day_key(date: DateTime<Local>) -> String {
    date.format("%Y%m%d").to_string()
}

/// Path of the log file for `day_key` inside `data_dir`
pub fn log_file_path(data_dir: &Path, day_key: &str) -> PathBuf {
    data_dir.join(format!("service-{}.log", day_key))
}

/// Parse a single log line into a reading.
///
/// The text after the marker must contain a colon; everything after the last
/// colon is split on whitespace into value and optional unit.
pub fn parse_weight_line(line: &str, observed_at: DateTime<Local>) -> Option<Reading> {
    let (_, after_marker) = line.split_once(WEIGHT_MARKER)?;
    let (_, payload) = after_marker.rsplit_once(':')?;

    let mut tokens = payload.split_whitespace();
    let value = tokens.next()?;
    let unit = tokens.next().unwrap_or(DEFAULT_UNIT);

    Some(Reading::new(value, unit, ReadingStatus::Stable, observed_at))
}

/// Most recent reading in the last [`TAIL_LINES`] lines of the day's log.
///
/// Never fails: a missing file, an I/O error or a tail without any weight
/// line all yield `None`.
pub fn fetch_latest(data_dir: &Path, day_key: &str) -> Option<Reading> {
    let observed_at = Local::now();
    let path = log_file_path(data_dir, day_key);

    let lines = match read_tail(&path, TAIL_LINES) {
        Ok(lines) => lines,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            debug!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    lines
        .iter()
        .rev()
        .filter(|line| line.contains(WEIGHT_MARKER))
        .find_map(|line| parse_weight_line(line, observed_at))
}

/// Read at most `max_lines` complete lines from the end of `path`.
///
/// Reads backwards in chunks so large logs cost no more than their tail.
/// Invalid UTF-8 is replaced rather than rejected.
fn read_tail(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();

    // One more newline than lines wanted: the last line usually ends in one
    while pos > 0 && count_newlines(&buf) <= max_lines {
        let step = TAIL_CHUNK.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))?;

        let mut chunk = vec![0u8; step as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines: Vec<&str> = text.lines().collect();
    if pos > 0 && !lines.is_empty() {
        // Started mid-line
        lines.remove(0);
    }

    let skip = lines.len().saturating_sub(max_lines);
    Ok(lines[skip..].iter().map(|line| line.to_string()).collect())
}

fn count_newlines(buf: &[u8]) -> usize {
    buf.iter().filter(|&&b| b == b'\n').count()
}

/// Reading source backed by the scale service's daily log
pub struct LogTailSource {
    data_dir: PathBuf,
}

impl LogTailSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

impl ReadingSource for LogTailSource {
    fn describe(&self) -> String {
        format!("log tail in {}", self.data_dir.display())
    }

    fn fetch_latest(&self) -> Option<Reading> {
        fetch_latest(&self.data_dir, &day_key(Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use tempfile::TempDir;

    const DAY: &str = "20261018";

    fn write_log(dir: &TempDir, contents: &str) {
        std::fs::write(log_file_path(dir.path(), DAY), contents).unwrap();
    }

    fn weight_line(time: &str, scale: &str, payload: &str) -> String {
        format!(
            "2026-10-18 {}.123 +00:00 [INF] Weight received from {}: {}\n",
            time, scale, payload
        )
    }

    fn noise_line(i: usize) -> String {
        format!("2026-10-18 12:00:{:02}.000 +00:00 [DBG] Heartbeat {}\n", i % 60, i)
    }

    #[test]
    fn test_parses_value_and_unit() {
        let dir = TempDir::new().unwrap();
        write_log(&dir, &weight_line("12:00:01", "X", "840 lb"));

        let reading = fetch_latest(dir.path(), DAY).expect("reading");
        assert_eq!(reading.value(), "840");
        assert_eq!(reading.unit(), "lb");
        assert_eq!(reading.status(), ReadingStatus::Stable);
    }

    #[test]
    fn test_most_recent_line_wins() {
        let dir = TempDir::new().unwrap();
        let mut log = String::new();
        log.push_str(&weight_line("12:00:01", "scale-001", "100 lb"));
        log.push_str(&noise_line(1));
        log.push_str(&weight_line("12:00:02", "scale-001", "1205 kg"));
        log.push_str(&noise_line(2));
        write_log(&dir, &log);

        let reading = fetch_latest(dir.path(), DAY).expect("reading");
        assert_eq!(reading.value(), "1205");
        assert_eq!(reading.unit(), "kg");
    }

    #[test]
    fn test_unit_defaults_to_lb() {
        let dir = TempDir::new().unwrap();
        write_log(&dir, &weight_line("12:00:01", "scale-001", "42.50"));

        let reading = fetch_latest(dir.path(), DAY).expect("reading");
        assert_eq!(reading.value(), "42.50");
        assert_eq!(reading.unit(), "lb");
    }

    #[test]
    fn test_value_formatting_is_preserved() {
        let observed = Local::now();
        let reading =
            parse_weight_line("Weight received from s: -0012.30 LB", observed).expect("reading");
        assert_eq!(reading.value(), "-0012.30");
        assert_eq!(reading.unit(), "LB");
        assert_eq!(reading.observed_at(), observed);
    }

    #[test]
    fn test_payload_is_after_last_colon() {
        let reading = parse_weight_line(
            "Weight received from tcp://10.0.0.5:4001: 77 kg",
            Local::now(),
        )
        .expect("reading");
        assert_eq!(reading.value(), "77");
        assert_eq!(reading.unit(), "kg");
    }

    #[test]
    fn test_malformed_marker_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut log = String::new();
        log.push_str(&weight_line("12:00:01", "scale-001", "300 lb"));
        log.push_str("2026-10-18 [INF] Weight received from scale-001 without colon\n");
        log.push_str("2026-10-18 [INF] Weight received from scale-001:   \n");
        write_log(&dir, &log);

        let reading = fetch_latest(dir.path(), DAY).expect("reading");
        assert_eq!(reading.value(), "300");
    }

    #[test]
    fn test_no_matching_line() {
        let dir = TempDir::new().unwrap();
        let log: String = (0..10).map(noise_line).collect();
        write_log(&dir, &log);

        assert!(fetch_latest(dir.path(), DAY).is_none());
    }

    #[test]
    fn test_only_last_fifty_lines_are_scanned() {
        let dir = TempDir::new().unwrap();
        let mut log = weight_line("11:59:59", "scale-001", "999 lb");
        for i in 0..TAIL_LINES {
            log.push_str(&noise_line(i));
        }
        write_log(&dir, &log);
        assert!(fetch_latest(dir.path(), DAY).is_none());

        // Exactly at the edge of the window it is still found
        let mut log = weight_line("11:59:59", "scale-001", "999 lb");
        for i in 0..TAIL_LINES - 1 {
            log.push_str(&noise_line(i));
        }
        write_log(&dir, &log);
        assert_eq!(fetch_latest(dir.path(), DAY).unwrap().value(), "999");
    }

    #[test]
    fn test_large_file_tail() {
        let dir = TempDir::new().unwrap();
        let mut log = String::new();
        for i in 0..5_000 {
            writeln!(log, "2026-10-18 [DBG] padding line {} {}", i, "x".repeat(80)).unwrap();
        }
        log.push_str(&weight_line("12:30:00", "scale-001", "55 kg"));
        write_log(&dir, &log);

        let lines = read_tail(&log_file_path(dir.path(), DAY), TAIL_LINES).unwrap();
        assert_eq!(lines.len(), TAIL_LINES);
        assert!(lines[0].starts_with("2026-10-18 [DBG] padding line 4951 "));
        assert_eq!(fetch_latest(dir.path(), DAY).unwrap().value(), "55");
    }

    #[test]
    fn test_crlf_and_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"garbage \xff\xfe line\r\n".to_vec();
        bytes.extend_from_slice(b"[INF] Weight received from scale-001: 12 kg\r\n");
        std::fs::write(log_file_path(dir.path(), DAY), bytes).unwrap();

        let reading = fetch_latest(dir.path(), DAY).expect("reading");
        assert_eq!(reading.value(), "12");
        assert_eq!(reading.unit(), "kg");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(fetch_latest(dir.path(), DAY).is_none());
    }

    #[test]
    fn test_unreadable_path_is_absent() {
        let dir = TempDir::new().unwrap();
        // A directory where the log file should be
        std::fs::create_dir(log_file_path(dir.path(), DAY)).unwrap();
        assert!(fetch_latest(dir.path(), DAY).is_none());
    }

    #[test]
    fn test_log_file_naming() {
        let path = log_file_path(Path::new("/var/log/scale"), "20260102");
        assert_eq!(path, PathBuf::from("/var/log/scale/service-20260102.log"));

        let date = chrono::TimeZone::with_ymd_and_hms(&Local, 2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(day_key(date), "20260102");
    }

    #[test]
    fn test_source_reads_todays_file() {
        let dir = TempDir::new().unwrap();
        let today = day_key(Local::now());
        std::fs::write(
            log_file_path(dir.path(), &today),
            weight_line("08:00:00", "scale-001", "640 lb"),
        )
        .unwrap();

        let source = LogTailSource::new(dir.path());
        assert_eq!(source.fetch_latest().unwrap().value(), "640");
        assert!(source.describe().contains(&dir.path().display().to_string()));
    }
}
