//! Stack capture across function boundaries.

use pretty_assertions::assert_eq;
use stacklog::sink::MemorySink;
use stacklog::{wrap_error, Error, Level, Logger, ResultExt, StackFrame};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static ORIGIN_LINE: AtomicU32 = AtomicU32::new(0);
static CALLER_LINE: AtomicU32 = AtomicU32::new(0);

fn open_store() -> Result<(), Error> {
    ORIGIN_LINE.store(line!() + 1, Ordering::SeqCst);
    Err(io::Error::new(io::ErrorKind::NotFound, "store missing")).traced()
}

fn start_service() -> Result<(), Error> {
    CALLER_LINE.store(line!() + 1, Ordering::SeqCst);
    open_store()?;
    Ok(())
}

fn restart_service() -> Result<(), Error> {
    // Re-wrapping at every layer must not move the origin.
    start_service().traced()
}

static MAP_ERR_LINE: AtomicU32 = AtomicU32::new(0);

fn open_store_with_map_err() -> Result<(), Error> {
    MAP_ERR_LINE.store(line!() + 1, Ordering::SeqCst);
    Err(io::Error::new(io::ErrorKind::NotFound, "store missing")).map_err(Error::wrap)
}

fn frames_in_this_file(err: &Error) -> Vec<u32> {
    err.stacks()
        .iter()
        .filter(|frame| frame.file().ends_with("error_trace.rs"))
        .map(StackFrame::line)
        .collect()
}

#[test]
fn test_primary_frame_is_origin() {
    let err = start_service().unwrap_err();
    let origin = ORIGIN_LINE.load(Ordering::SeqCst);

    assert_eq!(err.primary_frame().line(), origin);
    assert!(err.primary_frame().file().ends_with("error_trace.rs"));
}

#[test]
fn test_caller_frames_precede_origin() {
    let err = start_service().unwrap_err();
    let origin = ORIGIN_LINE.load(Ordering::SeqCst);
    let caller = CALLER_LINE.load(Ordering::SeqCst);
    let lines = frames_in_this_file(&err);

    assert_eq!(lines.last(), Some(&origin));
    assert!(lines.len() >= 2, "expected caller frames in {:?}", lines);
    let caller_at = lines.iter().position(|&l| l == caller);
    let origin_at = lines.iter().rposition(|&l| l == origin);
    assert!(caller_at.is_some(), "missing caller frame in {:?}", lines);
    assert!(caller_at < origin_at, "frames out of order: {:?}", lines);
}

#[test]
fn test_wrap_as_fn_pointer_reports_calling_line() {
    let err = open_store_with_map_err().unwrap_err();
    let expected = MAP_ERR_LINE.load(Ordering::SeqCst);

    assert!(
        err.primary_frame().file().ends_with("error_trace.rs"),
        "primary frame {} outside the calling file",
        err.primary_frame()
    );
    assert_eq!(err.primary_frame().line(), expected);
    assert!(err
        .stacks()
        .iter()
        .all(|frame| !frame.file().contains("/library/")));
}

#[test]
fn test_rewrapping_keeps_stack() {
    let direct = start_service().unwrap_err();
    let rewrapped = restart_service().unwrap_err();

    assert_eq!(rewrapped.primary_frame(), direct.primary_frame());
    assert_eq!(rewrapped.stacks().len(), direct.stacks().len());

    let again = Error::wrap(rewrapped.clone());
    assert!(Error::ptr_eq(&again, &rewrapped));
    let optional = wrap_error(Some(again.clone())).unwrap();
    assert!(Error::ptr_eq(&optional, &rewrapped));
}

#[test]
fn test_logged_trace_lists_frames_oldest_first() {
    let sink = MemorySink::new();
    let logger = Logger::new(Level::Info, Arc::new(sink.clone()), &[]).unwrap();
    let err = restart_service().unwrap_err();

    logger.warn_error(&err).unwrap();

    let contents = sink.contents();
    let expected_position = format!("| {} |", err.primary_frame());
    assert!(contents.contains(&expected_position));
    assert!(contents.contains("error=store missing stack=\n\t"));

    let trace: Vec<&str> = contents
        .split("stack=")
        .nth(1)
        .unwrap()
        .lines()
        .skip(1)
        .collect();
    let expected: Vec<String> = err.stacks().iter().map(|f| format!("\t{}", f)).collect();
    assert_eq!(trace, expected);

    let rendered_lines: Vec<u32> = trace
        .iter()
        .filter_map(|entry| entry.trim().rsplit_once(':'))
        .filter(|(file, _)| file.ends_with("error_trace.rs"))
        .filter_map(|(_, line)| line.parse().ok())
        .collect();
    let origin = ORIGIN_LINE.load(Ordering::SeqCst);
    let caller = CALLER_LINE.load(Ordering::SeqCst);
    assert!(rendered_lines.len() >= 2, "expected caller frames in {:?}", trace);
    let caller_at = rendered_lines.iter().position(|&l| l == caller);
    let origin_at = rendered_lines.iter().rposition(|&l| l == origin);
    assert!(caller_at.is_some(), "missing caller frame in {:?}", trace);
    assert!(caller_at < origin_at, "frames out of order: {:?}", trace);
}

#[test]
fn test_error_inside_another_error_is_found() {
    #[derive(Debug)]
    struct RequestFailed(Error);

    impl std::fmt::Display for RequestFailed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("request failed")
        }
    }

    impl std::error::Error for RequestFailed {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    let sink = MemorySink::new();
    let logger = Logger::new(Level::Info, Arc::new(sink.clone()), &[]).unwrap();
    let inner = start_service().unwrap_err();
    logger.error_error(&RequestFailed(inner.clone())).unwrap();

    let expected_position = format!("| {} |", inner.primary_frame());
    assert!(sink.contents().contains(&expected_position));
    assert!(sink.contents().contains("error=store missing"));
}
