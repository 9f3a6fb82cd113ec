mod common;

use common::{pattern_lines, Timeline, TEST_TIMEOUT};
use core::convert::Infallible;
use ov5640_rs::ov5640::parallel::{capture, complete_frame, jpeg_end};
use ov5640_rs::ov5640::{CaptureError, FrameFormat, ParallelBus};

fn raw(lines: u16, line_bytes: usize) -> FrameFormat {
    FrameFormat {
        lines,
        jpeg: false,
        min_buffer: lines as usize * line_bytes,
    }
}

fn jpeg(min_buffer: usize) -> FrameFormat {
    FrameFormat {
        lines: 0,
        jpeg: true,
        min_buffer,
    }
}

#[test]
fn raw_frame_is_captured_in_order() {
    let lines = pattern_lines(4, 6);
    let mut sensor = Timeline::new().frame(&lines).vsync().build();
    let mut buf = [0u8; 24];

    assert_eq!(
        capture(&mut sensor, &raw(4, 6), &TEST_TIMEOUT, &mut buf),
        Ok(24)
    );
    assert_eq!(&buf[..], &lines.concat()[..]);
}

#[test]
fn larger_buffer_keeps_its_tail() {
    let lines = pattern_lines(2, 4);
    let mut sensor = Timeline::new().frame(&lines).vsync().build();
    let mut buf = [0xEEu8; 12];

    assert_eq!(
        capture(&mut sensor, &raw(2, 4), &TEST_TIMEOUT, &mut buf),
        Ok(8)
    );
    assert_eq!(&buf[..8], &lines.concat()[..]);
    assert!(buf[8..].iter().all(|b| *b == 0xEE));
}

#[test]
fn partial_frame_before_first_vsync_is_skipped() {
    let stale = pattern_lines(3, 6);
    let fresh: Vec<Vec<u8>> = pattern_lines(2, 6)
        .into_iter()
        .map(|line| line.iter().map(|b| b ^ 0xFF).collect())
        .collect();
    let mut sensor = Timeline::new()
        .line(&stale[1])
        .line(&stale[2])
        .frame(&fresh)
        .vsync()
        .build();
    let mut buf = [0u8; 12];

    assert_eq!(
        capture(&mut sensor, &raw(2, 6), &TEST_TIMEOUT, &mut buf),
        Ok(12)
    );
    assert_eq!(&buf[..], &fresh.concat()[..]);
}

#[test]
fn early_vsync_reports_incomplete_frame() {
    let lines = pattern_lines(2, 6);
    let mut sensor = Timeline::new().frame(&lines).vsync().build();
    let mut buf = [0u8; 24];

    assert_eq!(
        capture(&mut sensor, &raw(4, 6), &TEST_TIMEOUT, &mut buf),
        Err(CaptureError::IncompleteFrame { lines: 2 })
    );
}

#[test]
fn missing_vsync_times_out() {
    let mut sensor = Timeline::new().idle(50).build();
    let mut buf = [0u8; 24];

    assert_eq!(
        capture(&mut sensor, &raw(4, 6), &TEST_TIMEOUT, &mut buf),
        Err(CaptureError::Timeout)
    );
}

#[test]
fn frame_that_never_starts_times_out() {
    // VSYNC arrives but HREF never does
    let mut sensor = Timeline::new().vsync().build();
    let mut buf = [0u8; 24];

    assert_eq!(
        capture(&mut sensor, &raw(4, 6), &TEST_TIMEOUT, &mut buf),
        Err(CaptureError::Timeout)
    );
}

#[test]
fn jpeg_is_trimmed_at_end_of_image() {
    let image = vec![0xFF, 0xD8, 0x12, 0x34, 0xFF, 0xD9, 0x00, 0x00];
    let padding = vec![0x00; 8];
    let mut sensor = Timeline::new()
        .frame(&[image, padding])
        .vsync()
        .build();
    let mut buf = [0u8; 32];

    assert_eq!(
        capture(&mut sensor, &jpeg(16), &TEST_TIMEOUT, &mut buf),
        Ok(6)
    );
    assert_eq!(&buf[..6], &[0xFF, 0xD8, 0x12, 0x34, 0xFF, 0xD9]);
}

#[test]
fn jpeg_without_marker_keeps_everything() {
    let lines = vec![vec![0xFF, 0xD8, 0x01, 0x02], vec![0x03, 0x04]];
    let mut sensor = Timeline::new().frame(&lines).vsync().build();
    let mut buf = [0u8; 16];

    assert_eq!(
        capture(&mut sensor, &jpeg(8), &TEST_TIMEOUT, &mut buf),
        Ok(6)
    );
}

#[test]
fn oversized_jpeg_stops_at_buffer_end() {
    let lines = pattern_lines(3, 8);
    let mut sensor = Timeline::new().frame(&lines).vsync().build();
    let mut buf = [0u8; 16];

    assert_eq!(
        capture(&mut sensor, &jpeg(16), &TEST_TIMEOUT, &mut buf),
        Err(CaptureError::BufferTooSmall {
            required: 17,
            provided: 16
        })
    );
    assert_eq!(&buf[..], &lines[..2].concat()[..]);
}

#[test]
fn jpeg_end_needs_both_marker_bytes() {
    assert_eq!(jpeg_end(&[0xFF]), None);
    assert_eq!(jpeg_end(&[0xD9, 0xFF]), None);
    assert_eq!(jpeg_end(&[0xFF, 0xD9]), Some(2));
}

/// A bus whose data lines cannot be read.
struct BrokenData {
    inner: common::SimSensor,
}

impl ParallelBus for BrokenData {
    type Error = &'static str;

    fn vsync(&mut self) -> Result<bool, Self::Error> {
        self.inner.vsync().map_err(|e: Infallible| match e {})
    }

    fn href(&mut self) -> Result<bool, Self::Error> {
        self.inner.href().map_err(|e: Infallible| match e {})
    }

    fn pclk(&mut self) -> Result<bool, Self::Error> {
        self.inner.pclk().map_err(|e: Infallible| match e {})
    }

    fn data(&mut self) -> Result<u8, Self::Error> {
        Err("data lines")
    }
}

#[test]
fn bus_errors_are_passed_through() {
    let mut bus = BrokenData {
        inner: Timeline::new().frame(&pattern_lines(1, 4)).build(),
    };
    let mut buf = [0u8; 4];

    assert_eq!(
        capture(&mut bus, &raw(1, 4), &TEST_TIMEOUT, &mut buf),
        Err(CaptureError::Bus("data lines"))
    );
}

#[test]
fn transferred_raw_frame_is_trimmed_to_size() {
    // DMA moves whole words, so the last one may run past the frame
    let buf = [0u8; 28];
    assert_eq!(complete_frame::<Infallible>(&raw(3, 9), &buf, 28), Ok(27));
}

#[test]
fn short_raw_transfer_counts_whole_lines() {
    let buf = [0u8; 24];
    assert_eq!(
        complete_frame::<Infallible>(&raw(4, 6), &buf, 13),
        Err(CaptureError::IncompleteFrame { lines: 2 })
    );
    assert_eq!(
        complete_frame::<Infallible>(&raw(4, 6), &buf, 0),
        Err(CaptureError::IncompleteFrame { lines: 0 })
    );
}

#[test]
fn transferred_jpeg_is_trimmed_at_end_of_image() {
    let mut buf = [0u8; 16];
    buf[..6].copy_from_slice(&[0xFF, 0xD8, 0x12, 0x34, 0xFF, 0xD9]);

    assert_eq!(complete_frame::<Infallible>(&jpeg(8), &buf, 8), Ok(6));
    assert_eq!(complete_frame::<Infallible>(&jpeg(8), &buf, 5), Ok(5));
}

#[test]
fn jpeg_filling_the_buffer_did_not_fit() {
    let buf = [0x55u8; 12];
    assert_eq!(
        complete_frame::<Infallible>(&jpeg(8), &buf, 12),
        Err(CaptureError::BufferTooSmall {
            required: 13,
            provided: 12
        })
    );
}
