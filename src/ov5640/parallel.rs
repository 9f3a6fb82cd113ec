//! Frame capture over the OV5640 parallel (DVP) bus.
//!
//! Every signal is sampled on a rising edge of the pixel clock, the same way a camera
//! interface peripheral latches them:
//! * VSYNC high marks the blanking pulse between frames.
//! * HREF high marks valid pixel data on the data lines.
//!
//! The handshake waits for the VSYNC pulse, clocks in bytes while HREF is high, counts lines
//! on HREF falling edges and stops after the last line (or at the next VSYNC for JPEG).

use embedded_hal::digital::v2::InputPin;

/// Anything that can report the parallel bus signals. `pclk` is polled in a tight loop, so
/// reading it should be cheap.
pub trait ParallelBus {
    type Error;

    /// Vertical sync level.
    fn vsync(&mut self) -> Result<bool, Self::Error>;

    /// Horizontal reference level.
    fn href(&mut self) -> Result<bool, Self::Error>;

    /// Pixel clock level.
    fn pclk(&mut self) -> Result<bool, Self::Error>;

    /// The eight data lines, D0 in bit 0.
    fn data(&mut self) -> Result<u8, Self::Error>;
}

/// Parallel bus built from individual input pins.
pub struct ParallelPins<D, PCLK, VSYNC, HREF> {
    data: [D; 8],
    pclk: PCLK,
    vsync: VSYNC,
    href: HREF,
}

impl<D, PCLK, VSYNC, HREF> ParallelPins<D, PCLK, VSYNC, HREF> {
    /// `data[0]` is D0 (the sensor's Y2 pad when the bus is eight bits wide).
    pub fn new(data: [D; 8], pclk: PCLK, vsync: VSYNC, href: HREF) -> Self {
        ParallelPins {
            data,
            pclk,
            vsync,
            href,
        }
    }

    /// Hand the pins back.
    pub fn release(self) -> ([D; 8], PCLK, VSYNC, HREF) {
        (self.data, self.pclk, self.vsync, self.href)
    }
}

impl<D, PCLK, VSYNC, HREF, E> ParallelBus for ParallelPins<D, PCLK, VSYNC, HREF>
where
    D: InputPin<Error = E>,
    PCLK: InputPin<Error = E>,
    VSYNC: InputPin<Error = E>,
    HREF: InputPin<Error = E>,
{
    type Error = E;

    fn vsync(&mut self) -> Result<bool, E> {
        self.vsync.is_high()
    }

    fn href(&mut self) -> Result<bool, E> {
        self.href.is_high()
    }

    fn pclk(&mut self) -> Result<bool, E> {
        self.pclk.is_high()
    }

    fn data(&mut self) -> Result<u8, E> {
        let mut byte = 0;
        for (bit, pin) in self.data.iter().enumerate() {
            if pin.is_high()? {
                byte |= 1 << bit;
            }
        }
        Ok(byte)
    }
}

/// Poll budgets for the capture handshake. Hitting either one aborts the capture.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CaptureTimeout {
    /// Pixel clock reads without seeing the next edge.
    pub clock_polls: u32,
    /// Pixel clock edges spent waiting for VSYNC or HREF.
    pub sync_edges: u32,
}

impl Default for CaptureTimeout {
    fn default() -> Self {
        CaptureTimeout {
            clock_polls: 100_000,
            // Longer than one full-size frame, 2844 x 1968 pixels at two clocks each
            sync_edges: 12_000_000,
        }
    }
}

/// Capture errors, generic over the bus error `E`.
#[derive(Debug, Eq, PartialEq)]
pub enum CaptureError<E> {
    /// Reading a bus signal failed.
    Bus(E),
    /// The buffer cannot hold the configured frame. Nothing was written past `provided`.
    BufferTooSmall { required: usize, provided: usize },
    /// The pixel clock stopped, or VSYNC/HREF never arrived.
    Timeout,
    /// VSYNC ended the frame after `lines` lines.
    IncompleteFrame { lines: u16 },
}

/// Shape of the frame the sensor is streaming.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameFormat {
    /// Lines per frame, ignored for JPEG.
    pub lines: u16,
    /// Variable length JPEG stream terminated by VSYNC.
    pub jpeg: bool,
    /// Smallest buffer accepted for this format.
    pub min_buffer: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    /// Waiting for the VSYNC pulse that opens a frame.
    AwaitPulse,
    /// Waiting for the pulse to end.
    AwaitFrame,
    /// Clocking in lines.
    Frame,
}

/// Block until the next rising edge of the pixel clock.
fn next_edge<P: ParallelBus>(port: &mut P, polls: u32) -> Result<(), CaptureError<P::Error>> {
    let mut count = 0;
    while port.pclk().map_err(CaptureError::Bus)? {
        count += 1;
        if count >= polls {
            return Err(CaptureError::Timeout);
        }
    }
    while !port.pclk().map_err(CaptureError::Bus)? {
        count += 1;
        if count >= polls {
            return Err(CaptureError::Timeout);
        }
    }
    Ok(())
}

/// Offset just past the JPEG end-of-image marker, if there is one.
pub fn jpeg_end(buf: &[u8]) -> Option<usize> {
    buf.windows(2)
        .position(|w| w == [0xFF, 0xD9])
        .map(|pos| pos + 2)
}

/// Frame length once a peripheral (DMA) capture has moved `written` bytes into `buf`.
///
/// Raw frames must fill `format.min_buffer`, a short transfer is reported with the number of
/// whole lines that made it. JPEG frames are trimmed at the end-of-image marker; a buffer
/// filled to the end without one means the frame did not fit.
pub fn complete_frame<E>(
    format: &FrameFormat,
    buf: &[u8],
    written: usize,
) -> Result<usize, CaptureError<E>> {
    let written = written.min(buf.len());

    if !format.jpeg {
        if written >= format.min_buffer {
            return Ok(format.min_buffer);
        }
        let line_bytes = (format.min_buffer / format.lines.max(1) as usize).max(1);
        return Err(CaptureError::IncompleteFrame {
            lines: (written / line_bytes) as u16,
        });
    }

    match jpeg_end(&buf[..written]) {
        Some(end) => Ok(end),
        None if written == buf.len() => Err(CaptureError::BufferTooSmall {
            required: written + 1,
            provided: buf.len(),
        }),
        None => Ok(written),
    }
}

/// Capture one frame into `buf`, returning the number of bytes written.
///
/// The buffer is checked against `format.min_buffer` before the bus is touched, and never
/// written past its end. Errors are returned as-is, the caller decides whether to retry.
pub fn capture<P: ParallelBus>(
    port: &mut P,
    format: &FrameFormat,
    timeout: &CaptureTimeout,
    buf: &mut [u8],
) -> Result<usize, CaptureError<P::Error>> {
    if buf.len() < format.min_buffer {
        return Err(CaptureError::BufferTooSmall {
            required: format.min_buffer,
            provided: buf.len(),
        });
    }

    let mut phase = Phase::AwaitPulse;
    let mut waited: u32 = 0;
    let mut pos = 0;
    let mut lines: u16 = 0;
    let mut in_line = false;

    loop {
        next_edge(port, timeout.clock_polls)?;
        let vsync = port.vsync().map_err(CaptureError::Bus)?;

        match phase {
            Phase::AwaitPulse if vsync => {
                phase = Phase::AwaitFrame;
                waited = 0;
                continue;
            }
            Phase::AwaitFrame if !vsync => {
                phase = Phase::Frame;
                waited = 0;
            }
            Phase::Frame if vsync => break,
            Phase::Frame => {}
            _ => {
                waited += 1;
                if waited >= timeout.sync_edges {
                    return Err(CaptureError::Timeout);
                }
                continue;
            }
        }

        if port.href().map_err(CaptureError::Bus)? {
            if pos >= buf.len() {
                return Err(CaptureError::BufferTooSmall {
                    required: pos + 1,
                    provided: buf.len(),
                });
            }
            buf[pos] = port.data().map_err(CaptureError::Bus)?;
            pos += 1;
            in_line = true;
            waited = 0;
        } else if in_line {
            in_line = false;
            lines += 1;
            if !format.jpeg && lines == format.lines {
                return Ok(pos);
            }
        } else {
            waited += 1;
            if waited >= timeout.sync_edges {
                return Err(CaptureError::Timeout);
            }
        }
    }

    if in_line {
        lines += 1;
    }

    if format.jpeg {
        Ok(jpeg_end(&buf[..pos]).unwrap_or(pos))
    } else {
        Err(CaptureError::IncompleteFrame { lines })
    }
}
