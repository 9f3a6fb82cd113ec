//! Snapshot capture of a single OV5640 frame with the STM32F7 DCMI peripheral, DMA2 moving the
//! data into memory. Assumes `configure_pins` has routed the parallel bus to the DCMI.

use crate::ov5640::{complete_frame, CaptureError, CaptureTimeout, FrameFormat};
use stm32f7xx_hal::pac::{DCMI, DMA2, RCC};

#[cfg(feature = "rttdebug")]
use rtt_target::rprintln;

// DMA2-Stream 1-Channel 1 is used to interface with DCMI
const DMA_STREAM: usize = 1;
const DMA_CHANNEL: u8 = 1;

// DCMI data register address
const DCMI_DR_ADDR: u32 = 0x5005_0000 + 0x28;

// Largest transfer a single DMA stream can count, in words
const MAX_TRANSFER_WORDS: usize = 0xFFFF;

// Stream 1 flags in DMA2 LIFCR
const STREAM1_FLAGS: u32 = 0xF40;

// DCMI raw interrupt status bits
const RIS_FRAME: u32 = 1 << 0;
const RIS_OVR: u32 = 1 << 1;
const RIS_ERR: u32 = 1 << 2;
const RIS_ALL: u32 = 0x1F;

/// Errors raised by the DCMI or its DMA stream.
#[derive(Debug, Eq, PartialEq)]
pub enum DcmiError {
    /// The DCMI FIFO overflowed before DMA drained it.
    Overrun,
    /// Embedded synchronization codes arrived out of order.
    SyncError,
    /// The frame needs more words than one DMA transfer can count.
    TransferTooLarge,
}

/// DCMI and DMA2 configured for one-frame captures.
pub struct Dcmi {
    dcmi: DCMI,
    dma: DMA2,
}

impl Dcmi {
    /// Take the peripherals and enable their clocks.
    pub fn new(dcmi: DCMI, dma: DMA2) -> Self {
        let rcc_regs = unsafe { &(*RCC::ptr()) };

        // Enable peripheral clocks
        rcc_regs.ahb2enr.modify(|_, w| w.dcmien().set_bit());
        rcc_regs.ahb1enr.modify(|_, w| w.dma2en().set_bit());

        Dcmi { dcmi, dma }
    }

    /// Capture one frame into `buf`, returning the number of bytes in it. `timeout.sync_edges`
    /// bounds the number of status polls spent waiting for the end of the frame.
    pub fn capture(
        &mut self,
        format: &FrameFormat,
        timeout: &CaptureTimeout,
        buf: &mut [u32],
    ) -> Result<usize, CaptureError<DcmiError>> {
        let capacity = buf.len() * 4;
        if capacity < format.min_buffer {
            return Err(CaptureError::BufferTooSmall {
                required: format.min_buffer,
                provided: capacity,
            });
        }

        // Raw frames have a known size, JPEG may use the whole buffer
        let words = if format.jpeg {
            buf.len().min(MAX_TRANSFER_WORDS)
        } else {
            (format.min_buffer + 3) / 4
        };
        if words > MAX_TRANSFER_WORDS {
            return Err(CaptureError::Bus(DcmiError::TransferTooLarge));
        }

        self.stop();
        self.dma_setup(buf.as_mut_ptr() as u32, words as u16);
        self.dcmi_setup(format.jpeg);
        self.start();

        let mut polls: u32 = 0;
        let result = loop {
            let ris = self.dcmi.ris.read().bits();
            if ris & RIS_OVR != 0 {
                break Err(CaptureError::Bus(DcmiError::Overrun));
            }
            if ris & RIS_ERR != 0 {
                break Err(CaptureError::Bus(DcmiError::SyncError));
            }
            if ris & RIS_FRAME != 0 {
                break Ok(());
            }
            polls += 1;
            if polls >= timeout.sync_edges {
                break Err(CaptureError::Timeout);
            }
        };

        self.stop();
        result?;

        let remaining = self.dma.st[DMA_STREAM].ndtr.read().ndt().bits() as usize;
        let written = (words - remaining) * 4;

        #[cfg(feature = "rttdebug")]
        rprintln!("DCMI transferred {} bytes", written);

        complete_frame(format, frame_bytes(buf), written)
    }

    /// Hand the peripherals back.
    pub fn release(mut self) -> (DCMI, DMA2) {
        self.stop();
        (self.dcmi, self.dma)
    }

    fn dcmi_setup(&mut self, jpeg: bool) {
        // Data sampled on the PCLK rising edge, VSYNC high during blanking, one frame only
        self.dcmi.cr.write(|w| {
            w.vspol()
                .set_bit()
                .hspol()
                .clear_bit()
                .pckpol()
                .set_bit()
                .cm()
                .set_bit()
                .jpeg()
                .bit(jpeg)
        });

        unsafe {
            self.dcmi.icr.write(|w| w.bits(RIS_ALL));
        }
    }

    fn dma_setup(&mut self, dest_addr: u32, words: u16) {
        let stream = &self.dma.st[DMA_STREAM];

        unsafe {
            // Clear any stale interrupts
            self.dma.lifcr.write(|w| w.bits(STREAM1_FLAGS));

            // Configure DMA
            stream.cr.write(|w| {
                w
                    // Flow controller (0 = DMA, 1 = peripheral)
                    .pfctrl()
                    .clear_bit()
                    // Direction
                    .dir()
                    .peripheral_to_memory()
                    // One shot, single buffer
                    .circ()
                    .clear_bit()
                    .dbm()
                    .clear_bit()
                    // Peripheral address increment
                    .pinc()
                    .clear_bit()
                    // Memory address increment
                    .minc()
                    .set_bit()
                    // Peripheral transfer size
                    .psize()
                    .bits32()
                    // Memory transfer size
                    .msize()
                    .bits32()
                    // Priority level
                    .pl()
                    .high()
                    // Peripheral burst
                    .pburst()
                    .single()
                    // Memory burst
                    .mburst()
                    .single()
                    // Channel
                    .chsel()
                    .bits(DMA_CHANNEL)
            });
        }

        // Configure addresses and size
        stream.ndtr.write(|w| w.ndt().bits(words));
        stream.par.write(|w| w.pa().bits(DCMI_DR_ADDR));
        stream.m0ar.write(|w| w.m0a().bits(dest_addr));
    }

    fn start(&mut self) {
        // Enable DMA2
        self.dma.st[DMA_STREAM].cr.modify(|_, w| w.en().set_bit());

        // Enable the DCMI peripheral and start capture
        self.dcmi
            .cr
            .modify(|_, w| w.enable().set_bit().capture().set_bit());
    }

    fn stop(&mut self) {
        // Disable the DCMI peripheral and stop capture
        self.dcmi
            .cr
            .modify(|_, w| w.enable().clear_bit().capture().clear_bit());

        // Disable DMA2, the stream only lets go once the current word is written
        let stream = &self.dma.st[DMA_STREAM];
        stream.cr.modify(|_, w| w.en().clear_bit());
        while stream.cr.read().en().bit_is_set() {}
    }
}

/// Byte view of a word aligned frame buffer, in memory order.
pub fn frame_bytes(buf: &[u32]) -> &[u8] {
    unsafe { core::slice::from_raw_parts(buf.as_ptr() as *const u8, buf.len() * 4) }
}
