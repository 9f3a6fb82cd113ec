//! Driver for the OmniVision OV5640 image sensor.
//! * `ov5640` holds the register map, the configuration sequencer and frame capture over the
//!   parallel bus. It only depends on `embedded-hal`, so it runs on any microcontroller.
//! * `board` wires the sensor up on the STM32F746G Discovery Board (feature `board`).

#![cfg_attr(not(test), no_std)]

pub mod ov5640;

#[cfg(feature = "board")]
pub mod board;
