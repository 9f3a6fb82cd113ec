//! Miscellaneous helper functions.

use core::panic::PanicInfo;
use rtt_target::rprintln;

/// Number of leading bytes printed by `frame_summary`.
const PREVIEW_BYTES: usize = 8;

/// Print the size, a simple checksum and the first few bytes of a captured frame.
pub fn frame_summary(frame: &[u8]) {
    let checksum = frame
        .iter()
        .fold(0u32, |acc, byte| acc.wrapping_add(*byte as u32));

    rprintln!("Captured {} bytes, checksum {:08X}:", frame.len(), checksum);

    for byte in frame.iter().take(PREVIEW_BYTES) {
        rprintln!("\t{:02X}", byte);
    }
}

#[inline(never)]
#[panic_handler]
/// Custom handler to use RTT when a panic occurs.
fn panic(_info: &PanicInfo) -> ! {
    rprintln!("Panicked!");
    rprintln!("{:?}", _info);
    loop {}
}
