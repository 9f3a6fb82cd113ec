mod common;

use common::*;
use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::i2c::Transaction as I2cTransaction;
use ov5640_rs::ov5640::regs::Register;
use ov5640_rs::ov5640::{CaptureConfig, Error};

const STATUS_IDLE: u8 = 0x70;
const STATUS_BOOTING: u8 = 0x7F;

fn start_mcu() -> Vec<I2cTransaction> {
    writes(&[
        (0x3022, 0x00),
        (0x3023, 0x00),
        (0x3024, 0x00),
        (0x3025, 0x00),
        (0x3026, 0x00),
        (0x3027, 0x00),
        (0x3028, 0x00),
        (0x3029, 0x7F),
        (0x3000, 0x00),
    ])
}

/// A command acknowledged after `busy` polls.
fn command(cmd: u8, busy: usize) -> Vec<I2cTransaction> {
    let mut t = vec![
        write(Register::AF_CMD_ACK, 0x01),
        write(Register::AF_CMD_MAIN, cmd),
    ];
    for _ in 0..busy {
        t.extend(read(Register::AF_CMD_ACK, 0x01));
    }
    t.extend(read(Register::AF_CMD_ACK, 0x00));
    t
}

#[test]
fn firmware_is_uploaded_in_blocks() {
    let firmware: Vec<u8> = (0..300).map(|i| i as u8).collect();

    let mut then = vec![write(Register::SYSTEM_RESET00, 0x20)];
    let mut first = vec![0x80, 0x00];
    first.extend_from_slice(&firmware[..254]);
    let mut second = vec![0x80, 0xFE];
    second.extend_from_slice(&firmware[254..]);
    then.push(I2cTransaction::write(ADDR, first));
    then.push(I2cTransaction::write(ADDR, second));
    then.extend(start_mcu());
    then.extend(read(Register::AF_FW_STATUS, STATUS_BOOTING));
    then.extend(read(Register::AF_FW_STATUS, STATUS_IDLE));

    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);

    camera
        .autofocus_init(&firmware, &mut MockNoop::new())
        .unwrap();
    i2c.done();
}

#[test]
fn firmware_that_never_boots_times_out() {
    let firmware = [0xAAu8; 16];

    let mut block = vec![0x80, 0x00];
    block.extend_from_slice(&firmware);
    let mut then = vec![
        write(Register::SYSTEM_RESET00, 0x20),
        I2cTransaction::write(ADDR, block),
    ];
    then.extend(start_mcu());
    for _ in 0..100 {
        then.extend(read(Register::AF_FW_STATUS, STATUS_BOOTING));
    }

    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);

    assert_eq!(
        camera.autofocus_init(&firmware, &mut MockNoop::new()),
        Err(Error::Timeout)
    );
    i2c.done();
}

#[test]
fn empty_firmware_is_rejected() {
    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), Vec::new());

    assert_eq!(
        camera.autofocus_init(&[], &mut MockNoop::new()),
        Err(Error::Unsupported)
    );
    i2c.done();
}

#[test]
fn focus_cycle_reports_zones() {
    let mut then = command(0x08, 0);
    then.extend(command(0x03, 3));
    for (offset, zone) in [1u8, 0, 1, 1, 0].iter().enumerate() {
        then.extend(read(Register::AF_CMD_PARA0 + offset as u16, *zone));
    }

    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);

    assert_eq!(
        camera.autofocus(&mut MockNoop::new()),
        Ok([1, 0, 1, 1, 0])
    );
    i2c.done();
}

#[test]
fn vcm_step_is_read_and_written() {
    let mut then = command(0x1B, 1);
    then.extend(read(Register::AF_CMD_PARA4, 0x42));
    then.push(write(Register::AF_CMD_PARA3, 0x00));
    then.push(write(Register::AF_CMD_PARA4, 200));
    then.extend(command(0x1A, 0));

    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);
    let mut delay = MockNoop::new();

    assert_eq!(camera.vcm_step(&mut delay), Ok(0x42));
    camera.set_vcm_step(200, &mut delay).unwrap();
    i2c.done();
}

#[test]
fn unacknowledged_command_times_out() {
    let mut then = vec![
        write(Register::AF_CMD_ACK, 0x01),
        write(Register::AF_CMD_MAIN, 0x1B),
    ];
    for _ in 0..1000 {
        then.extend(read(Register::AF_CMD_ACK, 0x01));
    }

    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);

    assert_eq!(camera.vcm_step(&mut MockNoop::new()), Err(Error::Timeout));
    i2c.done();
}

#[test]
fn status_is_a_plain_read() {
    let then = read(Register::AF_FW_STATUS, STATUS_IDLE);
    let (mut camera, mut i2c) = driver(CaptureConfig::default(), SimSensor::idle(), then);

    assert_eq!(camera.autofocus_status(), Ok(STATUS_IDLE));
    i2c.done();
}
