//! 3-axis MEMS gyroscope over SPI (L3GD20 / I3G4250D family).
//!
//! Only the Z axis is used: it is the board's rotation axis when it lies
//! flat.  The raw 16-bit count is returned untouched.  There is no
//! calibration or filtering.
//!
//! SPI command byte: bit 7 = read, bit 6 = auto-increment address.

use embedded_hal::spi::{Operation, SpiDevice};
use log::info;

// ── Registers ─────────────────────────────────────────────────

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1: u8 = 0x20;
const REG_OUT_Z_L: u8 = 0x2C;

const CMD_READ: u8 = 0x80;
const CMD_AUTO_INCREMENT: u8 = 0x40;

/// Normal mode, X/Y/Z enabled, lowest output data rate.
const CTRL1_POWER_ON: u8 = 0x0F;

/// WHO_AM_I values this driver accepts.
pub const KNOWN_IDS: [u8; 3] = [
    0xD3, // I3G4250D
    0xD4, // L3GD20
    0xD7, // L3GD20H
];

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroError<E> {
    /// SPI transaction failed.
    Bus(E),
    /// WHO_AM_I returned an unexpected value.
    UnknownDevice(u8),
}

impl<E: core::fmt::Debug> core::fmt::Display for GyroError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "gyro SPI error: {e:?}"),
            Self::UnknownDevice(id) => write!(f, "unknown gyro WHO_AM_I 0x{id:02X}"),
        }
    }
}

impl<E: core::fmt::Debug> std::error::Error for GyroError<E> {}

// ── Driver ────────────────────────────────────────────────────

pub struct Gyro<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Gyro<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Identify the part and power it on.  Returns the WHO_AM_I value.
    pub fn init(&mut self) -> Result<u8, GyroError<SPI::Error>> {
        let mut id = [0u8];
        self.read_regs(REG_WHO_AM_I, &mut id)?;
        if !KNOWN_IDS.contains(&id[0]) {
            return Err(GyroError::UnknownDevice(id[0]));
        }
        self.write_reg(REG_CTRL1, CTRL1_POWER_ON)?;
        info!("Gyro: id 0x{:02X}, powered on", id[0]);
        Ok(id[0])
    }

    /// Z-axis angular rate in raw counts.
    pub fn read_z(&mut self) -> Result<i16, GyroError<SPI::Error>> {
        let mut raw = [0u8; 2];
        self.read_regs(REG_OUT_Z_L, &mut raw)?;
        Ok(i16::from_le_bytes(raw))
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    fn read_regs(&mut self, start: u8, buf: &mut [u8]) -> Result<(), GyroError<SPI::Error>> {
        let mut cmd = start | CMD_READ;
        if buf.len() > 1 {
            cmd |= CMD_AUTO_INCREMENT;
        }
        self.spi
            .transaction(&mut [Operation::Write(&[cmd]), Operation::Read(buf)])
            .map_err(GyroError::Bus)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), GyroError<SPI::Error>> {
        self.spi.write(&[reg, value]).map_err(GyroError::Bus)
    }
}
