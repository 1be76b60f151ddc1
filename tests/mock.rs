#![allow(dead_code)]

use core::convert::Infallible;

use heapless::Vec;
use loralink::radio::Registers;

// SX127x addresses the mock models explicitly.
const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_RX_NB_BYTES: u8 = 0x13;
const REG_PKT_SNR_VALUE: u8 = 0x19;
const REG_PKT_RSSI_VALUE: u8 = 0x1A;
const REG_VERSION: u8 = 0x42;

const IRQ_TX_DONE: u8 = 0x08;
const IRQ_CRC_ERROR: u8 = 0x20;
const IRQ_RX_DONE: u8 = 0x40;

/// Register-level fake of an SX127x.
///
/// Backs the whole driver in host tests: single-register reads and
/// writes land in a flat register file, FIFO bursts go to dedicated
/// buffers, and the IRQ-flag register clears on write like the real
/// chip. Tests inject receive events and raise interrupt flags directly.
pub struct MockRegisters {
    regs: [u8; 0x80],
    rx_fifo: Vec<u8, 256>,
    last_tx: Option<Vec<u8, 256>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        let mut regs = [0u8; 0x80];
        regs[REG_VERSION as usize] = 0x12;
        Self {
            regs,
            rx_fifo: Vec::new(),
            last_tx: None,
        }
    }

    /// A mock reporting a different silicon revision.
    pub fn with_version(version: u8) -> Self {
        let mut mock = Self::new();
        mock.regs[REG_VERSION as usize] = version;
        mock
    }

    pub fn reg(&self, addr: u8) -> u8 {
        self.regs[addr as usize]
    }

    pub fn op_mode(&self) -> u8 {
        self.reg(REG_OP_MODE)
    }

    /// The frame most recently burst-written into the TX FIFO.
    pub fn last_tx(&self) -> Option<&[u8]> {
        self.last_tx.as_ref().map(|v| v.as_slice())
    }

    /// Land a frame in the RX FIFO with the given raw status-register
    /// values and raise the RX-done interrupt flag.
    pub fn inject_rx_frame(&mut self, frame: &[u8], rssi_raw: u8, snr_raw: u8) {
        self.rx_fifo.clear();
        self.rx_fifo.extend_from_slice(frame).unwrap();
        self.regs[REG_FIFO_RX_CURRENT_ADDR as usize] = 0;
        self.regs[REG_RX_NB_BYTES as usize] = frame.len() as u8;
        self.regs[REG_PKT_RSSI_VALUE as usize] = rssi_raw;
        self.regs[REG_PKT_SNR_VALUE as usize] = snr_raw;
        self.regs[REG_IRQ_FLAGS as usize] |= IRQ_RX_DONE;
    }

    /// As above, but flagged as a payload CRC failure.
    pub fn inject_crc_error(&mut self) {
        self.regs[REG_IRQ_FLAGS as usize] |= IRQ_RX_DONE | IRQ_CRC_ERROR;
    }

    /// Signal that the in-flight transmit finished.
    pub fn raise_tx_done(&mut self) {
        self.regs[REG_IRQ_FLAGS as usize] |= IRQ_TX_DONE;
    }
}

impl Registers for MockRegisters {
    type Error = Infallible;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        Ok(self.regs[addr as usize])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        if addr == REG_IRQ_FLAGS {
            // Clear-on-write, like the chip.
            self.regs[addr as usize] &= !value;
        } else {
            self.regs[addr as usize] = value;
        }
        Ok(())
    }

    fn read_burst(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if addr == REG_FIFO {
            let start = self.regs[REG_FIFO_ADDR_PTR as usize] as usize;
            buffer.copy_from_slice(&self.rx_fifo[start..start + buffer.len()]);
        } else {
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = self.regs[addr as usize + i];
            }
        }
        Ok(())
    }

    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        if addr == REG_FIFO {
            let mut frame = Vec::new();
            frame.extend_from_slice(data).unwrap();
            self.last_tx = Some(frame);
        } else {
            for (i, byte) in data.iter().enumerate() {
                self.regs[addr as usize + i] = *byte;
            }
        }
        Ok(())
    }
}
