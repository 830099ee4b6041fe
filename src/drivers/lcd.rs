//! HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! The controller is driven in 4-bit mode: every byte goes out as two
//! nibbles on D7..D4, each latched by pulsing EN high then low with one
//! bus write per transition.
//!
//! ```text
//!   PCF8574 bit:  7   6   5   4   3   2   1   0
//!                 D7  D6  D5  D4  BL  EN  RW  RS
//! ```
//!
//! ## Absent display
//!
//! [`DisplayHandle::probe`] scans the bus once at startup. If nothing acks
//! at the configured address the node runs with a [`NullDisplay`] that
//! only logs; no further bus traffic is generated.
//!
//! Bus errors after a successful probe are logged once and swallowed.
//! The control loop never sees them.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, info, warn};

use crate::app::ports::DisplayPort;

const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const REGISTER_SELECT: u8 = 0x01;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_LEFT_TO_RIGHT: u8 = 0x06;
const CMD_DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;
const ROW1_OFFSET: u8 = 0x40;
const LAST_DDRAM_COLUMN: u8 = 0x27;

/// `°` in the A00 character ROM.
const DEGREE_GLYPH: u8 = 0xDF;

/// First and last valid 7-bit addresses for a bus scan.
const SCAN_FIRST: u8 = 0x08;
const SCAN_LAST: u8 = 0x77;

// ── Bus-backed display ────────────────────────────────────────

pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    columns: u8,
    bus_faulted: bool,
}

impl<I2C: I2c, D: DelayNs> Lcd<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8, columns: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            columns,
            bus_faulted: false,
        }
    }

    /// Force the controller into 4-bit mode from any state, then configure
    /// 2 lines / 5×8 font, display on with no cursor, left-to-right entry.
    pub fn initialize(&mut self) {
        self.write_nibble(0x30, false);
        self.delay.delay_ms(5);
        self.write_nibble(0x30, false);
        self.delay.delay_ms(5);
        self.write_nibble(0x30, false);
        self.delay.delay_ms(1);
        self.write_nibble(0x20, false);

        self.command(CMD_FUNCTION_4BIT_2LINE);
        self.command(CMD_DISPLAY_ON_CURSOR_OFF);
        self.command(CMD_ENTRY_LEFT_TO_RIGHT);
        self.command(CMD_CLEAR);
        self.delay.delay_ms(2);
        info!("LCD: initialised at 0x{:02X} ({} columns)", self.address, self.columns);
    }

    fn command(&mut self, cmd: u8) {
        self.send(cmd, false);
    }

    fn send(&mut self, byte: u8, data: bool) {
        self.write_nibble(byte & 0xF0, data);
        self.write_nibble((byte << 4) & 0xF0, data);
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) {
        let rs = if data { REGISTER_SELECT } else { 0 };
        let latched = (nibble & 0xF0) | BACKLIGHT | rs;
        self.bus_write(latched | ENABLE);
        self.delay.delay_us(1);
        self.bus_write(latched);
        self.delay.delay_us(50);
    }

    fn bus_write(&mut self, byte: u8) {
        if let Err(e) = self.i2c.write(self.address, &[byte]) {
            if !self.bus_faulted {
                warn!("LCD: I2C write failed ({:?}), further errors suppressed", e.kind());
                self.bus_faulted = true;
            }
        }
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for Lcd<I2C, D> {
    fn clear(&mut self) {
        self.command(CMD_CLEAR);
        self.delay.delay_ms(2);
    }

    fn write_text(&mut self, text: &str, max_columns: usize) {
        let limit = max_columns.min(usize::from(self.columns));
        for ch in text.chars().take(limit) {
            self.send(glyph(ch), true);
        }
    }

    fn move_cursor(&mut self, col: u8, row: u8) {
        let mut addr = CMD_SET_DDRAM | col.min(LAST_DDRAM_COLUMN);
        if row > 0 {
            addr |= ROW1_OFFSET;
        }
        self.command(addr);
    }

    fn columns(&self) -> usize {
        usize::from(self.columns)
    }
}

/// Map a char onto the controller's character ROM.
fn glyph(ch: char) -> u8 {
    match ch {
        '°' => DEGREE_GLYPH,
        ' '..='~' => ch as u8,
        _ => b'?',
    }
}

// ── Null display ──────────────────────────────────────────────

/// Stand-in when no LCD answered the bus scan. Logs what would have been
/// shown.
pub struct NullDisplay {
    columns: u8,
}

impl NullDisplay {
    pub fn new(columns: u8) -> Self {
        Self { columns }
    }
}

impl DisplayPort for NullDisplay {
    fn clear(&mut self) {
        debug!("LCD(null): clear");
    }

    fn write_text(&mut self, text: &str, max_columns: usize) {
        let limit = max_columns.min(usize::from(self.columns));
        let shown: String = text.chars().take(limit).collect();
        debug!("LCD(null): '{}'", shown);
    }

    fn move_cursor(&mut self, col: u8, row: u8) {
        debug!("LCD(null): cursor -> ({}, {})", col, row);
    }

    fn columns(&self) -> usize {
        usize::from(self.columns)
    }
}

// ── Startup selection ─────────────────────────────────────────

/// The display surface chosen once at boot.
pub enum DisplayHandle<I2C, D> {
    Lcd(Lcd<I2C, D>),
    Null(NullDisplay),
}

impl<I2C: I2c, D: DelayNs> DisplayHandle<I2C, D> {
    /// Scan the bus and bind a live LCD if `address` acks, otherwise a
    /// null surface.
    pub fn probe(mut i2c: I2C, delay: D, address: u8, columns: u8) -> Self {
        let found = scan(&mut i2c);
        info!("LCD: I2C scan found {:02X?}", found.as_slice());

        if found.contains(&address) {
            let mut lcd = Lcd::new(i2c, delay, address, columns);
            lcd.initialize();
            Self::Lcd(lcd)
        } else {
            warn!("LCD: nothing at 0x{:02X}, continuing without a display", address);
            Self::Null(NullDisplay::new(columns))
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Lcd(_))
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for DisplayHandle<I2C, D> {
    fn clear(&mut self) {
        match self {
            Self::Lcd(lcd) => lcd.clear(),
            Self::Null(null) => null.clear(),
        }
    }

    fn write_text(&mut self, text: &str, max_columns: usize) {
        match self {
            Self::Lcd(lcd) => lcd.write_text(text, max_columns),
            Self::Null(null) => null.write_text(text, max_columns),
        }
    }

    fn move_cursor(&mut self, col: u8, row: u8) {
        match self {
            Self::Lcd(lcd) => lcd.move_cursor(col, row),
            Self::Null(null) => null.move_cursor(col, row),
        }
    }

    fn columns(&self) -> usize {
        match self {
            Self::Lcd(lcd) => lcd.columns(),
            Self::Null(null) => null.columns(),
        }
    }
}

/// Addresses that ack an empty write.
pub fn scan<I2C: I2c>(i2c: &mut I2C) -> heapless::Vec<u8, 112> {
    let mut found = heapless::Vec::new();
    for addr in SCAN_FIRST..=SCAN_LAST {
        if i2c.write(addr, &[]).is_ok() {
            // Capacity covers the whole scan range.
            let _ = found.push(addr);
        }
    }
    found
}
