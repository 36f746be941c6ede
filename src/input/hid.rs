//! USB HID boot-protocol keyboard decoding.
//!
//! The IO extension forwards raw 8-byte keyboard reports over UART:
//!
//! ```text
//! byte 0     modifiers (bit 1 = left shift, bit 5 = right shift)
//! byte 1     reserved
//! bytes 2-7  up to six pressed key usage codes, 0 = empty slot
//! ```
//!
//! A report lists every key currently held, so the decoder diffs each
//! report against the previous one and only emits newly pressed keys.

use super::InputEvent;

/// Length of one boot-protocol report.
pub const HID_REPORT_LEN: usize = 8;

/// Modifier bits for left and right shift.
const SHIFT_MASK: u8 = 0x22;

const KEY_ENTER: u8 = 0x28;
const KEY_ESCAPE: u8 = 0x29;
const KEY_BACKSPACE: u8 = 0x2A;
const KEY_SPACE: u8 = 0x2C;
const KEY_DOWN: u8 = 0x51;
const KEY_UP: u8 = 0x52;

/// Unshifted and shifted characters for usage codes 0x2D..=0x38.
const PUNCTUATION: [(char, char); 12] = [
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    ('#', '~'),
    (';', ':'),
    ('\'', '"'),
    ('`', '~'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

/// Shifted digits for usage codes 0x1E..=0x27 ("1".."9", "0").
const SHIFTED_DIGITS: [char; 10] = ['!', '@', '#', '$', '%', '^', '&', '*', '(', ')'];

/// Map one usage code to an event. Unmapped keys return `None`.
pub fn decode_key(code: u8, modifiers: u8) -> Option<InputEvent> {
    let shift = modifiers & SHIFT_MASK != 0;
    let event = match code {
        KEY_UP => InputEvent::Up,
        KEY_DOWN => InputEvent::Down,
        KEY_ENTER if shift => InputEvent::Char('\n'),
        KEY_ENTER => InputEvent::Enter,
        KEY_ESCAPE => InputEvent::Back,
        KEY_BACKSPACE => InputEvent::Backspace,
        KEY_SPACE => InputEvent::Char(' '),
        0x04..=0x1D => {
            let letter = char::from(b'a' + (code - 0x04));
            InputEvent::Char(if shift { letter.to_ascii_uppercase() } else { letter })
        }
        0x1E..=0x27 => {
            let index = usize::from(code - 0x1E);
            let digit = if index == 9 {
                '0'
            } else {
                char::from(b'1' + index as u8)
            };
            InputEvent::Char(if shift { SHIFTED_DIGITS[index] } else { digit })
        }
        0x2D..=0x38 => {
            let (plain, shifted) = PUNCTUATION[usize::from(code - 0x2D)];
            InputEvent::Char(if shift { shifted } else { plain })
        }
        _ => return None,
    };
    Some(event)
}

/// Edge-detecting report decoder.
#[derive(Debug, Default, Clone)]
pub struct HidKeyboard {
    held: [u8; 6],
}

impl HidKeyboard {
    /// Create a decoder with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one report into the events for keys that were not held in
    /// the previous report.
    pub fn decode(&mut self, report: &[u8; HID_REPORT_LEN]) -> Vec<InputEvent> {
        let modifiers = report[0];
        let mut keys = [0u8; 6];
        keys.copy_from_slice(&report[2..]);

        let events = keys
            .iter()
            .filter(|&&code| code != 0 && !self.held.contains(&code))
            .filter_map(|&code| {
                let event = decode_key(code, modifiers);
                if event.is_none() {
                    log::debug!("Unmapped HID key 0x{code:02X} (modifiers 0x{modifiers:02X})");
                }
                event
            })
            .collect();

        self.held = keys;
        events
    }
}

/// Splits an arbitrarily chunked byte stream into fixed-size reports.
#[derive(Debug, Default, Clone)]
pub struct ReportReader {
    pending: Vec<u8>,
}

impl ReportReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every report completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<[u8; HID_REPORT_LEN]> {
        self.pending.extend_from_slice(bytes);
        let complete = self.pending.len() / HID_REPORT_LEN * HID_REPORT_LEN;

        let reports = self.pending[..complete]
            .chunks_exact(HID_REPORT_LEN)
            .map(|chunk| {
                let mut report = [0u8; HID_REPORT_LEN];
                report.copy_from_slice(chunk);
                report
            })
            .collect();

        self.pending.drain(..complete);
        reports
    }

    /// Bytes waiting for the rest of their report.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
