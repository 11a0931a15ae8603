//! Fixed-layout control header written in front of every outgoing frame.
//!
//! | byte   | content                                                   |
//! |--------|-----------------------------------------------------------|
//! | 0      | bit 0 CPOL, bit 1 CPHA, bit 2 start, bit 3 burst, bit 4 read |
//! | 1      | slave index                                               |
//! | 2..4   | outgoing element size in bits (u16, little-endian)        |
//! | 4..6   | outgoing element count                                    |
//! | 6..8   | incoming element size in bits                             |
//! | 8..10  | extra clock toggles after writing                         |
//! | 10..12 | extra clock toggles after reading                         |

use bitframe::FrameError;

/// Size of the encoded header in bytes.
pub const CONTROL_LEN: usize = 12;

const CPOL: u8 = 0x01;
const CPHA: u8 = 0x02;
const START: u8 = 0x04;
const BURST: u8 = 0x08;
const READ: u8 = 0x10;

/// Transfer settings encoded into the control header.
///
/// Use the builder-style setters (`set_slave`, `set_read`, etc.) to configure.
///
/// # Example
///
/// ```
/// use bitframe_spi::control::ControlBlock;
///
/// let mut control = ControlBlock::default();
/// control.set_slave(2).set_outgoing_element_size(32).set_num_outgoing_elements(1);
///
/// let mut header = [0u8; 12];
/// control.encode(&mut header);
/// assert_eq!(header[..4], [0x04, 2, 32, 0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControlBlock {
    /// Clock idles high when set.
    pub cpol: bool,
    /// Data is sampled on the second clock edge when set.
    pub cpha: bool,
    /// Keep slave select asserted between elements.
    pub burst: bool,
    /// The transaction reads data back after writing.
    pub read: bool,
    pub slave: u8,
    pub outgoing_element_size: u16,
    pub num_outgoing_elements: u16,
    pub incoming_element_size: u16,
    /// Not encoded; sizes the data expected back on a read transaction.
    pub num_incoming_elements: u16,
    pub num_write_extra_toggles: u16,
    pub num_read_extra_toggles: u16,
}

impl ControlBlock {
    pub fn set_cpol(&mut self, cpol: bool) -> &mut Self {
        self.cpol = cpol;
        self
    }

    pub fn set_cpha(&mut self, cpha: bool) -> &mut Self {
        self.cpha = cpha;
        self
    }

    pub fn set_burst(&mut self, burst: bool) -> &mut Self {
        self.burst = burst;
        self
    }

    pub fn set_read(&mut self, read: bool) -> &mut Self {
        self.read = read;
        self
    }

    pub fn set_slave(&mut self, slave: u8) -> &mut Self {
        self.slave = slave;
        self
    }

    pub fn set_outgoing_element_size(&mut self, bits: u16) -> &mut Self {
        self.outgoing_element_size = bits;
        self
    }

    pub fn set_num_outgoing_elements(&mut self, count: u16) -> &mut Self {
        self.num_outgoing_elements = count;
        self
    }

    pub fn set_incoming_element_size(&mut self, bits: u16) -> &mut Self {
        self.incoming_element_size = bits;
        self
    }

    pub fn set_num_incoming_elements(&mut self, count: u16) -> &mut Self {
        self.num_incoming_elements = count;
        self
    }

    pub fn set_num_write_extra_toggles(&mut self, toggles: u16) -> &mut Self {
        self.num_write_extra_toggles = toggles;
        self
    }

    pub fn set_num_read_extra_toggles(&mut self, toggles: u16) -> &mut Self {
        self.num_read_extra_toggles = toggles;
        self
    }

    /// Bits the header announces for the outgoing frame.
    pub fn expected_outgoing_bits(&self) -> usize {
        self.outgoing_element_size as usize * self.num_outgoing_elements as usize
    }

    /// Bits expected back on a read transaction.
    pub fn expected_incoming_bits(&self) -> usize {
        self.incoming_element_size as usize * self.num_incoming_elements as usize
    }

    /// Writes the header. Bits 5..7 of byte 0 are left as they were.
    pub fn encode(&self, header: &mut [u8; CONTROL_LEN]) {
        let flags = &mut header[0];
        for (mask, set) in [
            (CPOL, self.cpol),
            (CPHA, self.cpha),
            (BURST, self.burst),
            (READ, self.read),
        ] {
            if set {
                *flags |= mask;
            } else {
                *flags &= !mask;
            }
        }
        *flags |= START;

        header[1] = self.slave;

        let words = [
            self.outgoing_element_size,
            self.num_outgoing_elements,
            self.incoming_element_size,
            self.num_write_extra_toggles,
            self.num_read_extra_toggles,
        ];
        for (i, word) in words.iter().enumerate() {
            let at = 2 + i * 2;
            header[at..at + 2].copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Writes the header into the first [CONTROL_LEN] bytes of `buffer`.
    pub fn try_encode(&self, buffer: &mut [u8]) -> Result<(), FrameError> {
        let header: &mut [u8; CONTROL_LEN] = buffer
            .get_mut(..CONTROL_LEN)
            .and_then(|prefix| prefix.try_into().ok())
            .ok_or(FrameError::OutOfBounds)?;

        self.encode(header);

        Ok(())
    }

    /// Reads a header back. `num_incoming_elements` is not encoded and comes back as 0.
    pub fn decode(buffer: &[u8]) -> Result<Self, FrameError> {
        if buffer.len() < CONTROL_LEN {
            return Err(FrameError::OutOfBounds);
        }

        let flags = buffer[0];
        let word = |i: usize| u16::from_le_bytes([buffer[2 + i * 2], buffer[3 + i * 2]]);

        Ok(ControlBlock {
            cpol: flags & CPOL != 0,
            cpha: flags & CPHA != 0,
            burst: flags & BURST != 0,
            read: flags & READ != 0,
            slave: buffer[1],
            outgoing_element_size: word(0),
            num_outgoing_elements: word(1),
            incoming_element_size: word(2),
            num_incoming_elements: 0,
            num_write_extra_toggles: word(3),
            num_read_extra_toggles: word(4),
        })
    }
}
