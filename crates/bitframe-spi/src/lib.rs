//! # bitframe-spi
//!
//! SPI transactions on top of [bitframe]: a 12-byte control header in front of
//! the packed outgoing frame, a [transport::Transport] sink that delivers the
//! frame and fills incoming data back, and [master::SpiMaster] tying them together.
//!
//! ## Example
//!
//! ```
//! use bitframe_spi::{master::SpiMaster, transport::MemoryTransport};
//!
//! let mut transport = MemoryTransport::new();
//! transport.push_response(vec![0x2A, 0x00]);
//!
//! let mut spi = SpiMaster::new(transport).unwrap();
//! spi.control_mut()
//!     .set_read(true)
//!     .set_outgoing_element_size(16)
//!     .set_num_outgoing_elements(1)
//!     .set_incoming_element_size(16)
//!     .set_num_incoming_elements(1);
//!
//! spi.packer_mut().append_u16(0x8001).unwrap();
//! assert_eq!(spi.transfer().unwrap(), 2);
//! assert_eq!(spi.packer_mut().extract_u16().unwrap(), 42);
//! ```

pub mod control;
pub mod errors;
pub mod master;
pub mod transport;

pub use control::ControlBlock;
pub use errors::{MemoryTransportError, SpiError};
pub use master::{SpiLayout, SpiMaster};
pub use transport::{MemoryTransport, Transport};
