//! IBIS bus-master driver
//!
//! The master side of the VDV 300 Wagenbus: it owns the transmit half
//! of a serial transport (any [`ibis_hal::UartTx`] implementation),
//! tracks whether the link is open, and broadcasts telegrams to the
//! displays, validators and announcement devices on the bus.
//!
//! The bus runs at 1200 baud with 7 data bits, even parity and 2 stop
//! bits; these are protocol constants, not configuration. A transport
//! implementation applies [`bus_config`] when it opens the port.
//!
//! ```ignore
//! let mut master = Master::new();
//! master.attach(uart).ok();
//! master.line_number(12)?;
//! master.next_stop_text("Rathaus")?;
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod master;

pub use master::{bus_config, Master, SendError, SendResult, BUS_BAUDRATE};

// Re-export the catalog types callers pass to the send operations
pub use ibis_protocol::{DelaySign, NextStopWidth, Telegram};
