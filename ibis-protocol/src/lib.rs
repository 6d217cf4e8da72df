//! IBIS Wagenbus Telegram Encoding
//!
//! This crate implements the wire format of the VDV 300 IBIS Wagenbus,
//! the serial broadcast bus (1200 baud, 7E2) that connects a vehicle's
//! onboard computer to displays, ticket validators and announcement
//! equipment in public-transit vehicles.
//!
//! # Frame Overview
//!
//! Every telegram is framed the same way:
//! ```text
//! ┌──────────────────┬───────────┬──────────┐
//! │ PAYLOAD          │ CR (0x0D) │ CHECKSUM │
//! │ 7-bit characters │ 1B        │ 1B       │
//! └──────────────────┴───────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of every preceding frame byte folded into
//! the seed `0x7F`; XOR-reducing a complete frame with the seed
//! therefore yields zero, which is the self-check receiving devices
//! perform.
//!
//! The bus is one-directional: the master broadcasts, devices listen.
//! This crate only encodes; there is no receive-side parser.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod block;
pub mod charset;
pub mod frame;
pub mod hex;
pub mod telegram;

pub use frame::{
    EncodeError, Payload, WireFrame, CHECKSUM_SEED, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, TERMINATOR,
};
pub use telegram::{DelaySign, NextStopWidth, Telegram};
