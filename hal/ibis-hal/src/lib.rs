//! IBIS Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits implemented by
//! chip- or platform-specific serial backends. The encoder core only
//! needs a "write these bytes" capability; everything pin- and
//! voltage-level stays behind these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (ibis-master users)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ibis-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ software UART │       │ hardware UART │
//! │ (e.g. RP2040) │       │ (e.g. STM32)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! The bus is a one-directional broadcast from the controller to the
//! display devices, so only the transmit side is abstracted here.

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key traits at crate root for convenience
pub use uart::{DataBits, Parity, StopBits, UartConfig, UartTx};
