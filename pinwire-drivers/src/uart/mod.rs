//! UART transport implementations

pub mod io;

pub use io::{IoUart, IoUartError};
