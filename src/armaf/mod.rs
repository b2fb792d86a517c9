//! A small actor toolkit on top of Tokio tasks, loosely based on the
//! "Actor-based Runtime Model of Adaptable Feedback Control Loops" paper.

mod ports;
mod server;

#[doc(inline)]
pub use ports::*;

#[doc(inline)]
pub use server::*;

#[cfg(test)]
mod test_ports;
