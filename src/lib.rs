//! Fixed-capacity, overwrite-on-full circular buffer.
//!
//! [`RingBuffer<T, N>`] keeps the most recent `N` values written to it. A
//! write to a full buffer silently evicts the oldest value. The remaining
//! modules back the `circbuf` self-test binary.

pub mod config;
pub mod report;
pub mod ring_buffer;
pub mod selftest;

pub use ring_buffer::{Iter, RingBuffer};
