//! Transport abstraction
//!
//! A transport owns the actual connection to a device: a TCP socket, a
//! serial port, or a pipe pair to a coprocess. The engine drives it
//! through non-blocking reads and writes and a two-phase connect, and
//! never assumes anything about what sits on the other end.

use crate::buffer::IoBuffer;
use std::io::{Read, Write};
use std::os::fd::RawFd;

/// Outcome of starting or finishing a connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectProgress {
    /// Connection is up and usable
    Established,
    /// Connect is in flight; completion is signalled by writability
    Pending,
    /// The attempt failed; the engine schedules a retry
    Failed,
}

/// A non-blocking byte stream to a device.
///
/// `Read`/`Write` calls must never block; a transport with nothing to
/// deliver returns `WouldBlock` and the engine tries again after the
/// next poll.
pub trait Transport: Read + Write {
    /// Begin a connection attempt
    fn connect(&mut self) -> ConnectProgress;

    /// Complete an in-flight connect after the descriptor went writable
    fn finish_connect(&mut self) -> ConnectProgress;

    /// Descriptor to poll, if the transport currently has one
    fn fd(&self) -> Option<RawFd>;

    /// Hook run after each read, before the interpreter sees the
    /// inbound bytes. Protocol-layer transports strip in-band control
    /// sequences here; the default passes data through untouched.
    fn preprocess(&mut self, _inbound: &mut IoBuffer) {}

    /// Tear the connection down
    fn disconnect(&mut self);
}
