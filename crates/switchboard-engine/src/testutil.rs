//! Shared test doubles: a scriptable in-memory transport and an
//! observer that records everything it is told.

use crate::action::{ActionObserver, ActionOutcome};
use crate::buffer::IoBuffer;
use crate::transport::{ConnectProgress, Transport};
use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::RawFd;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockState {
    /// Bytes the fake device will deliver on the next read
    pub rx: VecDeque<u8>,
    /// Bytes the engine has written
    pub tx: Vec<u8>,
    pub connected: bool,
    pub connects: u32,
    /// When set, reads report end of file instead of would-block
    pub eof: bool,
}

pub type MockHandle = Arc<Mutex<MockState>>;

pub struct MockTransport {
    state: MockHandle,
    connect_result: ConnectProgress,
    fd: Option<RawFd>,
}

pub fn mock_transport(connect_result: ConnectProgress) -> (MockTransport, MockHandle) {
    let state: MockHandle = Arc::default();
    (
        MockTransport {
            state: state.clone(),
            connect_result,
            fd: Some(3),
        },
        state,
    )
}

pub fn push_rx(handle: &MockHandle, data: &[u8]) {
    handle.lock().unwrap().rx.extend(data.iter().copied());
}

pub fn take_tx(handle: &MockHandle) -> Vec<u8> {
    std::mem::take(&mut handle.lock().unwrap().tx)
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.rx.is_empty() {
            if state.eof {
                return Ok(0);
            }
            return Err(ErrorKind::WouldBlock.into());
        }
        let mut n = 0;
        while n < buf.len() {
            match state.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.state.lock().unwrap().tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> ConnectProgress {
        let mut state = self.state.lock().unwrap();
        state.connects += 1;
        if self.connect_result == ConnectProgress::Established {
            state.connected = true;
        }
        self.connect_result
    }

    fn finish_connect(&mut self) -> ConnectProgress {
        self.state.lock().unwrap().connected = true;
        ConnectProgress::Established
    }

    fn fd(&self) -> Option<RawFd> {
        self.fd
    }

    fn preprocess(&mut self, _inbound: &mut IoBuffer) {}

    fn disconnect(&mut self) {
        self.state.lock().unwrap().connected = false;
    }
}

/// Observer that stores outcomes and telemetry for later assertions
#[derive(Default)]
pub struct Recorder {
    outcomes: Mutex<Vec<ActionOutcome>>,
    telemetry: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn outcomes(&self) -> Vec<ActionOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn telemetry_lines(&self) -> Vec<String> {
        self.telemetry.lock().unwrap().clone()
    }
}

impl ActionObserver for Recorder {
    fn completed(&self, outcome: ActionOutcome) {
        self.outcomes.lock().unwrap().push(outcome);
    }

    fn telemetry(&self, _client_id: u64, msg: &str) {
        self.telemetry.lock().unwrap().push(msg.to_string());
    }
}
