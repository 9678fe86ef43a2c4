#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_config::{Config, load_from};
use core_state::EditorState;
use core_text::{Buffer, Position};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// State over `text` with the cursor at host `(line, byte)`.
pub fn state_at(text: &str, line: usize, byte: usize) -> EditorState {
    let mut st = EditorState::new(Buffer::from_str("t", text).unwrap());
    st.set_cursor(Position::new(line, byte));
    st
}

/// Config parsed from a temporary `tobj.toml` holding `body`.
pub fn config_from(body: &str) -> Config {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), body).unwrap();
    load_from(Some(tmp.path().to_path_buf())).unwrap()
}

pub fn selected_text(st: &EditorState) -> Option<String> {
    st.selection().map(|span| span.text(&st.buffer))
}

#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        (Self { inner: buf.clone() }, buf)
    }
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}
