#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use multilog::Fields;
use serde_json::Value;

/// In-memory writer that can be handed to a logger and read back later.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn boxed(&self) -> Box<dyn Write + Send> {
        Box::new(self.clone())
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fields attached to a text line, which ends in ` fields=<json object>`.
pub fn text_fields(line: &str) -> Fields {
    let (_, json) = line
        .rsplit_once(" fields=")
        .unwrap_or_else(|| panic!("no fields in {line}"));
    serde_json::from_str(json).unwrap()
}

/// Text line without its leading timestamp and level padding.
pub fn without_time(line: &str) -> &str {
    line.split_once(' ').unwrap().1.trim_start()
}

/// A JSON line and the field map serialized into its `args` attribute.
pub fn json_line(line: &str) -> (Value, Fields) {
    let v: Value = serde_json::from_str(line).unwrap();
    let args = serde_json::from_str(v["args"].as_str().unwrap()).unwrap();
    (v, args)
}
