//! Newline delimited uplink feed, eg.: the output of an MQTT subscriber

use std::io::BufRead;

use super::UplinkSource;

/// One uplink message per line, blank lines are ignored
pub struct LineSource<T>
where
    T: BufRead,
{
    rdr: T,
    buf: Vec<u8>,
}

impl<T> LineSource<T>
where
    T: BufRead,
{
    pub fn new(rdr: T) -> Self {
        Self { rdr, buf: vec![] }
    }
}

impl<T> UplinkSource for LineSource<T>
where
    T: BufRead,
{
    fn next_uplink(&mut self) -> Result<Option<Vec<u8>>, String> {
        loop {
            self.buf.clear();

            let read = self
                .rdr
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| format!("Failed on read the uplink feed: {}", e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }

            let line = self.buf.trim_ascii();
            if !line.is_empty() {
                return Ok(Some(line.to_vec()));
            }
        }
    }
}
