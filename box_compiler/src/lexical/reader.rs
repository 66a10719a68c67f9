//! Incremental UTF-8 decoding over a buffered byte source
//!
//! Runes are decoded one at a time so the scanner never holds the whole file.
//! A byte that does not start a valid sequence decodes to U+FFFD and only
//! that single byte is consumed; decoding resumes at the next byte.

use std::io::{self, BufRead};

/// Pulls runes from a `BufRead` until end of stream
pub struct RuneReader<R: BufRead> {
    inner: R,
    pending: [u8; 4],
    pending_len: usize,
    bytes_consumed: u64,
    invalid_sequences: usize,
}

impl<R: BufRead> RuneReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: [0; 4],
            pending_len: 0,
            bytes_consumed: 0,
            invalid_sequences: 0,
        }
    }

    /// Next rune, `Ok(None)` at end of stream
    pub fn read_rune(&mut self) -> io::Result<Option<char>> {
        if !self.fill_pending(1)? {
            return Ok(None);
        }

        let width = sequence_width(self.pending[0]);
        self.fill_pending(width)?;

        match std::str::from_utf8(&self.pending[..self.pending_len.min(width)]) {
            Ok(decoded) => match decoded.chars().next() {
                Some(rune) => {
                    self.take(rune.len_utf8());
                    Ok(Some(rune))
                }
                None => Ok(None),
            },
            Err(_) => {
                self.take(1);
                self.invalid_sequences += 1;
                Ok(Some(char::REPLACEMENT_CHARACTER))
            }
        }
    }

    /// Bytes decoded so far, including invalid ones
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// Bytes that decoded to U+FFFD
    pub fn invalid_sequences(&self) -> usize {
        self.invalid_sequences
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // Top up the lookahead to `want` bytes; false if nothing is buffered at EOF
    fn fill_pending(&mut self, want: usize) -> io::Result<bool> {
        while self.pending_len < want {
            match self.pull_byte()? {
                Some(byte) => {
                    self.pending[self.pending_len] = byte;
                    self.pending_len += 1;
                }
                None => break,
            }
        }
        Ok(self.pending_len > 0)
    }

    fn pull_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let byte = buf[0];
                    self.inner.consume(1);
                    return Ok(Some(byte));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn take(&mut self, count: usize) {
        self.pending.copy_within(count..self.pending_len, 0);
        self.pending_len -= count;
        self.bytes_consumed += count as u64;
    }
}

impl<R: BufRead> Iterator for RuneReader<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_rune().transpose()
    }
}

/// Expected sequence length for a leading byte; invalid leads report 1
fn sequence_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};

    fn decode(bytes: &[u8]) -> Vec<char> {
        RuneReader::new(bytes).map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_ascii_and_multibyte() {
        assert_eq!(decode(b"ab c"), vec!['a', 'b', ' ', 'c']);
        assert_eq!(decode("héllo€𝄞".as_bytes()), "héllo€𝄞".chars().collect::<Vec<_>>());
        assert!(decode(b"").is_empty());
    }

    #[test]
    fn test_invalid_bytes_decode_one_at_a_time() {
        // Lone continuation byte, then a truncated 3-byte sequence before 'a'
        let mut reader = RuneReader::new(&b"\x80\xE2\x82a"[..]);
        let runes: Vec<char> = reader.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(runes, vec!['\u{FFFD}', '\u{FFFD}', '\u{FFFD}', 'a']);
        assert_eq!(reader.invalid_sequences(), 3);
        assert_eq!(reader.bytes_consumed(), 4);
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        assert_eq!(decode(b"x\xF0\x9F"), vec!['x', '\u{FFFD}', '\u{FFFD}']);
    }

    #[test]
    fn test_sequences_split_across_buffer_refills() {
        let source = "€uro".as_bytes();
        let reader = BufReader::with_capacity(1, source);
        let runes: Vec<char> = RuneReader::new(reader).map(|r| r.unwrap()).collect();
        assert_eq!(runes, vec!['€', 'u', 'r', 'o']);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn test_io_errors_are_surfaced() {
        let mut reader = RuneReader::new(BufReader::new(FailingReader));
        let err = reader.read_rune().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
