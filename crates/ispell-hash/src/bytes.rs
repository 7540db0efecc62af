// Little-endian cursor and writer that follow C struct alignment

use crate::LoadError;

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], section: &'static str) -> Self {
        Self { data, pos: 0, section }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_section(&mut self, section: &'static str) {
        self.section = section;
    }

    /// Skip padding up to the next multiple of `n`.
    pub fn align(&mut self, n: usize) {
        let partial = self.pos % n;
        if partial > 0 {
            self.pos += n - partial;
        }
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], LoadError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(LoadError::truncated(self.section, end, self.data.len()));
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, LoadError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, LoadError> {
        self.align(2);
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> Result<i16, LoadError> {
        Ok(self.u16()? as i16)
    }

    pub fn u32(&mut self) -> Result<u32, LoadError> {
        self.align(4);
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> Result<i32, LoadError> {
        Ok(self.u32()? as i32)
    }
}

#[derive(Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn align(&mut self, n: usize) {
        while self.buf.len() % n != 0 {
            self.buf.push(0);
        }
    }

    pub fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.align(2);
        self.bytes(&v.to_le_bytes());
    }

    pub fn i16(&mut self, v: i16) {
        self.u16(v as u16);
    }

    pub fn u32(&mut self, v: u32) {
        self.align(4);
        self.bytes(&v.to_le_bytes());
    }

    pub fn i32(&mut self, v: i32) {
        self.u32(v as u32);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
