//! Little-endian cursor over a byte slice.

use glam::{Mat4, Vec3, Vec4};

use super::PersistenceError;

pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], PersistenceError> {
        let end = self
            .position
            .checked_add(N)
            .filter(|&end| end <= self.data.len())
            .ok_or(PersistenceError::TruncatedData)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(bytes)
    }

    pub fn read_magic(&mut self) -> Result<[u8; 4], PersistenceError> {
        self.take::<4>()
    }

    pub fn read_u8(&mut self) -> Result<u8, PersistenceError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, PersistenceError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32, PersistenceError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, PersistenceError> {
        Ok(f32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3, PersistenceError> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec4(&mut self) -> Result<Vec4, PersistenceError> {
        Ok(Vec4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Column-major.
    pub fn read_mat4(&mut self) -> Result<Mat4, PersistenceError> {
        let mut cols = [0.0f32; 16];
        for value in &mut cols {
            *value = self.read_f32()?;
        }
        Ok(Mat4::from_cols_array(&cols))
    }

    /// A non-negative count, also bounded by what the remaining bytes could
    /// hold at `min_item_size` bytes per item.
    pub fn read_count(
        &mut self,
        what: &'static str,
        min_item_size: usize,
    ) -> Result<usize, PersistenceError> {
        let count = self.read_i32()?;
        if count < 0 {
            return Err(PersistenceError::NegativeCount { what, count });
        }
        let count = count as usize;
        if count.saturating_mul(min_item_size) > self.remaining() {
            return Err(PersistenceError::TruncatedData);
        }
        Ok(count)
    }
}
