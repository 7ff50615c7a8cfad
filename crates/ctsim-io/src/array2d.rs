//! A contiguous 2-D sample grid, replacing the original program's
//! `Array2d<T>` array-of-column-pointers with a single backing `Vec<T>`
//! (the same shape as `jxl-grid`'s `SimpleGrid<S>`).

/// A dense `nx` by `ny` grid of samples stored column-major, matching the
/// storage order of the on-disk `Array2dFile` pixel plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2d<T> {
    nx: u32,
    ny: u32,
    data: Vec<T>,
}

impl<T: Clone + Default> Array2d<T> {
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx,
            ny,
            data: vec![T::default(); nx as usize * ny as usize],
        }
    }
}

impl<T> Array2d<T> {
    pub fn from_vec(nx: u32, ny: u32, data: Vec<T>) -> Self {
        assert_eq!(data.len(), nx as usize * ny as usize, "buffer size mismatch");
        Self { nx, ny, data }
    }

    pub fn nx(&self) -> u32 {
        self.nx
    }

    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    fn index(&self, ix: u32, iy: u32) -> usize {
        debug_assert!(ix < self.nx && iy < self.ny);
        ix as usize * self.ny as usize + iy as usize
    }

    pub fn get(&self, ix: u32, iy: u32) -> &T {
        &self.data[self.index(ix, iy)]
    }

    pub fn get_mut(&mut self, ix: u32, iy: u32) -> &mut T {
        let idx = self.index(ix, iy);
        &mut self.data[idx]
    }

    pub fn set(&mut self, ix: u32, iy: u32, value: T) {
        let idx = self.index(ix, iy);
        self.data[idx] = value;
    }

    /// The samples of column `ix`, contiguous in memory.
    pub fn column(&self, ix: u32) -> &[T] {
        let start = ix as usize * self.ny as usize;
        &self.data[start..start + self.ny as usize]
    }

    pub fn column_mut(&mut self, ix: u32) -> &mut [T] {
        let ny = self.ny as usize;
        let start = ix as usize * ny;
        &mut self.data[start..start + ny]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> Array2d<T> {
    pub fn fill(nx: u32, ny: u32, value: T) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx as usize * ny as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_column_major() {
        let mut g: Array2d<f64> = Array2d::new(3, 2);
        g.set(2, 1, 9.0);
        assert_eq!(*g.get(2, 1), 9.0);
        assert_eq!(g.column(2)[1], 9.0);
    }
}
