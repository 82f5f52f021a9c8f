use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const NONE = 0;
        const PATH = 1;
        const SPACE = 2;
    }
}

/// Static terrain for one game: a width x height cell grid plus the ordered
/// path walked by hostile waves. Cells that are neither path nor blocked are
/// buildable space.
#[derive(Clone)]
pub struct GameMap {
    width: u8,
    height: u8,
    buffer: Vec<u8>,
    path: Vec<Location>,
}

impl GameMap {
    pub fn new(width: u8, height: u8, path: Vec<Location>, blocked: &[Location]) -> GameMap {
        let mut buffer = vec![CellFlags::SPACE.bits(); width as usize * height as usize];

        for loc in blocked {
            buffer[loc.y() as usize * width as usize + loc.x() as usize] = CellFlags::NONE.bits();
        }
        for loc in &path {
            buffer[loc.y() as usize * width as usize + loc.x() as usize] = CellFlags::PATH.bits();
        }

        GameMap {
            width,
            height,
            buffer,
            path,
        }
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn get_xy(&self, x: u8, y: u8) -> CellFlags {
        let index = y as usize * self.width as usize + x as usize;
        CellFlags::from_bits_truncate(self.buffer[index])
    }

    /// Out-of-bounds coordinates are neither space nor path.
    pub fn is_space(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get_xy(x as u8, y as u8).contains(CellFlags::SPACE)
    }

    pub fn is_path(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get_xy(x as u8, y as u8).contains(CellFlags::PATH)
    }

    /// The ordered cell sequence hostile waves traverse, entry to exit.
    pub fn path(&self) -> &[Location] {
        &self.path
    }

    pub fn path_length(&self) -> usize {
        self.path.len()
    }

    pub fn space_count(&self) -> usize {
        self.buffer
            .iter()
            .filter(|&&b| CellFlags::from_bits_truncate(b).contains(CellFlags::SPACE))
            .count()
    }

    /// Iterator over all buildable space cells in row-major scan order.
    pub fn space_cells(&self) -> impl Iterator<Item = Location> + '_ {
        let width = self.width as usize;
        self.buffer.iter().enumerate().filter_map(move |(i, &b)| {
            if CellFlags::from_bits_truncate(b).contains(CellFlags::SPACE) {
                Some(Location::new((i % width) as u8, (i / width) as u8))
            } else {
                None
            }
        })
    }
}

/// A width x height array for per-cell data.
#[derive(Clone, Serialize, Deserialize)]
pub struct Grid<T: Copy> {
    width: u8,
    height: u8,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(width: u8, height: u8, initial: T) -> Self {
        Grid {
            width,
            height,
            data: vec![initial; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width as usize + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.data[y * self.width as usize + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.data.iter().enumerate().map(|(i, v)| {
            let x = i % (self.width as usize);
            let y = i / (self.width as usize);
            ((x, y), v)
        })
    }
}

impl Grid<u32> {
    pub fn max_value(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
