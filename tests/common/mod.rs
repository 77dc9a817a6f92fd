#![allow(dead_code)]

use num_bigint::BigUint;
use tvm_cell::Cell;

/// Packs values most significant bit first, as a cell writer would.
#[derive(Default)]
pub struct Packer {
    bits: usize,
    data: Vec<u8>,
}

impl Packer {
    pub fn push(self, value: u64, width: usize) -> Self {
        self.push_big(&BigUint::from(value), width)
    }

    pub fn push_big(mut self, value: &BigUint, width: usize) -> Self {
        for i in (0..width).rev() {
            if self.bits % 8 == 0 {
                self.data.push(0);
            }
            if value.bit(i as u64) {
                *self.data.last_mut().unwrap() |= 0x80 >> (self.bits % 8);
            }
            self.bits += 1;
        }
        self
    }

    pub fn finish(self, refs: Vec<Cell>) -> Cell {
        Cell::new(self.bits, self.data, refs).unwrap()
    }
}
