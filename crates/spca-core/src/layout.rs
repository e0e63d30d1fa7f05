//! Named parameter blocks packed into one flat vector.
//!
//! Every objective in this workspace is a function of a few vectors
//! (`u`, `v`, `w`) whose lengths depend on the method. Optimizers only see a
//! single flat `DVector`; a [`ParameterLayout`] records where each named block
//! lives inside it so that objectives can slice their factors back out.

use crate::{
    error::{ModelError, Result},
    types::{DVector, Scalar},
};
use nalgebra::{DVectorView, DVectorViewMut};
use rand::Rng;
use rand_distr::StandardNormal;

/// A named, contiguous block of the flat parameter vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBlock {
    /// Block name used in diagnostics ("u", "v", "w")
    pub name: &'static str,
    /// Offset of the first entry in the flat vector
    pub offset: usize,
    /// Number of entries
    pub len: usize,
}

/// Ordered set of parameter blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterLayout {
    blocks: Vec<ParameterBlock>,
}

impl ParameterLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block of `len` entries after the existing ones.
    pub fn with_block(mut self, name: &'static str, len: usize) -> Self {
        let offset = self.total_len();
        self.blocks.push(ParameterBlock { name, offset, len });
        self
    }

    /// Total length of the flat parameter vector.
    pub fn total_len(&self) -> usize {
        self.blocks.last().map_or(0, |b| b.offset + b.len)
    }

    /// Number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[ParameterBlock] {
        &self.blocks
    }

    /// Looks up a block by name.
    pub fn block(&self, name: &str) -> Result<&ParameterBlock> {
        self.blocks
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ModelError::invalid_parameter(format!("unknown parameter block '{}'", name)))
    }

    /// Checks that `point` has exactly the length this layout describes.
    pub fn validate<T: Scalar>(&self, point: &DVector<T>) -> Result<()> {
        if point.len() != self.total_len() {
            return Err(ModelError::dimension_mismatch(
                self.total_len(),
                point.len(),
            ));
        }
        Ok(())
    }

    /// Borrowed view of block `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the point is shorter than the
    /// layout; call [`validate`](Self::validate) first.
    pub fn view<'a, T: Scalar>(&self, point: &'a DVector<T>, index: usize) -> DVectorView<'a, T> {
        let block = &self.blocks[index];
        point.rows(block.offset, block.len)
    }

    /// Mutable view of block `index`.
    pub fn view_mut<'a, T: Scalar>(
        &self,
        point: &'a mut DVector<T>,
        index: usize,
    ) -> DVectorViewMut<'a, T> {
        let block = &self.blocks[index];
        point.rows_mut(block.offset, block.len)
    }

    /// Copies every block out of `point` as an owned vector.
    pub fn split<T: Scalar>(&self, point: &DVector<T>) -> Result<Vec<DVector<T>>> {
        self.validate(point)?;
        Ok((0..self.blocks.len())
            .map(|i| self.view(point, i).into_owned())
            .collect())
    }

    /// Packs owned blocks back into a flat vector.
    pub fn join<T: Scalar>(&self, parts: &[DVector<T>]) -> Result<DVector<T>> {
        if parts.len() != self.blocks.len() {
            return Err(ModelError::dimension_mismatch(
                format!("{} blocks", self.blocks.len()),
                format!("{} blocks", parts.len()),
            ));
        }

        let mut point = DVector::zeros(self.total_len());
        for (i, (block, part)) in self.blocks.iter().zip(parts).enumerate() {
            if part.len() != block.len {
                return Err(ModelError::dimension_mismatch(
                    format!("block '{}' of length {}", block.name, block.len),
                    part.len(),
                ));
            }
            self.view_mut(&mut point, i).copy_from(part);
        }
        Ok(point)
    }

    /// Draws every entry independently from a standard normal distribution.
    pub fn random_point<T: Scalar, R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<T> {
        DVector::from_fn(self.total_len(), |_, _| {
            let val: f64 = rng.sample(StandardNormal);
            <T as Scalar>::from_f64(val)
        })
    }
}
