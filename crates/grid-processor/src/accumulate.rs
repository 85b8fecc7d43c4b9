//! Running totals across an hourly grid sequence.

use tracing::debug;
use wx_common::Grid2D;

use crate::error::Result;

/// Element-wise running sum of same-shaped grids.
///
/// The first grid fixes the shape; every later grid must match it. NaN
/// propagates into the total for the cells it touches.
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    total: Option<Grid2D>,
    steps: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one grid, taking ownership so the first step needs no copy.
    pub fn push(&mut self, grid: Grid2D) -> Result<()> {
        match &mut self.total {
            Some(total) => total.add_assign(&grid)?,
            None => self.total = Some(grid),
        }
        self.steps += 1;
        debug!(steps = self.steps, "Accumulated grid");
        Ok(())
    }

    /// Add one grid by reference.
    pub fn add(&mut self, grid: &Grid2D) -> Result<()> {
        match &mut self.total {
            Some(total) => {
                total.add_assign(grid)?;
                self.steps += 1;
                Ok(())
            }
            None => self.push(grid.clone()),
        }
    }

    /// Number of grids added so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn shape(&self) -> Option<(usize, usize)> {
        self.total.as_ref().map(Grid2D::shape)
    }

    pub fn total(&self) -> Option<&Grid2D> {
        self.total.as_ref()
    }

    /// The total, or `None` if nothing was added.
    pub fn finish(self) -> Option<Grid2D> {
        self.total
    }
}

/// Sum a sequence of grids. An empty sequence yields `None`.
pub fn accumulate<I>(grids: I) -> Result<Option<Grid2D>>
where
    I: IntoIterator<Item = Grid2D>,
{
    let acc = grids
        .into_iter()
        .try_fold(Accumulator::new(), |mut acc, grid| {
            acc.push(grid)?;
            Ok::<_, crate::GridProcessorError>(acc)
        })?;
    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence() {
        assert!(accumulate(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_add_by_reference() {
        let g = Grid2D::filled(2, 2, 1.5);
        let mut acc = Accumulator::new();
        acc.add(&g).unwrap();
        acc.add(&g).unwrap();
        assert_eq!(acc.steps(), 2);
        assert_eq!(acc.total().unwrap().data(), &[3.0; 4]);
    }
}
