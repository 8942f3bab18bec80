use super::*;

/// Identity `B = I` of a fixed dimension, for standard eigenproblems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityMatProd {
    n: usize,
}

impl IdentityMatProd {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl<T: FloatT> MatProd<T> for IdentityMatProd {
    fn dim(&self) -> usize {
        self.n
    }

    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        check_operand_dims(self.n, x, y)?;
        y.copy_from_slice(x);
        Ok(())
    }
}
