//! Layout: shape of a dense row-major tensor

use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Layout of a dense tensor
///
/// Every tensor in this crate owns a freshly written row-major buffer, so a
/// layout is fully determined by its shape: element `[i0, ..., in]` lives at
/// the row-major linear index, which is also the column index of the
/// piecewise condition mask.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
}

impl Layout {
    /// Create a contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use piecewise::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.elem_count(), 24);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
        }
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements (1 for a scalar)
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check if the layout is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("shape", &self.shape.as_slice())
            .finish()
    }
}
