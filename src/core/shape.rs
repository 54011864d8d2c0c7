// N-dimensional shapes with first-dimension-fastest linear addressing.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Array extent per dimension.
///
/// Always carries at least two dimensions; trailing singleton dimensions past
/// the second are dropped so `[2, 3, 1]` and `[2, 3]` compare equal. Linear
/// positions enumerate the first dimension fastest.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        let mut dims = dims.into();
        while dims.len() < 2 {
            dims.push(1);
        }
        while dims.len() > 2 && dims.last() == Some(&1) {
            dims.pop();
        }
        Self { dims }
    }

    /// The `1x1` shape of a single record.
    pub fn scalar() -> Self {
        Self::new([1, 1])
    }

    /// The `0x0` shape of an empty record array.
    pub fn zeros() -> Self {
        Self::new([0, 0])
    }

    pub fn row(len: usize) -> Self {
        Self::new([1, len])
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Extent along `dim`; dimensions past the stored ones are singletons.
    pub fn dim(&self, dim: usize) -> usize {
        self.dims.get(dim).copied().unwrap_or(1)
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Element count, or `None` when the extents overflow `usize`.
    pub(crate) fn checked_numel(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    pub fn is_all_zero(&self) -> bool {
        self.dims.iter().all(|&dim| dim == 0)
    }

    pub(crate) fn with_dim(&self, dim: usize, extent: usize) -> Self {
        let mut dims = self.dims.clone();
        if dims.len() <= dim {
            dims.resize(dim + 1, 1);
        }
        dims[dim] = extent;
        Self::new(dims)
    }

    /// Linear position of `subs`; subscripts beyond `ndims` must be zero.
    pub(crate) fn linear(&self, subs: &[usize]) -> usize {
        let mut linear = 0;
        let mut stride = 1;
        for (dim, sub) in subs.iter().enumerate() {
            linear += sub * stride;
            stride *= self.dim(dim);
        }
        linear
    }

    /// Subscripts of `linear`, padded or truncated to `ndims` entries.
    pub(crate) fn subscripts(&self, mut linear: usize, ndims: usize) -> Vec<usize> {
        let mut subs = Vec::with_capacity(ndims);
        for dim in 0..ndims {
            let extent = self.dim(dim);
            if extent == 0 {
                subs.push(0);
                continue;
            }
            subs.push(linear % extent);
            linear /= extent;
        }
        subs
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::scalar()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims)
    }
}

impl From<Shape> for Vec<usize> {
    fn from(shape: Shape) -> Self {
        shape.dims
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .dims
            .iter()
            .map(|dim| dim.to_string())
            .collect::<Vec<_>>()
            .join("x");
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::Shape;

    #[test]
    fn shapes_are_normalized() {
        assert_eq!(Shape::new([3]).dims(), &[3, 1]);
        assert_eq!(Shape::new(Vec::<usize>::new()).dims(), &[1, 1]);
        assert_eq!(Shape::new([2, 3, 1, 1]), Shape::new([2, 3]));
        assert_eq!(Shape::new([2, 1, 4]).dims(), &[2, 1, 4]);
    }

    #[test]
    fn numel_and_emptiness() {
        assert_eq!(Shape::new([2, 3, 4]).numel(), 24);
        assert!(Shape::zeros().is_empty());
        assert!(Shape::zeros().is_all_zero());
        assert!(Shape::new([0, 3]).is_empty());
        assert!(!Shape::new([0, 3]).is_all_zero());
    }

    #[test]
    fn checked_numel_reports_overflow() {
        assert_eq!(Shape::new([2, 3]).checked_numel(), Some(6));
        assert_eq!(Shape::new([usize::MAX, 2]).checked_numel(), None);
        assert_eq!(Shape::new([usize::MAX, 0]).checked_numel(), Some(0));
    }

    #[test]
    fn linear_order_is_first_dimension_fastest() {
        let shape = Shape::new([2, 3]);
        assert_eq!(shape.linear(&[1, 0]), 1);
        assert_eq!(shape.linear(&[0, 1]), 2);
        assert_eq!(shape.linear(&[1, 2]), 5);
        assert_eq!(shape.subscripts(5, 2), vec![1, 2]);
        assert_eq!(shape.subscripts(3, 3), vec![1, 1, 0]);
    }

    #[test]
    fn with_dim_extends_dimensions() {
        let shape = Shape::new([2, 3]).with_dim(2, 4);
        assert_eq!(shape.dims(), &[2, 3, 4]);
        assert_eq!(Shape::scalar().with_dim(1, 5), Shape::row(5));
    }

    #[test]
    fn display_uses_x_separator() {
        assert_eq!(Shape::new([1, 2]).to_string(), "1x2");
    }

    #[test]
    fn serde_uses_plain_dims() {
        let shape: Shape = serde_json::from_str("[4]").expect("decode");
        assert_eq!(shape.dims(), &[4, 1]);
        let text = serde_json::to_string(&Shape::new([2, 3])).expect("encode");
        assert_eq!(text, "[2,3]");
    }
}
