// Index resolution from user subscripts to view-local positions.
use std::ops::Range;

use crate::core::error::{Error, ErrorKind};
use crate::core::shape::Shape;

/// One subscript of an indexing expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Index {
    At(usize),
    Range(Range<usize>),
    List(Vec<usize>),
    All,
}

impl From<usize> for Index {
    fn from(index: usize) -> Self {
        Index::At(index)
    }
}

impl From<Range<usize>> for Index {
    fn from(range: Range<usize>) -> Self {
        Index::Range(range)
    }
}

impl From<Vec<usize>> for Index {
    fn from(list: Vec<usize>) -> Self {
        Index::List(list)
    }
}

/// Positions addressed by an indexing expression, relative to the indexed view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Selection {
    pub positions: Vec<usize>,
    pub shape: Shape,
}

/// Resolve `indices` against `shape`.
///
/// A single index addresses positions linearly; otherwise one index per
/// dimension is required. Results enumerate the first dimension fastest.
pub(crate) fn resolve(shape: &Shape, indices: &[Index]) -> Result<Selection, Error> {
    match indices.len() {
        0 => Err(Error::new(ErrorKind::IndexOutOfRange).with_message("no subscripts given")),
        1 => resolve_linear(shape, &indices[0]),
        n if n == shape.ndims() => resolve_subscripts(shape, indices),
        n => Err(Error::new(ErrorKind::IndexOutOfRange).with_message(format!(
            "expected 1 or {} subscripts for shape {shape}, got {n}",
            shape.ndims()
        ))),
    }
}

fn resolve_linear(shape: &Shape, index: &Index) -> Result<Selection, Error> {
    let positions = expand(index, shape.numel())?;
    let result_shape = match index {
        Index::At(_) => Shape::scalar(),
        _ => Shape::row(positions.len()),
    };
    Ok(Selection {
        positions,
        shape: result_shape,
    })
}

fn resolve_subscripts(shape: &Shape, indices: &[Index]) -> Result<Selection, Error> {
    let per_dim = indices
        .iter()
        .enumerate()
        .map(|(dim, index)| expand(index, shape.dim(dim)))
        .collect::<Result<Vec<_>, _>>()?;
    let result_shape = Shape::new(per_dim.iter().map(Vec::len).collect::<Vec<_>>());

    let total = result_shape.numel();
    let mut positions = Vec::with_capacity(total);
    let mut subs = vec![0usize; per_dim.len()];
    for linear in 0..total {
        let mut rest = linear;
        for (dim, choices) in per_dim.iter().enumerate() {
            subs[dim] = choices[rest % choices.len()];
            rest /= choices.len();
        }
        positions.push(shape.linear(&subs));
    }
    Ok(Selection {
        positions,
        shape: result_shape,
    })
}

fn expand(index: &Index, extent: usize) -> Result<Vec<usize>, Error> {
    match index {
        Index::At(at) => {
            check_bound(*at, extent)?;
            Ok(vec![*at])
        }
        Index::Range(range) => {
            if range.start > range.end || range.end > extent {
                return Err(Error::new(ErrorKind::IndexOutOfRange).with_message(format!(
                    "range {}..{} exceeds extent {extent}",
                    range.start, range.end
                )));
            }
            Ok(range.clone().collect())
        }
        Index::List(list) => {
            for at in list {
                check_bound(*at, extent)?;
            }
            Ok(list.clone())
        }
        Index::All => Ok((0..extent).collect()),
    }
}

fn check_bound(at: usize, extent: usize) -> Result<(), Error> {
    if at >= extent {
        return Err(Error::new(ErrorKind::IndexOutOfRange)
            .with_message(format!("index {at} exceeds extent {extent}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Index, resolve};
    use crate::core::error::ErrorKind;
    use crate::core::shape::Shape;

    #[test]
    fn linear_index_selects_one_position() {
        let selection = resolve(&Shape::new([2, 3]), &[Index::At(4)]).expect("resolve");
        assert_eq!(selection.positions, vec![4]);
        assert_eq!(selection.shape, Shape::scalar());
    }

    #[test]
    fn subscripts_enumerate_first_dimension_fastest() {
        let shape = Shape::new([2, 3]);
        let selection =
            resolve(&shape, &[Index::All, Index::Range(1..3)]).expect("resolve");
        assert_eq!(selection.shape, Shape::new([2, 2]));
        assert_eq!(selection.positions, vec![2, 3, 4, 5]);
    }

    #[test]
    fn list_preserves_order_and_repeats() {
        let selection =
            resolve(&Shape::row(4), &[Index::List(vec![3, 0, 3])]).expect("resolve");
        assert_eq!(selection.positions, vec![3, 0, 3]);
        assert_eq!(selection.shape, Shape::row(3));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let shape = Shape::new([2, 2]);
        let err = resolve(&shape, &[Index::At(4)]).expect_err("linear overflow");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);

        let err = resolve(&shape, &[Index::At(0), Index::At(2)]).expect_err("column overflow");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);

        let err = resolve(&shape, &[Index::Range(1..3), Index::All]).expect_err("range overflow");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn wrong_subscript_count_is_rejected() {
        let shape = Shape::new([2, 2]);
        let err = resolve(&shape, &[]).expect_err("empty");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        let err = resolve(&shape, &[Index::All, Index::All, Index::All]).expect_err("too many");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }
}
