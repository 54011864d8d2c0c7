// Concatenation of record arrays along one dimension.
use crate::core::error::{Error, ErrorKind};
use crate::core::record::Record;
use crate::core::storage::Core;
use crate::core::value::Value;

/// Concatenate `records` along the 0-based dimension `dim` into a new array.
///
/// Every input must carry the same field set, in any order; the result
/// follows the first input's order. Extents must agree on every dimension
/// except `dim`. All-zero shapes (see [`Record::empty`]) take part in the
/// schema check only.
pub fn concat(dim: usize, records: &[Record]) -> Result<Record, Error> {
    let Some(first) = records.first() else {
        return Err(Error::new(ErrorKind::ShapeMismatch).with_message("nothing to concatenate"));
    };
    let Some(ndims_min) = dim.checked_add(1) else {
        return Err(Error::new(ErrorKind::ShapeMismatch)
            .with_message(format!("dimension {dim} is out of range")));
    };
    let fields = first.fieldnames();
    let mut expected = fields.clone();
    expected.sort();
    for (idx, record) in records.iter().enumerate().skip(1) {
        let mut names = record.fieldnames();
        names.sort();
        if names != expected {
            return Err(Error::new(ErrorKind::SchemaMismatch).with_message(format!(
                "input {idx} has fields {names:?}, expected {expected:?}"
            )));
        }
    }

    let parts = records
        .iter()
        .map(|record| (record.shape(), record))
        .filter(|(shape, _)| !shape.is_all_zero())
        .collect::<Vec<_>>();
    let Some((reference, _)) = parts.first() else {
        return Record::empty_with_fields(None, fields);
    };

    let ndims = parts
        .iter()
        .map(|(shape, _)| shape.ndims())
        .max()
        .unwrap_or(2)
        .max(ndims_min);
    for (shape, _) in &parts[1..] {
        for axis in (0..ndims).filter(|&axis| axis != dim) {
            if shape.dim(axis) != reference.dim(axis) {
                return Err(Error::new(ErrorKind::ShapeMismatch).with_message(format!(
                    "cannot concatenate {shape} with {reference} along dimension {dim}"
                )));
            }
        }
    }

    let total = parts.iter().map(|(shape, _)| shape.dim(dim)).sum();
    let out_shape = reference.with_dim(dim, total);

    // Per input: one column per result field, in view order.
    let inputs = parts
        .iter()
        .map(|(_, record)| {
            fields
                .iter()
                .map(|name| record.read(name))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let numel = out_shape.numel();
    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(numel); fields.len()];
    for linear in 0..numel {
        let mut subs = out_shape.subscripts(linear, ndims);
        let mut part = 0;
        while subs[dim] >= parts[part].0.dim(dim) {
            subs[dim] -= parts[part].0.dim(dim);
            part += 1;
        }
        let source = parts[part].0.linear(&subs);
        for (column, input) in columns.iter_mut().zip(&inputs[part]) {
            column.push(input[source].clone());
        }
    }

    tracing::debug!(dim, inputs = records.len(), shape = %out_shape, "records concatenated");
    Ok(Record::from_core(Core::from_columns(out_shape, fields, columns)?))
}

#[cfg(test)]
mod tests {
    use super::concat;
    use crate::core::error::ErrorKind;
    use crate::core::expand::Entry;
    use crate::core::record::Record;
    use crate::core::shape::Shape;

    fn ids(record: &Record) -> Vec<Option<i64>> {
        record
            .read("id")
            .expect("read")
            .iter()
            .map(|value| value.as_i64())
            .collect()
    }

    #[test]
    fn concatenates_along_second_dimension() {
        let a = Record::from_pairs([("id", Entry::array([2, 2], [1, 2, 3, 4]))]).expect("a");
        let b = Record::from_pairs([("id", Entry::array([2, 1], [5, 6]))]).expect("b");
        let joined = concat(1, &[a, b]).expect("concat");
        assert_eq!(joined.shape(), Shape::new([2, 3]));
        assert_eq!(ids(&joined), vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]);
    }

    #[test]
    fn concatenates_along_first_dimension() {
        let a = Record::from_pairs([("id", Entry::array([1, 2], [1, 2]))]).expect("a");
        let b = Record::from_pairs([("id", Entry::array([2, 2], [3, 4, 5, 6]))]).expect("b");
        let joined = concat(0, &[a, b]).expect("concat");
        assert_eq!(joined.shape(), Shape::new([3, 2]));
        assert_eq!(ids(&joined), vec![Some(1), Some(3), Some(4), Some(2), Some(5), Some(6)]);
    }

    #[test]
    fn concatenates_along_new_dimension() {
        let a = Record::from_pairs([("id", Entry::list([1, 2]))]).expect("a");
        let b = Record::from_pairs([("id", Entry::list([3, 4]))]).expect("b");
        let joined = concat(2, &[a, b]).expect("concat");
        assert_eq!(joined.shape(), Shape::new([1, 2, 2]));
        assert_eq!(ids(&joined), vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn first_input_field_order_wins() {
        let a = Record::from_pairs([("id", Entry::scalar(1)), ("tag", Entry::scalar("a"))])
            .expect("a");
        let b = Record::from_pairs([("tag", Entry::scalar("b")), ("id", Entry::scalar(2))])
            .expect("b");
        let joined = concat(1, &[a, b]).expect("concat");
        assert_eq!(joined.fieldnames(), vec!["id", "tag"]);
        let tags = joined.read("tag").expect("read");
        assert_eq!(tags[1].as_str(), Some("b"));
    }

    #[test]
    fn mismatched_fields_are_rejected() {
        let a = Record::from_pairs([("id", Entry::scalar(1))]).expect("a");
        let b = Record::from_pairs([("other", Entry::scalar(2))]).expect("b");
        let err = concat(1, &[a, b]).expect_err("schema");
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn mismatched_extents_are_rejected() {
        let a = Record::from_pairs([("id", Entry::array([2, 1], [1, 2]))]).expect("a");
        let b = Record::from_pairs([("id", Entry::array([3, 1], [3, 4, 5]))]).expect("b");
        let err = concat(1, &[a, b]).expect_err("shape");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(concat(1, &[]).is_err());
    }

    #[test]
    fn unrepresentable_dimension_is_rejected() {
        let a = Record::from_pairs([("id", Entry::scalar(1))]).expect("a");
        let err = concat(usize::MAX, &[a.clone(), a]).expect_err("dim");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn empty_inputs_are_skipped() {
        let empty = Record::empty_with_fields(None, ["id"]).expect("empty");
        let a = Record::from_pairs([("id", Entry::array([2, 1], [1, 2]))]).expect("a");
        let joined = concat(1, &[empty.clone(), a]).expect("concat");
        assert_eq!(joined.shape(), Shape::new([2, 1]));

        let nothing = concat(0, &[empty.clone(), empty]).expect("all empty");
        assert_eq!(nothing.shape(), Shape::zeros());
        assert_eq!(nothing.fieldnames(), vec!["id"]);
    }

    #[test]
    fn result_owns_new_storage() {
        let a = Record::from_pairs([("id", Entry::scalar(1))]).expect("a");
        let joined = concat(1, &[a.clone(), a.clone()]).expect("concat");
        joined.at_linear(0).expect("at").set("id", 99);
        assert_eq!(a.get("id").expect("get").as_i64(), Some(1));
    }
}
