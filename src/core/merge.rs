// Field-wise update of a record from another record or a plain table.
use crate::core::error::{Error, ErrorKind};
use crate::core::record::Record;
use crate::core::shape::Shape;
use crate::core::table::{Table, value_from_cell};
use crate::core::value::Value;

/// Where `Record::update` takes its fields from.
#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    Record(&'a Record),
    Table(&'a Table),
}

impl<'a> From<&'a Record> for Source<'a> {
    fn from(record: &'a Record) -> Self {
        Source::Record(record)
    }
}

impl<'a> From<&'a Table> for Source<'a> {
    fn from(table: &'a Table) -> Self {
        Source::Table(table)
    }
}

impl Source<'_> {
    fn shape(&self) -> Shape {
        match self {
            Source::Record(record) => record.shape(),
            Source::Table(table) => table.shape.clone(),
        }
    }

    /// Snapshot of every source column in view order.
    fn columns(&self) -> Result<Vec<(String, Vec<Value>)>, Error> {
        match self {
            Source::Record(record) => record
                .fieldnames()
                .into_iter()
                .map(|name| {
                    let values = record.read(&name)?;
                    Ok::<_, Error>((name, values))
                })
                .collect(),
            Source::Table(table) => {
                table.validate()?;
                Ok(table
                    .columns
                    .iter()
                    .map(|column| {
                        let values = column.cells.iter().map(value_from_cell).collect();
                        (column.name.clone(), values)
                    })
                    .collect())
            }
        }
    }
}

impl Record {
    /// Overwrite or add every field of `source` at this handle's positions.
    ///
    /// Shapes must match exactly. Fields the source lacks keep their values;
    /// fields the target lacks are added across the whole core first. The
    /// source is snapshotted before any write, so it may alias the target.
    pub fn update<'a>(&self, source: impl Into<Source<'a>>) -> Result<(), Error> {
        let source = source.into();
        let source_shape = source.shape();
        let target_shape = self.shape();
        if source_shape != target_shape {
            return Err(Error::new(ErrorKind::ShapeMismatch).with_message(format!(
                "cannot update a {target_shape} record from a {source_shape} source"
            )));
        }
        let columns = source.columns()?;
        let positions = self.positions();

        let mut core = self.core.borrow_mut();
        for (name, values) in columns {
            let col = core.ensure_field(&name);
            for (&position, value) in positions.iter().zip(values) {
                core.set_cell(col, position, value);
            }
        }
        tracing::debug!(shape = %target_shape, fields = core.fields.len(), "record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::ErrorKind;
    use crate::core::expand::Entry;
    use crate::core::index::Index;
    use crate::core::record::Record;
    use crate::core::shape::Shape;
    use crate::core::table::{Cell, Table};
    use serde_json::json;

    #[test]
    fn update_adds_new_fields_and_keeps_the_rest() {
        let target = Record::from_pairs([("a", Entry::scalar(1)), ("b", Entry::scalar(2))])
            .expect("target");
        let source = Record::from_pairs([("b", Entry::scalar(20)), ("x", Entry::scalar("new"))])
            .expect("source");
        target.update(&source).expect("update");

        assert_eq!(target.fieldnames(), vec!["a", "b", "x"]);
        assert_eq!(target.get("a").expect("a").as_i64(), Some(1));
        assert_eq!(target.get("b").expect("b").as_i64(), Some(20));
        assert_eq!(target.get("x").expect("x").as_str(), Some("new"));
        assert_eq!(source.fieldnames(), vec!["b", "x"]);
        assert_eq!(source.get("b").expect("b").as_i64(), Some(20));
        assert_eq!(source.get("x").expect("x").as_str(), Some("new"));
    }

    #[test]
    fn update_from_table_works_positionwise() {
        let target = Record::from_pairs([("id", Entry::list([1, 2]))]).expect("target");
        let table = Table::new([1, 2]).with_column("label", [json!("one"), json!("two")]);
        target.update(&table).expect("update");
        let labels = target.read("label").expect("read");
        assert_eq!(labels[0].as_str(), Some("one"));
        assert_eq!(labels[1].as_str(), Some("two"));
    }

    #[test]
    fn shape_mismatch_leaves_target_untouched() {
        let target = Record::from_pairs([("id", Entry::list([1, 2]))]).expect("target");
        let source = Record::from_pairs([("fresh", Entry::list([1, 2, 3]))]).expect("source");
        let err = target.update(&source).expect_err("shape");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(!target.has_field("fresh"));

        let bad_table = Table::new([1, 2]).with_column("fresh", [Cell::from(json!(1))]);
        let err = target.update(&bad_table).expect_err("invalid table");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(!target.has_field("fresh"));
    }

    #[test]
    fn slice_update_materializes_field_everywhere() {
        let target = Record::new(Shape::row(3), ["id"]).expect("target");
        let middle = target.at_linear(1).expect("at");
        let patch = Record::from_pairs([("mode", Entry::scalar("fast"))]).expect("patch");
        middle.update(&patch).expect("update");
        let modes = target.read("mode").expect("read");
        assert!(modes[0].is_empty());
        assert_eq!(modes[1].as_str(), Some("fast"));
        assert!(modes[2].is_empty());
    }

    #[test]
    fn update_from_alias_is_safe() {
        let rec = Record::from_pairs([("v", Entry::list([1, 2]))]).expect("record");
        let first = rec.at(&[Index::At(0)]).expect("first");
        let second = rec.at(&[Index::At(1)]).expect("second");
        first.update(&second).expect("update");
        let values = rec.read("v").expect("read");
        assert_eq!(values[0].as_i64(), Some(2));
        assert_eq!(values[1].as_i64(), Some(2));
    }
}
