use datafusion::arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::DataType;
use datafusion::arrow::record_batch::RecordBatch;

use super::error::StoreError;
use crate::table::{ResultTable, Value};

/// Convert collected batches into a table whose columns are `columns`, in order
pub(crate) fn batches_to_table(columns: &[String], batches: &[RecordBatch]) -> Result<ResultTable, StoreError> {
    let mut table = ResultTable::new(columns.iter().cloned());

    for batch in batches {
        let mut cells: Vec<Vec<Value>> = Vec::with_capacity(columns.len());
        for name in columns {
            let array = batch
                .column_by_name(name)
                .ok_or_else(|| StoreError::Conversion(format!("missing column '{}' in result", name)))?;
            cells.push(array_values(array)?);
        }

        for row in 0..batch.num_rows() {
            let values = cells.iter().map(|col| col[row].clone()).collect();
            table
                .push_row(values)
                .map_err(|e| StoreError::Conversion(e.to_string()))?;
        }
    }

    Ok(table)
}

fn array_values(array: &ArrayRef) -> Result<Vec<Value>, StoreError> {
    match array.data_type() {
        DataType::Null => Ok(vec![Value::Null; array.len()]),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let casted = cast(array, &DataType::Int64).map_err(|e| StoreError::Conversion(e.to_string()))?;
            let ints = downcast::<Int64Array>(&casted)?;
            Ok((0..ints.len())
                .map(|i| if ints.is_null(i) { Value::Null } else { Value::Int(ints.value(i)) })
                .collect())
        }
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => {
            let casted = cast(array, &DataType::Float64).map_err(|e| StoreError::Conversion(e.to_string()))?;
            let floats = downcast::<Float64Array>(&casted)?;
            Ok((0..floats.len())
                .map(|i| if floats.is_null(i) { Value::Null } else { Value::Float(floats.value(i)) })
                .collect())
        }
        _ => {
            let casted = cast(array, &DataType::Utf8).map_err(|e| StoreError::Conversion(e.to_string()))?;
            let strings = downcast::<StringArray>(&casted)?;
            Ok((0..strings.len())
                .map(|i| {
                    if strings.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(strings.value(i).to_string())
                    }
                })
                .collect())
        }
    }
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T, StoreError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| StoreError::Conversion(format!("unexpected array type {}", array.data_type())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{Int32Array, StringArray};
    use datafusion::arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_batches_to_table() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("State", DataType::Utf8, true),
            Field::new("Users", DataType::Int32, true),
            Field::new("Share", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("goa"), None])),
                Arc::new(Int32Array::from(vec![Some(5), None])),
                Arc::new(Float64Array::from(vec![0.5, 1.5])),
            ],
        )
        .unwrap();

        let columns = vec!["Share".to_string(), "State".to_string(), "Users".to_string()];
        let table = batches_to_table(&columns, &[batch]).unwrap();
        assert_eq!(table.columns(), ["Share", "State", "Users"]);
        assert_eq!(
            table.rows(),
            [
                vec![Value::Float(0.5), Value::from("goa"), Value::Int(5)],
                vec![Value::Float(1.5), Value::Null, Value::Null],
            ]
        );
    }

    #[test]
    fn test_missing_column_is_a_conversion_error() {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();
        let err = batches_to_table(&["b".to_string()], &[batch]).unwrap_err();
        assert!(matches!(err, StoreError::Conversion(_)));
    }
}
