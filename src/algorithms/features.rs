use ndarray::{Array2, Axis};

use crate::models::CanonicalRecord;

/// Fixed candidate list of numeric catalog attributes, in column order.
pub const NUMERIC_COLUMNS: [&str; 4] = ["price", "discountPercentage", "rating", "stock"];

/// Prefix applied to scaled output columns so they cannot collide with
/// the source attribute names.
pub const SCALED_PREFIX: &str = "scaled_";

/// Hand-tuned importance weights applied after min-max normalization.
/// Columns without an assigned weight keep their normalized value.
fn importance_weight(column: &str) -> f64 {
    match column {
        "price" => 0.5,
        "discountPercentage" => 2.0,
        "rating" => 3.0,
        "stock" => 1.0,
        _ => 1.0,
    }
}

fn raw_value(record: &CanonicalRecord, column: &str) -> f64 {
    let value = match column {
        "price" => record.product.price,
        "discountPercentage" => record.product.discount_percentage,
        "rating" => record.product.rating,
        "stock" => record.product.stock,
        _ => None,
    };
    // Missing or unparseable values coerce to zero before scaling.
    value.unwrap_or(0.0)
}

/// The scaled, weighted numeric feature block, one row per canonical
/// record, column order matching [`NUMERIC_COLUMNS`].
#[derive(Debug, Clone)]
pub struct ScaledNumericBlock {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl ScaledNumericBlock {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, index: usize) -> Vec<f64> {
        self.values.row(index).to_vec()
    }
}

/// Min-max normalizes each candidate column to [0, 1] against the
/// current batch, then applies the importance weights.
///
/// The scale is dataset-relative: the same product scores differently
/// when the surrounding batch changes.
pub fn scale_numeric_features(records: &[CanonicalRecord]) -> ScaledNumericBlock {
    let mut values = Array2::<f64>::zeros((records.len(), NUMERIC_COLUMNS.len()));
    for (i, record) in records.iter().enumerate() {
        for (j, column) in NUMERIC_COLUMNS.iter().enumerate() {
            values[[i, j]] = raw_value(record, column);
        }
    }

    for (j, column) in NUMERIC_COLUMNS.iter().enumerate() {
        let mut col = values.index_axis_mut(Axis(1), j);
        let min = col.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = col.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let weight = importance_weight(column);
        col.mapv_inplace(|v| {
            // A constant column carries no signal and scales to zero.
            let normalized = if range > 0.0 { (v - min) / range } else { 0.0 };
            normalized * weight
        });
    }

    ScaledNumericBlock {
        columns: NUMERIC_COLUMNS
            .iter()
            .map(|c| format!("{SCALED_PREFIX}{c}"))
            .collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, Signal};
    use chrono::Utc;

    fn record_with_price(id: &str, price: f64) -> CanonicalRecord {
        CanonicalRecord {
            user_id: "no_user".to_string(),
            username: "guest".to_string(),
            quantity: 1,
            size: "M".to_string(),
            interaction_date: Utc::now(),
            signal: Signal::NoInteraction,
            product: Product::new(id, "item").with_pricing(price, 0.0),
            combined_text: String::new(),
        }
    }

    #[test]
    fn min_max_normalizes_to_unit_range() {
        let records = vec![
            record_with_price("a", 10.0),
            record_with_price("b", 20.0),
            record_with_price("c", 30.0),
        ];
        let block = scale_numeric_features(&records);
        // price carries weight 0.5 on top of [0.0, 0.5, 1.0]
        assert_eq!(block.values[[0, 0]], 0.0);
        assert_eq!(block.values[[1, 0]], 0.25);
        assert_eq!(block.values[[2, 0]], 0.5);
    }

    #[test]
    fn constant_column_scales_to_zero() {
        let records = vec![record_with_price("a", 5.0), record_with_price("b", 5.0)];
        let block = scale_numeric_features(&records);
        assert_eq!(block.values[[0, 0]], 0.0);
        assert_eq!(block.values[[1, 0]], 0.0);
    }

    #[test]
    fn output_columns_are_prefixed() {
        let block = scale_numeric_features(&[record_with_price("a", 1.0)]);
        assert_eq!(block.columns[0], "scaled_price");
        assert_eq!(block.columns[1], "scaled_discountPercentage");
    }
}
