//! Row layout.
//!
//! Fields are bucketed by their layout row and rows are emitted in ascending
//! numeric order. Within a row, schema order is preserved.

use std::collections::BTreeMap;

use crate::schema::FieldSpec;

/// The fields that share one layout row.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow<'a> {
    /// Row number.
    pub row: i64,
    /// Fields of this row in schema order.
    pub fields: Vec<&'a FieldSpec>,
}

/// Groups `fields` into rows.
///
/// ```
/// use cms_forms_engine::layout::group_rows;
/// use cms_forms_engine::schema::FieldSpec;
///
/// let fields = vec![
///     FieldSpec::new("a", "text", "A").row(2),
///     FieldSpec::new("b", "text", "B").row(1),
///     FieldSpec::new("c", "text", "C").row(1),
/// ];
/// let rows = group_rows(&fields);
/// let order: Vec<&str> = rows.iter().flat_map(|r| r.fields.iter().map(|f| f.id.as_str())).collect();
/// assert_eq!(order, ["b", "c", "a"]);
/// ```
pub fn group_rows(fields: &[FieldSpec]) -> Vec<LayoutRow<'_>> {
    let mut buckets: BTreeMap<i64, Vec<&FieldSpec>> = BTreeMap::new();
    for field in fields {
        buckets.entry(field.layout_row()).or_default().push(field);
    }
    buckets
        .into_iter()
        .map(|(row, fields)| LayoutRow { row, fields })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[LayoutRow<'_>]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.fields.iter().map(|f| f.id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_rows_sorted_numerically() {
        let fields = vec![
            FieldSpec::new("ten", "text", "").row(10),
            FieldSpec::new("two", "text", "").row(2),
        ];
        let rows = group_rows(&fields);
        assert_eq!(rows.iter().map(|r| r.row).collect::<Vec<_>>(), [2, 10]);
    }

    #[test]
    fn test_missing_row_defaults_to_one() {
        let fields = vec![
            FieldSpec::new("b", "text", "").row(1),
            FieldSpec::new("a", "text", ""),
        ];
        let rows = group_rows(&fields);
        assert_eq!(rows.len(), 1);
        assert_eq!(ids(&rows), vec![vec!["b".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_empty_schema() {
        assert!(group_rows(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let fields = vec![
            FieldSpec::new("x", "text", "").row(3),
            FieldSpec::new("y", "text", "").row(-1),
            FieldSpec::new("z", "text", "").row(3),
        ];
        assert_eq!(group_rows(&fields), group_rows(&fields));
        assert_eq!(
            ids(&group_rows(&fields)),
            vec![vec!["y".to_string()], vec!["x".to_string(), "z".to_string()]]
        );
    }
}
