//! Row filters, ordering and limits

use std::cmp::Ordering;

use serde_json::Value;

use crate::Row;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Selection criteria for [`Persistence::select`](crate::Persistence::select)
///
/// Filters are equality tests combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<(String, Value)>,
    order: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Query {
    /// Match every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `column == value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Sort by `column`
    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    /// Keep at most `limit` rows
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Equality filters
    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    /// Whether a row passes every filter
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, expected)| row.get(column).is_some_and(|v| values_equal(v, expected)))
    }

    /// Filter, sort and truncate rows in memory
    pub fn apply(&self, rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
        let mut rows: Vec<Row> = rows.into_iter().filter(|row| self.matches(row)).collect();

        if let Some((column, order)) = &self.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match order {
                    Order::Asc => ord,
                    Order::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows
    }

    /// PostgREST query parameters (`col=eq.v`, `order=col.desc`, `limit=n`)
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", scalar_text(value))));
        }
        if let Some((column, order)) = &self.order {
            params.push(("order".to_string(), format!("{column}.{}", order.as_str())));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Text form of a scalar for comparisons and URLs
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Ids may be stored as numbers or strings
fn values_equal(actual: &Value, expected: &Value) -> bool {
    actual == expected || scalar_text(actual) == scalar_text(expected)
}

/// Nulls and missing values sort last in ascending order
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    fn versions() -> Vec<Row> {
        vec![
            row(json!({"id": "a", "template_id": "1", "version": 1})),
            row(json!({"id": "b", "template_id": "1", "version": 3})),
            row(json!({"id": "c", "template_id": "2", "version": 5})),
            row(json!({"id": "d", "template_id": 1, "version": 2})),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().filter_map(|r| r["id"].as_str()).collect()
    }

    #[test]
    fn test_filter_order_limit() {
        let query = Query::all()
            .eq("template_id", "1")
            .order_by("version", Order::Desc)
            .limit(2);
        let rows = query.apply(versions());
        assert_eq!(ids(&rows), vec!["b", "d"]);
    }

    #[test]
    fn test_numeric_ordering() {
        let rows = Query::all().order_by("version", Order::Asc).apply(versions());
        assert_eq!(ids(&rows), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_nulls_sort_last() {
        let rows = vec![
            row(json!({"id": "x"})),
            row(json!({"id": "y", "created_at": "2024-01-01T00:00:00Z"})),
        ];
        let rows = Query::all().order_by("created_at", Order::Asc).apply(rows);
        assert_eq!(ids(&rows), vec!["y", "x"]);
    }

    #[test]
    fn test_to_params() {
        let params = Query::all()
            .eq("template_id", "abc")
            .order_by("version", Order::Desc)
            .limit(1)
            .to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("template_id".to_string(), "eq.abc".to_string()),
                ("order".to_string(), "version.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }
}
