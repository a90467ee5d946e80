//! The outer `$query` envelope of a find.

use serde_json::Value;

use crate::wire::Document;

/// Optional find modifiers sent alongside a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub order_by: Option<Document>,
    pub comment: Option<String>,
    pub hint: Option<Value>,
    pub max_scan: Option<i64>,
    pub min: Option<Document>,
    pub max: Option<Document>,
    pub snapshot: bool,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        self == &QueryOptions::default()
    }

    /// Wrap `query` in an envelope carrying the set options.
    ///
    /// Without options the query is returned as is.
    ///
    /// # Examples
    /// ```
    /// use chainql::envelope::QueryOptions;
    /// use serde_json::{Map, json};
    ///
    /// let mut order_by = Map::new();
    /// order_by.insert("age".into(), json!(-1));
    /// let options = QueryOptions { order_by: Some(order_by), ..Default::default() };
    ///
    /// let wrapped = options.wrap(Map::new());
    /// assert_eq!(json!(wrapped), json!({"$query": {}, "$orderby": {"age": -1}}));
    /// ```
    pub fn wrap(&self, query: Document) -> Document {
        if self.is_empty() {
            return query;
        }

        let mut envelope = Document::new();
        envelope.insert("$query".into(), Value::Object(query));
        if let Some(order_by) = &self.order_by {
            envelope.insert("$orderby".into(), Value::Object(order_by.clone()));
        }
        if let Some(comment) = &self.comment {
            envelope.insert("$comment".into(), Value::String(comment.clone()));
        }
        if let Some(hint) = &self.hint {
            envelope.insert("$hint".into(), hint.clone());
        }
        if let Some(max_scan) = self.max_scan {
            envelope.insert("$maxScan".into(), Value::from(max_scan));
        }
        if let Some(min) = &self.min {
            envelope.insert("$min".into(), Value::Object(min.clone()));
        }
        if let Some(max) = &self.max {
            envelope.insert("$max".into(), Value::Object(max.clone()));
        }
        if self.snapshot {
            envelope.insert("$snapshot".into(), Value::Bool(true));
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_options_leaves_query_bare() {
        let Value::Object(query) = json!({"age": {"$gt": 18}}) else {
            unreachable!()
        };
        assert_eq!(QueryOptions::default().wrap(query.clone()), query);
    }

    #[test]
    fn test_all_keys() {
        let options = QueryOptions {
            comment: Some("audit".into()),
            hint: Some(json!("age_1")),
            max_scan: Some(100),
            snapshot: true,
            ..Default::default()
        };
        let wrapped = options.wrap(Document::new());
        let keys: Vec<_> = wrapped.keys().cloned().collect();
        assert_eq!(keys, vec!["$query", "$comment", "$hint", "$maxScan", "$snapshot"]);
    }
}
