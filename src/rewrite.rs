//! Domain rewriting for upstream JSON bodies
//!
//! Upstream responses embed links on the upstream's own origin. Before a body is
//! handed to the client every string in it is rewritten so links point at this
//! edge instead. Keys, numbers, booleans and nulls are never touched.

use serde_json::{Map, Value};

/// Replaces one fixed origin with a per-request target origin inside JSON values
#[derive(Debug, Clone)]
pub struct DomainRewriter {
    upstream_origin: String,
}

impl DomainRewriter {
    pub fn new(upstream_origin: impl Into<String>) -> Self {
        Self {
            upstream_origin: upstream_origin.into(),
        }
    }

    pub fn upstream_origin(&self) -> &str {
        &self.upstream_origin
    }

    /// Rewrite every occurrence of the upstream origin in `value` to `target_origin`
    ///
    /// Arrays keep their length and order; objects keep their key set.
    pub fn rewrite(&self, value: Value, target_origin: &str) -> Value {
        match value {
            Value::String(s) => Value::String(self.rewrite_str(s, target_origin)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite(item, target_origin))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, self.rewrite(item, target_origin)))
                    .collect::<Map<String, Value>>(),
            ),
            scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => scalar,
        }
    }

    fn rewrite_str(&self, s: String, target_origin: &str) -> String {
        // An empty pattern would match between every character
        if self.upstream_origin.is_empty() || !s.contains(&self.upstream_origin) {
            return s;
        }
        s.replace(&self.upstream_origin, target_origin)
    }
}
