//! Batched embedding client for a model-serving HTTP endpoint.
//!
//! The server is opaque: it accepts a JSON array of strings at
//! `POST {base_url}/predictions/{model}` and returns one vector per input,
//! either as a bare float array or as `{"embedding": [...]}`. Vectors are
//! padded with zeros or truncated to the configured dimension here, so the
//! store only ever sees fixed-dimension input.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SEC: u64 = 120;

/// Blocking client for one embedding endpoint.
pub struct EmbedClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    dim: usize,
}

impl EmbedClient {
    /// Build a client for `{base_url}/predictions/{model}` producing
    /// `dim`-dimension vectors.
    pub fn new(base_url: &str, model: &str, dim: usize, timeout: Duration) -> PipelineResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(EmbedClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dim,
        })
    }

    /// Vector dimension this client produces.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Model identifier (recorded as manifest provenance).
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed one batch of texts. Returns exactly `texts.len()` vectors of
    /// exactly `self.dim` floats.
    pub fn embed_batch(&self, texts: &[String]) -> PipelineResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = format!("{}/predictions/{}", self.base_url, self.model);
        let response = self
            .http
            .post(&endpoint)
            .json(texts)
            .send()?
            .error_for_status()?;
        let body: Value = response.json()?;

        let rows = body.as_array().ok_or_else(|| PipelineError::EmbedResponse {
            reason: "expected a JSON array of embeddings".to_string(),
        })?;
        if rows.len() != texts.len() {
            return Err(PipelineError::BatchShape {
                expected: texts.len(),
                got: rows.len(),
            });
        }

        debug!(batch = texts.len(), endpoint = %endpoint, "embedded batch");
        rows.iter().map(|row| self.decode_row(row)).collect()
    }

    /// Accept either `[f, f, ...]` or `{"embedding": [f, f, ...]}`, then
    /// pad or truncate to `self.dim`.
    fn decode_row(&self, row: &Value) -> PipelineResult<Vec<f32>> {
        let values = match row {
            Value::Array(values) => values,
            Value::Object(obj) => obj
                .get("embedding")
                .and_then(Value::as_array)
                .ok_or_else(|| PipelineError::EmbedResponse {
                    reason: "object row without an \"embedding\" array".to_string(),
                })?,
            other => {
                return Err(PipelineError::EmbedResponse {
                    reason: format!("unexpected embedding row: {other}"),
                })
            }
        };

        let mut vector = Vec::with_capacity(self.dim);
        for value in values {
            let f = value.as_f64().ok_or_else(|| PipelineError::EmbedResponse {
                reason: format!("non-numeric embedding component: {value}"),
            })?;
            vector.push(f as f32);
        }
        vector.resize(self.dim, 0.0);
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(dim: usize) -> EmbedClient {
        EmbedClient::new("http://localhost:8091/", "bge_m3", dim, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let c = client(4);
        assert_eq!(c.base_url, "http://localhost:8091");
    }

    #[test]
    fn test_decode_bare_array() {
        let c = client(3);
        let row = serde_json::json!([0.1, 0.2, 0.3]);
        let v = c.decode_row(&row).unwrap();
        assert_eq!(v.len(), 3);
        assert!((v[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_decode_embedding_object() {
        let c = client(2);
        let row = serde_json::json!({"embedding": [1.0, -1.0]});
        assert_eq!(c.decode_row(&row).unwrap(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_decode_pads_short_vector() {
        let c = client(4);
        let row = serde_json::json!([1.0, 2.0]);
        assert_eq!(c.decode_row(&row).unwrap(), vec![1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decode_truncates_long_vector() {
        let c = client(2);
        let row = serde_json::json!([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(c.decode_row(&row).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_decode_rejects_non_numeric() {
        let c = client(2);
        let row = serde_json::json!([1.0, "x"]);
        assert!(matches!(
            c.decode_row(&row),
            Err(PipelineError::EmbedResponse { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_scalar_row() {
        let c = client(2);
        let row = serde_json::json!(42);
        assert!(matches!(
            c.decode_row(&row),
            Err(PipelineError::EmbedResponse { .. })
        ));
    }
}
