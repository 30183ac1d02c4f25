//! Lossless genotype serialization.
//!
//! Explicit `encode_*`/`decode_*` functions per entity (no conversion
//! traits), targeting the checkpoint schema:
//!
//! ```json
//! {
//!   "nodes": [ { "function": "Add", "connections": [0, 1] }, ... ],
//!   "outputs": [ { "connection": 3 }, ... ]
//! }
//! ```
//!
//! `decode(encode(g)) == g` under structural equality. Decoding validates
//! record shape only: it does NOT re-check levels-back legality of stored
//! connections, so loading a genotype under a config with different
//! `rows`/`columns`/`levels_back` is a caller error the codec cannot
//! detect. Callers must pass the config the genotype was saved under.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::CgpConfig;
use crate::function::{Function, MAX_ARITY};
use crate::gene::{FunctionGene, IndexType, OutputGene};
use crate::genotype::Genotype;

/// Error raised by a malformed serialized record.
///
/// Reported per record; decoding never corrupts already-loaded state, and
/// the caller decides whether to abort or skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The record is not the expected JSON shape.
    #[error("malformed record: expected {0}")]
    InvalidRecord(&'static str),
    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The function id is not part of the catalogue.
    #[error("unknown function id `{0}`")]
    UnknownFunction(String),
    /// The connections array has the wrong length.
    #[error("expected {expected} connections, found {found}")]
    ConnectionArity {
        /// Required connection count.
        expected: usize,
        /// Count present in the record.
        found: usize,
    },
    /// A connection index is not a representable non-negative integer.
    #[error("connection index {0} is not a non-negative integer within index range")]
    InvalidIndex(String),
}

/// Encode a function gene.
#[must_use]
pub fn encode_function_gene(gene: &FunctionGene) -> Value {
    json!({
        "function": gene.function,
        "connections": gene.connections,
    })
}

/// Decode a function gene.
///
/// # Errors
///
/// Fails on a non-object record, missing `function`/`connections`, an
/// unknown function id, a connection count other than [`MAX_ARITY`], or a
/// connection that is not a representable non-negative integer.
pub fn decode_function_gene(value: &Value) -> Result<FunctionGene, DecodeError> {
    let record = value
        .as_object()
        .ok_or(DecodeError::InvalidRecord("function gene object"))?;

    let function_id = record
        .get("function")
        .ok_or(DecodeError::MissingField("function"))?;
    let function: Function = serde_json::from_value(function_id.clone())
        .map_err(|_| DecodeError::UnknownFunction(function_id.to_string()))?;

    let connections = record
        .get("connections")
        .ok_or(DecodeError::MissingField("connections"))?
        .as_array()
        .ok_or(DecodeError::InvalidRecord("connections array"))?;
    if connections.len() != MAX_ARITY {
        return Err(DecodeError::ConnectionArity {
            expected: MAX_ARITY,
            found: connections.len(),
        });
    }

    let mut decoded = [0 as IndexType; MAX_ARITY];
    for (slot, value) in decoded.iter_mut().zip(connections) {
        *slot = decode_index(value)?;
    }

    Ok(FunctionGene {
        function,
        connections: decoded,
    })
}

/// Encode an output gene.
#[must_use]
pub fn encode_output_gene(gene: &OutputGene) -> Value {
    json!({ "connection": gene.connection })
}

/// Decode an output gene.
///
/// # Errors
///
/// Fails on a non-object record, a missing `connection`, or a connection
/// that is not a representable non-negative integer.
pub fn decode_output_gene(value: &Value) -> Result<OutputGene, DecodeError> {
    let record = value
        .as_object()
        .ok_or(DecodeError::InvalidRecord("output gene object"))?;
    let connection = record
        .get("connection")
        .ok_or(DecodeError::MissingField("connection"))?;
    Ok(OutputGene {
        connection: decode_index(connection)?,
    })
}

/// Encode a full genotype into the checkpoint schema.
#[must_use]
pub fn encode_genotype(genotype: &Genotype) -> Value {
    json!({
        "nodes": genotype
            .nodes()
            .iter()
            .map(encode_function_gene)
            .collect::<Vec<_>>(),
        "outputs": genotype
            .outputs()
            .iter()
            .map(encode_output_gene)
            .collect::<Vec<_>>(),
    })
}

/// Decode a full genotype, binding it to `config`.
///
/// The config must be the one the genotype was saved under; the codec
/// attaches it without cross-checking stored connections against it.
///
/// # Errors
///
/// Fails on a malformed record or on any gene that fails to decode; the
/// first failing gene aborts the decode.
pub fn decode_genotype(value: &Value, config: Arc<CgpConfig>) -> Result<Genotype, DecodeError> {
    let record = value
        .as_object()
        .ok_or(DecodeError::InvalidRecord("genotype object"))?;

    let nodes = record
        .get("nodes")
        .ok_or(DecodeError::MissingField("nodes"))?
        .as_array()
        .ok_or(DecodeError::InvalidRecord("nodes array"))?
        .iter()
        .map(decode_function_gene)
        .collect::<Result<Vec<_>, _>>()?;

    let outputs = record
        .get("outputs")
        .ok_or(DecodeError::MissingField("outputs"))?
        .as_array()
        .ok_or(DecodeError::InvalidRecord("outputs array"))?
        .iter()
        .map(decode_output_gene)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Genotype::from_parts(config, nodes, outputs))
}

fn decode_index(value: &Value) -> Result<IndexType, DecodeError> {
    value
        .as_u64()
        .and_then(|index| IndexType::try_from(index).ok())
        .ok_or_else(|| DecodeError::InvalidIndex(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_config() -> Arc<CgpConfig> {
        Arc::new(CgpConfig {
            rows: 3,
            columns: 6,
            levels_back: 2,
            num_inputs: 2,
            num_outputs: 2,
            ..CgpConfig::default()
        })
    }

    #[test]
    fn test_function_gene_round_trip() {
        let gene = FunctionGene {
            function: Function::Multiply,
            connections: [0, 1],
        };
        let encoded = encode_function_gene(&gene);
        let decoded = decode_function_gene(&encoded).unwrap();
        assert_eq!(decoded, gene);
    }

    #[test]
    fn test_output_gene_round_trip() {
        let gene = OutputGene { connection: 5 };
        let encoded = encode_output_gene(&gene);
        let decoded = decode_output_gene(&encoded).unwrap();
        assert_eq!(decoded, gene);
    }

    #[test]
    fn test_genotype_round_trip() {
        let config = test_config();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut genotype = Genotype::primordial_seed(config.clone(), &mut rng).unwrap();
        for _ in 0..50 {
            genotype.mutate(1.0, 1.0, &mut rng);
        }

        let encoded = encode_genotype(&genotype);
        let decoded = decode_genotype(&encoded, config).unwrap();
        assert_eq!(decoded, genotype);
    }

    #[test]
    fn test_missing_field() {
        let record = json!({ "connections": [0, 1] });
        assert_eq!(
            decode_function_gene(&record),
            Err(DecodeError::MissingField("function"))
        );

        let record = json!({ "function": "Add" });
        assert_eq!(
            decode_function_gene(&record),
            Err(DecodeError::MissingField("connections"))
        );

        let record = json!({});
        assert_eq!(
            decode_output_gene(&record),
            Err(DecodeError::MissingField("connection"))
        );
    }

    #[test]
    fn test_unknown_function() {
        let record = json!({ "function": "Frobnicate", "connections": [0, 1] });
        assert!(matches!(
            decode_function_gene(&record),
            Err(DecodeError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_wrong_connection_arity() {
        let record = json!({ "function": "Add", "connections": [0] });
        assert_eq!(
            decode_function_gene(&record),
            Err(DecodeError::ConnectionArity {
                expected: MAX_ARITY,
                found: 1
            })
        );
    }

    #[test]
    fn test_invalid_index() {
        for bad in [json!(-3), json!(1.5), json!("7"), json!(100_000)] {
            let record = json!({ "function": "Add", "connections": [bad, 1] });
            assert!(
                matches!(
                    decode_function_gene(&record),
                    Err(DecodeError::InvalidIndex(_))
                ),
                "expected InvalidIndex for {record}"
            );
        }
    }

    #[test]
    fn test_malformed_genotype_record() {
        let config = test_config();
        assert!(matches!(
            decode_genotype(&json!([]), config.clone()),
            Err(DecodeError::InvalidRecord(_))
        ));
        assert_eq!(
            decode_genotype(&json!({ "nodes": [] }), config),
            Err(DecodeError::MissingField("outputs"))
        );
    }
}
