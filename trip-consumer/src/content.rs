use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use trip_common::{fragment, statemap};

use crate::error::{DecodeError, ProcessError};
use crate::sink::RecordSink;

/// Content identifier of edited-trip plan events.
pub const PLAN_IDENTIFIER: &str = "0DE0";

/// Outer wrapper of every wire message: an identifier selecting the decoder
/// and an opaque content payload whose shape depends on it.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub id: String,
    #[serde(default)]
    pub content: Value,
}

impl Envelope {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;

        if envelope.id.is_empty() {
            return Err(DecodeError::EmptyIdentifier);
        }

        Ok(envelope)
    }
}

/// One decoder per content identifier: turns the envelope's opaque content
/// into a typed record and hands it to the sink. At most one sink call per
/// message.
#[async_trait]
pub trait ContentDecoder: Send + Sync {
    fn identifier(&self) -> &'static str;

    async fn decode(&self, content: &Value, sink: &dyn RecordSink) -> Result<(), ProcessError>;
}

/// Storage-ready plan record. Append-only: built once per message, never
/// updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    pub plan_date: NaiveDate,
    pub plan_list: String,
    pub state: String,
}

/// Intermediate shape of the plan content after the second decode pass.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanContent {
    plan_date: NaiveDate,
    plan_list: Vec<i64>,
    #[serde(default)]
    state: String,
}

/// Decoder for `0DE0` edited-trip plan events.
///
/// The content field is a JSON-encoded string. Producers may inline the
/// status as a free-text `"state":{...}` block (and sometimes a `"can":{...}`
/// block) that is not valid JSON, so both are excised textually before the
/// serde pass. An inlined state goes through trailer trimming and the
/// state-map codec and is stored in canonical key-ascending form; otherwise
/// the plain `state` string field is stored as-is.
pub struct PlanDecoder;

#[async_trait]
impl ContentDecoder for PlanDecoder {
    fn identifier(&self) -> &'static str {
        PLAN_IDENTIFIER
    }

    async fn decode(&self, content: &Value, sink: &dyn RecordSink) -> Result<(), ProcessError> {
        let raw = content.as_str().ok_or(DecodeError::ContentNotString {
            identifier: PLAN_IDENTIFIER,
        })?;

        let (remainder, state_body) = fragment::extract_named(raw, "state");
        let (remainder, can_body) = fragment::extract_named(&remainder, "can");
        if !can_body.is_empty() {
            // No record consumes can items; they only have to be cut out so
            // the rest of the content parses.
            debug!(can = %can_body, "discarding can items");
        }

        let plan: PlanContent =
            serde_json::from_str(&remainder).map_err(|error| DecodeError::InvalidContent {
                identifier: PLAN_IDENTIFIER,
                error,
            })?;

        let state = if state_body.is_empty() {
            plan.state
        } else {
            let state_map = statemap::parse(&fragment::drop_trailer(&state_body)).map_err(
                |error| DecodeError::InvalidStateData {
                    identifier: PLAN_IDENTIFIER,
                    error,
                },
            )?;
            statemap::serialize(&state_map)
        };

        let record = PlanRecord {
            plan_date: plan.plan_date,
            plan_list: statemap::join_ints(&plan.plan_list),
            state,
        };

        sink.create_plan(record).await?;

        Ok(())
    }
}
