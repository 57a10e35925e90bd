use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use trip_consumer::content::{Envelope, PlanRecord};
use trip_consumer::dispatch::default_registry;
use trip_consumer::error::SinkError;
use trip_consumer::sink::RecordSink;

#[derive(Clone, Default)]
struct MemorySink {
    records: Arc<Mutex<Vec<PlanRecord>>>,
}

impl MemorySink {
    fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn records(&self) -> Vec<PlanRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn create_plan(&self, record: PlanRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record);

        Ok(())
    }
}

async fn run_pipeline(sink: &MemorySink, message: &[u8]) -> anyhow::Result<()> {
    let registry = default_registry();
    let envelope = Envelope::from_bytes(message)?;
    registry.dispatch(&envelope, sink).await?;

    Ok(())
}

#[tokio::test]
async fn test_plan_message_produces_one_record() {
    let sink = MemorySink::default();
    let message =
        br#"{"id":"0DE0","content":"{\"planDate\":\"2024-01-01\",\"planList\":[1,2],\"state\":\"pending\"}"}"#;

    run_pipeline(&sink, message)
        .await
        .expect("pipeline rejected a well-formed message");

    assert_eq!(sink.len(), 1);
    let record = &sink.records()[0];
    assert_eq!(
        record.plan_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
    assert_eq!(record.plan_list, "1,2");
    assert_eq!(record.state, "pending");
}

#[tokio::test]
async fn test_inlined_state_block_is_canonicalized() {
    let sink = MemorySink::default();
    // Free-text status block with two trailer fields, inlined by the
    // producer inside the JSON-encoded content string.
    let message = br#"{"id":"0DE0","content":"{\"planDate\":\"2024-03-05\",\"planList\":[7,8,9],\"state\":{5:6,1:2,done:x,who:y},\"note\":\"ok\"}"}"#;

    run_pipeline(&sink, message)
        .await
        .expect("pipeline rejected a message with an inlined state block");

    assert_eq!(sink.len(), 1);
    let record = &sink.records()[0];
    assert_eq!(record.plan_list, "7,8,9");
    // Trailer fields dropped, remaining pairs re-encoded ascending.
    assert_eq!(record.state, "1:2,5:6");
}

#[tokio::test]
async fn test_inlined_state_and_can_blocks() {
    let sink = MemorySink::default();
    let message = br#"{"id":"0DE0","content":"{\"planDate\":\"2024-03-05\",\"planList\":[4],\"state\":{3:1,2:2,a:b,c:d},\"can\":{9:9,8:8,a:b,c:d},\"note\":\"ok\"}"}"#;

    run_pipeline(&sink, message)
        .await
        .expect("pipeline rejected a message with state and can blocks");

    assert_eq!(sink.len(), 1);
    let record = &sink.records()[0];
    assert_eq!(record.plan_list, "4");
    assert_eq!(record.state, "2:2,3:1");
}

#[tokio::test]
async fn test_unknown_identifier_is_dropped_without_sink_calls() {
    let sink = MemorySink::default();
    let message = br#"{"id":"FFFF","content":"{}"}"#;

    run_pipeline(&sink, message)
        .await
        .expect("unknown identifiers must not be an error");

    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn test_malformed_content_produces_no_record() {
    let sink = MemorySink::default();
    let message = br#"{"id":"0DE0","content":"not json at all"}"#;

    let result = run_pipeline(&sink, message).await;

    assert!(result.is_err());
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn test_non_string_content_produces_no_record() {
    let sink = MemorySink::default();
    let message = br#"{"id":"0DE0","content":{"planDate":"2024-01-01"}}"#;

    let result = run_pipeline(&sink, message).await;

    assert!(result.is_err());
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn test_missing_content_produces_no_record() {
    let sink = MemorySink::default();
    let message = br#"{"id":"0DE0"}"#;

    let result = run_pipeline(&sink, message).await;

    assert!(result.is_err());
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn test_bad_state_data_aborts_the_message() {
    let sink = MemorySink::default();
    // Three pairs survive trailer trimming but the first one is not numeric.
    let message = br#"{"id":"0DE0","content":"{\"planDate\":\"2024-03-05\",\"planList\":[1],\"state\":{x:y,1:2,a:b,c:d},\"note\":\"ok\"}"}"#;

    let result = run_pipeline(&sink, message).await;

    assert!(result.is_err());
    assert_eq!(sink.len(), 0);
}
