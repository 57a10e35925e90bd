use rdkafka::error::KafkaError;
use thiserror::Error;
use trip_common::statemap::FormatError;

/// Enumeration of errors raised while decoding one message.
/// All of these are contained to the message that caused them: the offending
/// message is logged and dropped, and the consumer moves on.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),
    #[error("envelope identifier is empty")]
    EmptyIdentifier,
    #[error("content for identifier {identifier} is not a JSON-encoded string")]
    ContentNotString { identifier: &'static str },
    #[error("malformed content for identifier {identifier}: {error}")]
    InvalidContent {
        identifier: &'static str,
        error: serde_json::Error,
    },
    #[error("invalid state data for identifier {identifier}: {error}")]
    InvalidStateData {
        identifier: &'static str,
        error: FormatError,
    },
}

/// Enumeration of errors for operations with a RecordSink.
/// Errors can originate from sqlx and are wrapped by us to provide additional context.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("connection failed with: {error}")]
    ConnectionError { error: sqlx::Error },
    #[error("{command} query failed with: {error}")]
    QueryError { command: String, error: sqlx::Error },
}

/// Either failure mode of processing one dispatched message.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors that terminate the consumer loop. Everything per-message is
/// covered by `DecodeError`/`SinkError` and never reaches this level.
#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("kafka error: {0}")]
    Kafka(#[from] KafkaError),
}
