use std::collections::HashMap;

use metrics::counter;
use tracing::info;

use crate::content::{ContentDecoder, Envelope, PlanDecoder};
use crate::error::ProcessError;
use crate::sink::RecordSink;

/// Registry mapping content identifiers to their decoders.
///
/// The identifier set is closed and statically known; supporting a new
/// content type means registering another decoder here, not touching the
/// dispatch path.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<&'static str, Box<dyn ContentDecoder>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn register(&mut self, decoder: Box<dyn ContentDecoder>) {
        self.decoders.insert(decoder.identifier(), decoder);
    }

    /// Select a decoder by exact identifier match and run it against the
    /// sink. An unregistered identifier is not an error: the message is
    /// logged and dropped.
    pub async fn dispatch(
        &self,
        envelope: &Envelope,
        sink: &dyn RecordSink,
    ) -> Result<(), ProcessError> {
        match self.decoders.get(envelope.id.as_str()) {
            Some(decoder) => decoder.decode(&envelope.content, sink).await,
            None => {
                info!(id = %envelope.id, "unknown message identifier, dropping");
                counter!("trip_messages_unknown_total").increment(1);
                Ok(())
            }
        }
    }
}

/// Registry with every production decoder registered.
pub fn default_registry() -> DecoderRegistry {
    let mut registry = DecoderRegistry::new();
    registry.register(Box::new(PlanDecoder));
    registry
}
