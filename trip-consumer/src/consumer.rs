use metrics::counter;
use tracing::{error, info};

use crate::content::Envelope;
use crate::dispatch::DecoderRegistry;
use crate::error::ConsumerError;
use crate::kafka::{RecvError, Subscription};
use crate::sink::RecordSink;

/// Sequential consumer: receives messages from one subscription and
/// processes them one at a time, no fan-out. Decode and sink failures are
/// contained to the message that caused them; only broker errors end the
/// loop.
pub struct TripConsumer {
    subscription: Subscription,
    registry: DecoderRegistry,
    sink: Box<dyn RecordSink>,
}

impl TripConsumer {
    pub fn new(
        subscription: Subscription,
        registry: DecoderRegistry,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            subscription,
            registry,
            sink,
        }
    }

    /// Run this consumer to continuously process messages as they arrive.
    pub async fn run(&self) -> Result<(), ConsumerError> {
        info!("waiting for messages");

        loop {
            let payload = match self.subscription.recv().await {
                Ok(payload) => payload,
                Err(RecvError::Kafka(error)) => return Err(error.into()),
                Err(RecvError::Empty) => {
                    error!("message payload is empty");
                    counter!("trip_messages_dropped_total").increment(1);
                    continue;
                }
            };

            counter!("trip_messages_received_total").increment(1);
            self.process_message(&payload).await;
        }
    }

    async fn process_message(&self, payload: &[u8]) {
        let envelope = match Envelope::from_bytes(payload) {
            Ok(envelope) => envelope,
            Err(error) => {
                error!("failed to decode message envelope: {}", error);
                counter!("trip_messages_dropped_total").increment(1);
                return;
            }
        };

        if let Err(error) = self.registry.dispatch(&envelope, self.sink.as_ref()).await {
            error!(id = %envelope.id, "failed to process message: {}", error);
            counter!("trip_messages_dropped_total").increment(1);
        }
    }
}
