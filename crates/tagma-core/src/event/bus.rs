// Copyright 2025 tagma contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use log;

/// Manages a generic, thread-safe event channel.
///
/// This EventBus is generic over the type `T` of event it transports. This ensures
/// that `tagma-core` remains decoupled from specific event types defined in
/// higher-level crates (such as the session's output events).
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new EventBus with an unbounded channel for a specific event type.
    ///
    /// ## Returns
    /// A new instance of the EventBus struct.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::info!("Generic EventBus initialized.");
        Self { sender, receiver }
    }

    /// Attempts to send an event, logging an error if the receiver is disconnected.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    pub fn publish(&self, event: T) {
        // The event itself cannot be formatted without a `Debug` trait bound,
        // which we omit to keep the bus as generic as possible.
        log::trace!("Publishing an event.");

        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    /// Use this to allow other parts of the system to send events.
    ///
    /// ## Returns
    /// A clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    /// Intended for the owner of the bus to process events.
    ///
    /// ## Returns
    /// A reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Drains every event currently queued on the bus without blocking.
    ///
    /// ## Returns
    /// The pending events in arrival order.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    /// A local, self-contained event enum for testing purposes.
    /// This mimics the session's output events without creating external dependencies.
    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Speak { utterance: String },
        TranscriptionChanged { text: String },
        StopSpeaking,
    }

    fn dummy_speak_event() -> TestEvent {
        TestEvent::Speak {
            utterance: "thorax".to_string(),
        }
    }

    #[test]
    fn event_bus_creation() {
        let bus = EventBus::<TestEvent>::new();
        let _sender = bus.sender();
        assert!(bus.receiver().is_empty());
    }

    #[test]
    fn send_receive_single_event() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();
        let receiver = bus.receiver();
        let event_to_send = dummy_speak_event();

        sender
            .send(event_to_send.clone())
            .expect("Send should succeed");

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(received_event) => assert_eq!(received_event, event_to_send),
            Err(e) => panic!("Failed to receive event: {e:?}"),
        }
    }

    #[test]
    fn drain_returns_events_in_order() {
        let bus = EventBus::<TestEvent>::new();
        bus.publish(TestEvent::TranscriptionChanged {
            text: "name".to_string(),
        });
        bus.publish(dummy_speak_event());
        bus.publish(TestEvent::StopSpeaking);

        let drained = bus.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[2], TestEvent::StopSpeaking);
        assert!(bus.receiver().is_empty());

        // A second drain on an empty bus yields nothing.
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn send_from_worker_thread() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            sender.send(dummy_speak_event()).expect("Send should succeed");
        });
        handle.join().expect("Worker thread panicked");

        let received = bus
            .receiver()
            .recv_timeout(Duration::from_millis(100))
            .expect("Event should arrive from the worker thread");
        assert_eq!(received, dummy_speak_event());
    }
}
