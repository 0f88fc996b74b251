use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::cursor::Cursor;
use crate::clock::LocalClock;
use crate::config::Configuration;
use crate::error::{AppError, AppResult};
use crate::events::{Event, EventSink, SendReport};
use crate::models::Notification;
use crate::transport::Transport;

/// Why [`Dispatcher::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchExit {
    /// The message list was empty; nothing was sent
    NoMessages,
    /// The shutdown token fired
    Cancelled,
}

/// Owns the send loop.
///
/// Sends are strictly sequential: one attempt per (message, credential,
/// destination), no retry, then a pause once every destination has been
/// tried with the current credential.
pub struct Dispatcher {
    config: Arc<Configuration>,
    transport: Arc<dyn Transport>,
    clock: LocalClock,
    sink: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<Configuration>,
        transport: Arc<dyn Transport>,
        clock: LocalClock,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            transport,
            clock,
            sink,
        }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Both the in-flight send and the pacing pause are abandoned as soon as
    /// the token fires.
    pub async fn run(&self, shutdown: CancellationToken) -> AppResult<DispatchExit> {
        let config = &self.config;

        if config.messages.is_empty() {
            self.sink.record(&Event::NoMessages);
            return Ok(DispatchExit::NoMessages);
        }

        let mut cursor = Cursor::new(
            config.messages.len(),
            config.credentials.len(),
            config.destinations.len(),
        )
        .ok_or_else(|| {
            AppError::configuration("dispatch", "credentials and destinations must not be empty")
        })?;

        tracing::debug!(transport = self.transport.name(), "Using transport");
        self.sink.record(&Event::DispatchStarted {
            messages: config.messages.len(),
            credentials: config.credentials.len(),
            destinations: config.destinations.len(),
        });

        loop {
            let position = cursor.position();
            let credential = &config.credentials[position.credential];
            let destination = &config.destinations[position.destination];
            let notification = Notification::compose(
                &config.display_name,
                &config.messages[position.message],
                credential,
                destination,
            );

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Ok(self.cancelled()),
                outcome = self.transport.send(&notification) => outcome,
            };

            self.sink.record(&Event::SendFinished(SendReport {
                credential_hint: credential.hint(),
                destination: destination.to_string(),
                text: notification.text,
                outcome,
                at: self.clock.stamp_now(),
            }));

            let step = cursor.advance();

            if step.cycle_finished {
                self.sink.record(&Event::CycleCompleted {
                    cycle: cursor.cycles(),
                });
            }

            if step.sweep_finished {
                self.sink.record(&Event::PacingPause {
                    credential_hint: credential.hint(),
                    delay: config.delay,
                });

                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => return Ok(self.cancelled()),
                    _ = tokio::time::sleep(config.delay) => {}
                }
            }
        }
    }

    fn cancelled(&self) -> DispatchExit {
        self.sink.record(&Event::DispatchCancelled);
        DispatchExit::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SendOutcome;
    use crate::events::MemorySink;
    use crate::models::{Credential, Destination};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Sent {
        credential: String,
        destination: String,
        text: String,
        at: Instant,
    }

    /// Records every send, answers 403 for listed destinations and cancels
    /// the token once `stop_after` sends have been made.
    struct ScriptedTransport {
        sent: Mutex<Vec<Sent>>,
        forbidden: Vec<&'static str>,
        stop_after: usize,
        shutdown: CancellationToken,
    }

    impl ScriptedTransport {
        fn new(stop_after: usize, shutdown: CancellationToken) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                forbidden: Vec::new(),
                stop_after,
                shutdown,
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, notification: &Notification<'_>) -> SendOutcome {
            let mut sent = self.sent.lock().unwrap();
            sent.push(Sent {
                credential: notification.credential.expose().to_string(),
                destination: notification.destination.to_string(),
                text: notification.text.clone(),
                at: Instant::now(),
            });
            if sent.len() >= self.stop_after {
                self.shutdown.cancel();
            }

            if self.forbidden.contains(&notification.destination.as_str()) {
                SendOutcome::Rejected { status: 403 }
            } else {
                SendOutcome::Accepted
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Never completes
    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn send(&self, _notification: &Notification<'_>) -> SendOutcome {
            std::future::pending().await
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    fn configuration(
        messages: &[&str],
        credentials: &[&str],
        destinations: &[&str],
        delay: Duration,
    ) -> Arc<Configuration> {
        Arc::new(Configuration {
            messages: messages.iter().map(|m| m.to_string()).collect(),
            credentials: credentials
                .iter()
                .filter_map(|c| Credential::new(c))
                .collect(),
            destinations: destinations
                .iter()
                .filter_map(|d| Destination::new(d))
                .collect(),
            display_name: "X".to_string(),
            health_response: "OK".to_string(),
            delay,
            port: 8080,
        })
    }

    fn dispatcher(
        config: Arc<Configuration>,
        transport: Arc<dyn Transport>,
        sink: Arc<MemorySink>,
    ) -> Dispatcher {
        Dispatcher::new(config, transport, LocalClock::default(), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_credential_two_destinations_repeat() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(6, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["tok1"], &["d1", "d2"], Duration::ZERO);

        let exit = dispatcher(config, transport.clone(), sink.clone())
            .run(shutdown)
            .await
            .unwrap();

        assert_eq!(exit, DispatchExit::Cancelled);
        let sent = transport.sent();
        assert_eq!(sent.len(), 6);
        for (i, send) in sent.iter().enumerate() {
            assert_eq!(send.credential, "tok1");
            assert_eq!(send.text, "X hello");
            assert_eq!(send.destination, if i % 2 == 0 { "d1" } else { "d2" });
        }
        assert_eq!(sink.events().last(), Some(&Event::DispatchCancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_message_credential_destination() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(8, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["m1", "m2"], &["tokA", "tokB"], &["d1", "d2"], Duration::ZERO);

        dispatcher(config, transport.clone(), sink)
            .run(shutdown)
            .await
            .unwrap();

        let order: Vec<(String, String, String)> = transport
            .sent()
            .into_iter()
            .map(|s| (s.text, s.credential, s.destination))
            .collect();
        let expected: Vec<(String, String, String)> = [
            ("X m1", "tokA", "d1"),
            ("X m1", "tokA", "d2"),
            ("X m1", "tokB", "d1"),
            ("X m1", "tokB", "d2"),
            ("X m2", "tokA", "d1"),
            ("X m2", "tokA", "d2"),
            ("X m2", "tokB", "d1"),
            ("X m2", "tokB", "d2"),
        ]
        .into_iter()
        .map(|(t, c, d)| (t.to_string(), c.to_string(), d.to_string()))
        .collect();
        assert_eq!(order, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_applies_per_credential_only() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(6, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let delay = Duration::from_secs(5);
        let config = configuration(&["hello"], &["tokA", "tokB"], &["d1", "d2"], delay);

        dispatcher(config, transport.clone(), sink)
            .run(shutdown)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 6);
        // Same credential: back to back
        assert_eq!(sent[1].at - sent[0].at, Duration::ZERO);
        assert_eq!(sent[3].at - sent[2].at, Duration::ZERO);
        // Credential switch, then the wrap into the next cycle
        assert!(sent[2].at - sent[1].at >= delay);
        assert!(sent[4].at - sent[3].at >= delay);
        assert_eq!(sent[4].credential, "tokA");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_before_next_message_with_one_credential() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(4, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let delay = Duration::from_secs(5);
        let config = configuration(&["a", "b"], &["tok1"], &["d1", "d2"], delay);

        dispatcher(config, transport.clone(), sink)
            .run(shutdown)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1].at - sent[0].at, Duration::ZERO);
        assert_eq!(sent[1].text, "X a");
        assert_eq!(sent[2].text, "X b");
        assert!(sent[2].at - sent[1].at >= delay);
        assert_eq!(sent[3].at - sent[2].at, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_does_not_halt_loop() {
        let shutdown = CancellationToken::new();
        let mut scripted = ScriptedTransport::new(3, shutdown.clone());
        scripted.forbidden = vec!["d1"];
        let transport = Arc::new(scripted);
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["tok1"], &["d1", "d2"], Duration::from_secs(5));

        dispatcher(config, transport.clone(), sink.clone())
            .run(shutdown)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[1].destination, "d2");
        assert_eq!(sent[1].at, sent[0].at);

        let outcomes: Vec<SendOutcome> = sink.reports().into_iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                SendOutcome::Rejected { status: 403 },
                SendOutcome::Accepted,
                SendOutcome::Rejected { status: 403 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_hide_credential() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(1, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["EAAGsecretsecret"], &["d1"], Duration::ZERO);

        dispatcher(config, transport, sink.clone())
            .run(shutdown)
            .await
            .unwrap();

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].credential_hint, "EAAGse...");
        assert_eq!(reports[0].destination, "d1");
        assert_eq!(reports[0].text, "X hello");
        assert!(!reports[0].at.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_events() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(4, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["a", "b"], &["tok1"], &["d1"], Duration::ZERO);

        dispatcher(config, transport, sink.clone())
            .run(shutdown)
            .await
            .unwrap();

        let cycles: Vec<u64> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::CycleCompleted { cycle } => Some(cycle),
                _ => None,
            })
            .collect();
        assert_eq!(cycles, vec![1, 2]);
        assert!(matches!(
            sink.events().first(),
            Some(Event::DispatchStarted {
                messages: 2,
                credentials: 1,
                destinations: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_messages_sends_nothing() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(1, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&[], &["tok1"], &["d1"], Duration::ZERO);

        let exit = dispatcher(config, transport.clone(), sink.clone())
            .run(shutdown)
            .await
            .unwrap();

        assert_eq!(exit, DispatchExit::NoMessages);
        assert!(transport.sent().is_empty());
        assert_eq!(sink.events(), vec![Event::NoMessages]);
    }

    #[tokio::test]
    async fn test_empty_destinations_is_configuration_error() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(1, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["tok1"], &[], Duration::ZERO);

        let err = dispatcher(config, transport, sink)
            .run(shutdown)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_abandons_in_flight_send() {
        let shutdown = CancellationToken::new();
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["tok1"], &["d1"], Duration::ZERO);
        let dispatcher = dispatcher(config, Arc::new(HangingTransport), sink.clone());

        let canceller = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                shutdown.cancel();
            })
        };

        let exit = dispatcher.run(shutdown).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(exit, DispatchExit::Cancelled);
        assert!(sink.reports().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_abandons_pause() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new(usize::MAX, shutdown.clone()));
        let sink = Arc::new(MemorySink::new());
        let config = configuration(&["hello"], &["tok1"], &["d1"], Duration::from_secs(3600));
        let dispatcher = dispatcher(config, transport.clone(), sink);

        let started = Instant::now();
        let canceller = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                shutdown.cancel();
            })
        };

        let exit = dispatcher.run(shutdown).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(exit, DispatchExit::Cancelled);
        assert_eq!(transport.sent().len(), 1);
        assert!(started.elapsed() < Duration::from_secs(3600));
    }
}
