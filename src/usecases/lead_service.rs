//! Submit flow shared by every form: validate -> build payload -> deliver.
//!
//! - Validation failures never reach the notifier and leave the state untouched
//! - `Idle -> InFlight -> Delivered | Failed`; a submit while `InFlight` is refused
//! - Exactly one notifier call per accepted submit; failures are not retried
//! - A submit dropped mid-request ends in `Failed`, so the form can be resent

use crate::domain::{DeliveryError, DomainError, LeadForm, SubmitState};
use crate::ports::LeadNotifier;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Lead submission service. Owns the submit state of one form, so every form
/// surface gets its own instance.
pub struct LeadService {
    notifier: Arc<dyn LeadNotifier>,
    state: Mutex<SubmitState>,
}

impl LeadService {
    pub fn new(notifier: Arc<dyn LeadNotifier>) -> Self {
        Self {
            notifier,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Current lifecycle state. The UI disables its submit control while `InFlight`.
    pub fn state(&self) -> SubmitState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmitState> {
        // state is a plain enum, a poisoned lock still holds a usable value
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and deliver `form`.
    ///
    /// # Errors
    /// - `DomainError::Form` if validation fails (nothing is sent)
    /// - `DomainError::SubmitInFlight` if another submit has not finished
    /// - `DomainError::Delivery` if the notifier fails
    pub async fn submit<F>(&self, form: &F) -> Result<(), DomainError>
    where
        F: LeadForm + ?Sized,
    {
        form.validate()?;
        self.lock_state().begin()?;
        let in_flight = InFlight {
            service: self,
            settled: false,
        };

        let payload = form.to_payload();
        info!(
            kind = form.kind(),
            attachments = payload.attachments.len(),
            "submitting lead"
        );
        let outcome = self.notifier.send(&payload).await;
        in_flight.settle(&outcome);

        if let Err(e) = &outcome {
            warn!(kind = form.kind(), error = %e, "lead submission failed");
        }
        outcome.map_err(DomainError::from)
    }
}

/// Held while the notifier call is outstanding. Dropping it without
/// `settle` marks the submit as abandoned.
struct InFlight<'a> {
    service: &'a LeadService,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, outcome: &Result<(), DeliveryError>) {
        self.service.lock_state().finish(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("lead submission dropped before the notifier returned");
            self.service.lock_state().abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Attachment, DeliveryError, FormError, LeadPayload, PhoneEntry, QuizAnswer, QuizRequest,
        ServiceRequest,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Records payloads; optionally fails or waits for a release signal.
    #[derive(Default)]
    struct RecordingNotifier {
        calls: AtomicUsize,
        sent: std::sync::Mutex<Vec<LeadPayload>>,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait::async_trait]
    impl LeadNotifier for RecordingNotifier {
        async fn send(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.sent.lock().unwrap().push(payload.clone());
            if self.fail {
                Err(DeliveryError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn service_request() -> ServiceRequest {
        ServiceRequest {
            name: "Иван".into(),
            phone: PhoneEntry::from_input("+375291234567"),
            service: "Покраска бампера".into(),
        }
    }

    #[tokio::test]
    async fn test_submit_delivers_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = LeadService::new(notifier.clone());

        service.submit(&service_request()).await.unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.state(), SubmitState::Delivered);
        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].message.contains("🔧 Услуга: Покраска бампера"));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = LeadService::new(notifier.clone());
        let mut form = service_request();
        form.phone = PhoneEntry::from_input("37529");

        let err = service.submit(&form).await.unwrap_err();

        assert!(matches!(err, DomainError::Form(FormError::InvalidPhone)));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn test_failure_is_reported_without_retry() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = LeadService::new(notifier.clone());

        let err = service.submit(&service_request()).await.unwrap_err();

        assert!(matches!(err, DomainError::Delivery(DeliveryError::Transport(_))));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(service.state(), SubmitState::Failed(_)));

        // the user may press submit again
        let _ = service.submit(&service_request()).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_submit_refused_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let notifier = Arc::new(RecordingNotifier {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let service = Arc::new(LeadService::new(notifier.clone()));

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.submit(&service_request()).await })
        };
        while notifier.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.state(), SubmitState::InFlight);

        let second = service.submit(&service_request()).await;
        assert!(matches!(second, Err(DomainError::SubmitInFlight)));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.state(), SubmitState::Delivered);
    }

    #[tokio::test]
    async fn test_cancelled_submit_does_not_lock_the_form() {
        let gate = Arc::new(Notify::new());
        let notifier = Arc::new(RecordingNotifier {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let service = LeadService::new(notifier.clone());

        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), service.submit(&service_request()))
                .await;
        assert!(cancelled.is_err());
        assert_eq!(
            service.state(),
            SubmitState::Failed(crate::domain::entities::ABANDONED.into())
        );

        // the form can be submitted again; this time the notifier answers
        gate.notify_one();
        service.submit(&service_request()).await.unwrap();
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.state(), SubmitState::Delivered);
    }

    #[tokio::test]
    async fn test_quiz_with_photos_passes_attachments() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = LeadService::new(notifier.clone());
        let mut form = QuizRequest {
            name: "Иван".into(),
            phone: PhoneEntry::from_input("+375291234567"),
            answers: vec![QuizAnswer {
                step: "Что случилось с автомобилем?".into(),
                choices: vec!["ДТП".into()],
            }],
            consent: true,
            ..Default::default()
        };
        for i in 0..3 {
            form.add_photo(Attachment::new(format!("{i}.jpg"), "image/jpeg", vec![i]));
        }

        service.submit(&form).await.unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].attachments.len(), 3);
    }
}
