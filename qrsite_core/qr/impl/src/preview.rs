//! Live QR preview that follows the most recent input.
//!
//! Every [`QrPreview::update`] takes a new sequence number before encoding
//! starts. When the encoder finishes, the result is only applied if no newer
//! update has been issued in the meantime. Stale results are dropped, so a
//! slow encode of an earlier text can never overwrite the preview of a later
//! one.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use qrsite_core_qr_contracts::{QrEncodeError, QrFeatureService};
use qrsite_models::qr::{QrImage, QrWidth};
use tracing::{debug, error};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// Nothing to show.
    #[default]
    Idle,
    Encoding,
    Ready {
        text: String,
        image: QrImage,
    },
    /// Message to display instead of the image.
    Error(String),
}

#[derive(Debug)]
pub struct QrPreview<Qr> {
    qr: Qr,
    sequence: AtomicU64,
    state: Mutex<PreviewState>,
}

impl<Qr: QrFeatureService> QrPreview<Qr> {
    pub fn new(qr: Qr) -> Self {
        Self {
            qr,
            sequence: AtomicU64::new(0),
            state: Default::default(),
        }
    }

    pub fn state(&self) -> PreviewState {
        self.lock().clone()
    }

    /// Recomputes the preview for `text`.
    ///
    /// Returns `false` if the result was discarded because a newer update
    /// was issued while this one was encoding.
    pub async fn update(&self, text: String, width: QrWidth) -> bool {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().is_empty() {
            return self.apply(sequence, PreviewState::Idle);
        }

        self.apply(sequence, PreviewState::Encoding);

        let state = match self.qr.encode(text.clone(), width).await {
            Ok(Some(image)) => PreviewState::Ready { text, image },
            Ok(None) => PreviewState::Idle,
            Err(QrEncodeError::Other(err)) => {
                error!("Failed to generate QR preview: {err:#}");
                PreviewState::Error(QrEncodeError::Encode.to_string())
            }
            Err(err) => PreviewState::Error(err.to_string()),
        };

        self.apply(sequence, state)
    }

    fn apply(&self, sequence: u64, state: PreviewState) -> bool {
        let mut guard = self.lock();
        let latest = self.sequence.load(Ordering::SeqCst);
        if sequence != latest {
            debug!(sequence, latest, "discarding stale preview");
            return false;
        }
        *guard = state;
        true
    }

    fn lock(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qrsite_utils::assert_matches;
    use tokio::sync::{mpsc, oneshot};

    use super::*;

    type EncodeResult = Result<Option<QrImage>, QrEncodeError>;

    /// Encoder that completes each request only when the test says so.
    struct ManualQr(mpsc::UnboundedSender<(String, oneshot::Sender<EncodeResult>)>);

    impl QrFeatureService for ManualQr {
        async fn encode(&self, payload: String, _width: QrWidth) -> EncodeResult {
            let (tx, rx) = oneshot::channel();
            self.0.send((payload, tx)).unwrap();
            rx.await.unwrap()
        }
    }

    fn setup() -> (
        Arc<QrPreview<ManualQr>>,
        mpsc::UnboundedReceiver<(String, oneshot::Sender<EncodeResult>)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(QrPreview::new(ManualQr(tx))), rx)
    }

    fn image(byte: u8) -> QrImage {
        QrImage {
            png: vec![byte],
            width: 300,
        }
    }

    fn spawn_update(
        preview: &Arc<QrPreview<ManualQr>>,
        text: &str,
    ) -> tokio::task::JoinHandle<bool> {
        let preview = Arc::clone(preview);
        let text = text.to_owned();
        tokio::spawn(async move { preview.update(text, QrWidth::default()).await })
    }

    #[tokio::test]
    async fn earlier_request_completes_last() {
        // Arrange
        let (sut, mut requests) = setup();
        let first = spawn_update(&sut, "A");
        let (payload_a, reply_a) = requests.recv().await.unwrap();
        let second = spawn_update(&sut, "AB");
        let (payload_b, reply_b) = requests.recv().await.unwrap();
        assert_eq!((payload_a.as_str(), payload_b.as_str()), ("A", "AB"));
        assert_eq!(sut.state(), PreviewState::Encoding);

        // Act
        reply_b.send(Ok(Some(image(2)))).unwrap();
        let second = second.await.unwrap();
        reply_a.send(Ok(Some(image(1)))).unwrap();
        let first = first.await.unwrap();

        // Assert
        assert!(second);
        assert!(!first);
        assert_eq!(
            sut.state(),
            PreviewState::Ready {
                text: "AB".into(),
                image: image(2)
            }
        );
    }

    #[tokio::test]
    async fn earlier_request_completes_first() {
        // Arrange
        let (sut, mut requests) = setup();
        let first = spawn_update(&sut, "A");
        let (_, reply_a) = requests.recv().await.unwrap();
        let second = spawn_update(&sut, "AB");
        let (_, reply_b) = requests.recv().await.unwrap();

        // Act
        reply_a.send(Ok(Some(image(1)))).unwrap();
        let first = first.await.unwrap();
        let state_between = sut.state();
        reply_b.send(Ok(Some(image(2)))).unwrap();
        let second = second.await.unwrap();

        // Assert
        assert!(!first);
        assert!(second);
        assert_eq!(state_between, PreviewState::Encoding);
        assert_eq!(
            sut.state(),
            PreviewState::Ready {
                text: "AB".into(),
                image: image(2)
            }
        );
    }

    #[tokio::test]
    async fn cleared_while_encoding() {
        // Arrange
        let (sut, mut requests) = setup();
        let first = spawn_update(&sut, "A");
        let (_, reply_a) = requests.recv().await.unwrap();

        // Act
        let cleared = sut.update("  ".into(), QrWidth::default()).await;
        reply_a.send(Ok(Some(image(1)))).unwrap();
        let first = first.await.unwrap();

        // Assert
        assert!(cleared);
        assert!(!first);
        assert_eq!(sut.state(), PreviewState::Idle);
        assert_matches!(requests.try_recv(), Err(_));
    }

    #[tokio::test]
    async fn error() {
        // Arrange
        let (sut, mut requests) = setup();
        let update = spawn_update(&sut, "A");
        let (_, reply) = requests.recv().await.unwrap();

        // Act
        reply.send(Err(QrEncodeError::Encode)).unwrap();
        let applied = update.await.unwrap();

        // Assert
        assert!(applied);
        assert_eq!(
            sut.state(),
            PreviewState::Error("Failed to generate QR code. Please try again.".into())
        );
    }

    #[tokio::test]
    async fn unexpected_error() {
        // Arrange
        let (sut, mut requests) = setup();
        let update = spawn_update(&sut, "A");
        let (_, reply) = requests.recv().await.unwrap();

        // Act
        reply
            .send(Err(QrEncodeError::Other(anyhow::anyhow!("QR encoder task failed"))))
            .unwrap();
        let applied = update.await.unwrap();

        // Assert
        assert!(applied);
        assert_eq!(
            sut.state(),
            PreviewState::Error("Failed to generate QR code. Please try again.".into())
        );
    }
}
