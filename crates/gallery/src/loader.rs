//! Background image preloading.
//!
//! The preloader mirrors the page-load phase of the gallery: every item's
//! image is decoded off the render thread and handed back over a channel, and
//! a final `Complete` event is the signal that flips the hover effect's
//! "loaded" gate. A file that fails to decode is reported and skipped; the
//! batch always runs to completion so one broken asset never blocks the rest.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::{GalleryError, TextureData};

/// One image to decode, tagged with the item it belongs to.
#[derive(Debug, Clone)]
pub struct PreloadRequest {
    pub index: usize,
    pub path: PathBuf,
}

/// Delivery from the preloader thread, drained by the shell between frames.
pub enum PreloadEvent {
    Loaded {
        index: usize,
        texture: Arc<TextureData>,
    },
    Failed {
        index: usize,
        error: GalleryError,
    },
    /// Sent exactly once, after every request has been attempted.
    Complete,
}

/// Decodes `requests` on a worker thread, delivering events in request order.
///
/// The channel is sized to hold the whole batch, so the worker never blocks
/// on a slow consumer. Dropping the receiver stops the worker at the next
/// send.
pub fn spawn_preloader(requests: Vec<PreloadRequest>) -> Receiver<PreloadEvent> {
    let (sender, receiver) = crossbeam_channel::bounded(requests.len() + 1);

    std::thread::spawn(move || {
        for request in requests {
            let event = match TextureData::load(&request.path) {
                Ok(texture) => {
                    tracing::debug!(
                        item = request.index,
                        path = %request.path.display(),
                        "decoded gallery image"
                    );
                    PreloadEvent::Loaded {
                        index: request.index,
                        texture: Arc::new(texture),
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        item = request.index,
                        path = %request.path.display(),
                        %error,
                        "failed to decode gallery image; item stays textureless"
                    );
                    PreloadEvent::Failed {
                        index: request.index,
                        error,
                    }
                }
            };
            if sender.send(event).is_err() {
                return;
            }
        }
        let _ = sender.send(PreloadEvent::Complete);
    });

    receiver
}
