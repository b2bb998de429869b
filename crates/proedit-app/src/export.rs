//! Audio export.

use std::sync::Arc;

use proedit_audio::{render_offline_audio, AudioBuffer, AudioDecode, ByteFetcher};
use proedit_core::Result;
use tracing::info;

use crate::session::EditorSession;

/// Render the session's full audio mix using the session's mix config.
pub async fn export_audio<F, D>(
    session: &EditorSession,
    fetcher: Arc<F>,
    decoder: Arc<D>,
) -> Result<AudioBuffer>
where
    F: ByteFetcher + Send + Sync + 'static,
    D: AudioDecode + Send + Sync + 'static,
{
    let duration = session.duration_secs();
    info!(duration, revision = session.revision(), "Exporting audio");
    render_offline_audio(
        session.timeline().tracks(),
        duration,
        fetcher,
        decoder,
        &session.config().mix,
    )
    .await
}
