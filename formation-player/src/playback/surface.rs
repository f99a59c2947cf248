use crate::error::{PlayerError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attachment {
    Detached,
    Attached,
    /// Torn down for good; waiters give up
    Closed,
}

/// The render target a player engine is mounted on.
///
/// The renderer flips the attachment signal when the surface enters or
/// leaves the visible tree; engine creation waits on it instead of polling.
/// Clones share the same signal.
#[derive(Clone)]
pub struct Surface {
    id: SurfaceId,
    state: Arc<watch::Sender<Attachment>>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl Surface {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Attachment::Detached);
        Self {
            id: SurfaceId::new(),
            state: Arc::new(tx),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn attach(&self) {
        self.state.send_replace(Attachment::Attached);
    }

    pub fn detach(&self) {
        self.state.send_replace(Attachment::Detached);
    }

    /// Remove the surface from the tree permanently. Pending
    /// [`wait_attached`](Self::wait_attached) calls fail.
    pub fn close(&self) {
        self.state.send_replace(Attachment::Closed);
    }

    pub fn is_attached(&self) -> bool {
        *self.state.borrow() == Attachment::Attached
    }

    /// Resolves once the surface is attached, or fails with
    /// [`PlayerError::SurfaceDetached`] if it is closed first.
    pub async fn wait_attached(&self) -> Result<()> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| *state != Attachment::Detached)
            .await
            .map(|state| *state)
            .map_err(|_| PlayerError::SurfaceDetached)?;

        match state {
            Attachment::Attached => Ok(()),
            _ => Err(PlayerError::SurfaceDetached),
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}
