//! Reference-counted ownership of the engine mounted on one surface.
//!
//! Every mount of a player on a surface acquires an [`EngineLease`]. The
//! first lease creates the engine, later ones share it, and the engine is
//! disposed when the last lease is released. A mount/unmount/mount cycle
//! therefore never creates a second engine while the first is alive, and
//! concurrent acquisitions produce exactly one instance.

use super::engine::{EngineFactory, VideoEngine};
use super::surface::Surface;
use crate::error::Result;
use log::{debug, info};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SlotInner {
    engine: Option<Box<dyn VideoEngine>>,
    leases: usize,
    created: u64,
}

/// Engine holder for a single surface. Cheap to clone.
#[derive(Clone)]
pub struct EngineSlot {
    surface: Surface,
    factory: Arc<dyn EngineFactory>,
    inner: Arc<Mutex<SlotInner>>,
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EngineSlot")
            .field("surface", &self.surface.id())
            .field("live", &inner.engine.is_some())
            .field("leases", &inner.leases)
            .finish()
    }
}

impl EngineSlot {
    pub fn new(surface: Surface, factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            surface,
            factory,
            inner: Arc::new(Mutex::new(SlotInner::default())),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Wait for the surface to attach, then take a lease, creating the
    /// engine if none is live.
    pub async fn acquire(&self) -> Result<EngineLease> {
        self.surface.wait_attached().await?;

        let mut inner = self.inner.lock();
        if inner.engine.is_none() {
            let engine = self.factory.create(self.surface.id())?;
            inner.engine = Some(engine);
            inner.created += 1;
            info!("Created video engine on {}", self.surface.id());
        }
        inner.leases += 1;
        debug!(
            "Engine lease acquired on {} ({} held)",
            self.surface.id(),
            inner.leases
        );

        Ok(EngineLease {
            slot: self.clone(),
            released: false,
        })
    }

    /// Run `f` against the live engine, if any.
    pub fn with_engine<R>(
        &self,
        f: impl FnOnce(&mut dyn VideoEngine) -> R,
    ) -> Option<R> {
        let mut inner = self.inner.lock();
        match inner.engine.as_mut() {
            Some(engine) => Some(f(engine.as_mut())),
            None => None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.lock().engine.is_some()
    }

    pub fn lease_count(&self) -> usize {
        self.inner.lock().leases
    }

    /// Engines created over the slot's lifetime.
    pub fn created_count(&self) -> u64 {
        self.inner.lock().created
    }

    fn release_one(&self) {
        let engine = {
            let mut inner = self.inner.lock();
            inner.leases = inner.leases.saturating_sub(1);
            if inner.leases > 0 {
                debug!(
                    "Engine lease released on {} ({} still held)",
                    self.surface.id(),
                    inner.leases
                );
                return;
            }
            inner.engine.take()
        };

        if let Some(mut engine) = engine {
            engine.dispose();
            info!("Disposed video engine on {}", self.surface.id());
        }
    }
}

/// A share of the engine on a surface. Released explicitly or on drop.
pub struct EngineLease {
    slot: EngineSlot,
    released: bool,
}

impl fmt::Debug for EngineLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineLease")
            .field("surface", &self.slot.surface().id())
            .field("released", &self.released)
            .finish()
    }
}

impl EngineLease {
    pub fn with_engine<R>(
        &self,
        f: impl FnOnce(&mut dyn VideoEngine) -> R,
    ) -> Option<R> {
        self.slot.with_engine(f)
    }

    pub fn slot(&self) -> &EngineSlot {
        &self.slot
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.slot.release_one();
        }
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        self.release_inner();
    }
}
