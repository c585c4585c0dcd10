//! Bounded pool of browser pages.
//!
//! Each concurrent extraction leases one page for exclusive use and
//! returns it when the lease drops, so no two workers ever share tab
//! state. The pool is generic over the driver type so tests can pool
//! scripted fakes.

use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

use tokio::sync::{Semaphore, SemaphorePermit};

use mapscout_core::AppConfig;

use crate::error::DriverError;
use crate::session::{BrowserSession, ChromePage};

pub struct PagePool<D = ChromePage> {
    pages: Mutex<Vec<D>>,
    slots: Semaphore,
}

impl<D> PagePool<D> {
    /// Build a pool over pre-constructed drivers.
    pub fn from_drivers(drivers: Vec<D>) -> Self {
        Self {
            slots: Semaphore::new(drivers.len()),
            pages: Mutex::new(drivers),
        }
    }

    /// Lease a page, waiting until one is free. The page returns to the
    /// pool when the lease drops.
    pub async fn acquire(&self) -> PageLease<'_, D> {
        let permit = self
            .slots
            .acquire()
            .await
            .expect("page pool semaphore is never closed");
        let page = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .expect("a permit guarantees a pooled page");
        PageLease {
            page: Some(page),
            pool: self,
            _permit: permit,
        }
    }
}

impl PagePool<ChromePage> {
    /// Open `size` fresh tabs on `session` and pool them.
    ///
    /// # Errors
    ///
    /// [`DriverError::Protocol`] when a tab cannot be created.
    pub async fn new(
        session: &BrowserSession,
        config: &AppConfig,
        size: usize,
    ) -> Result<Self, DriverError> {
        let mut pages = Vec::with_capacity(size);
        for _ in 0..size {
            pages.push(session.new_page(config).await?);
        }
        Ok(Self::from_drivers(pages))
    }

    /// Close every pooled tab. Best-effort: close failures are logged.
    pub async fn close(self) {
        let pages = self
            .pages
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for page in pages {
            if let Err(e) = page.close().await {
                tracing::warn!(error = %e, "pooled page close failed");
            }
        }
    }
}

/// Exclusive lease on one pooled page. Dereferences to the driver; the
/// page is pushed back into the pool on drop.
pub struct PageLease<'a, D> {
    page: Option<D>,
    pool: &'a PagePool<D>,
    _permit: SemaphorePermit<'a>,
}

impl<D> Deref for PageLease<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.page.as_ref().expect("page held until drop")
    }
}

impl<D> Drop for PageLease<'_, D> {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            self.pool
                .pages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(page);
        }
    }
}
