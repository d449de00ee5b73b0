use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Antirrebote por reemplazo: cada llamada a `settle` toma un número de
/// generación, espera `delay` y sólo la más reciente responde `true`.
/// Las anteriores no se abortan, simplemente quedan obsoletas.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Espera el retardo y devuelve `true` si nadie llamó después.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
