// 11.0: concurrency wrapper. the engine itself is single-threaded behind
// &mut self; SharedEngine serializes callers with a mutex so each closure
// runs as one atomic unit. lost-update races between concurrent requests are
// prevented here, not by optimistic checks inside the closures.

use crate::engine::Engine;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `f` with exclusive access to the engine. Everything inside the
    /// closure commits or fails as a single unit; interleaving happens only
    /// between closures, never within one.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::types::{Cash, Currency};
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn concurrent_credits_all_land() {
        let shared = SharedEngine::new(Engine::new(EngineConfig::default()));
        let user = shared.with(|e| e.create_account());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        shared.with(|e| {
                            let current = e.balance(user, Currency::Eur);
                            e.set_balance(user, Currency::Eur, current.add(Cash::new(dec!(1))))
                                .unwrap();
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let total = shared.with(|e| e.balance(user, Currency::Eur));
        assert_eq!(total.value(), dec!(800));
    }
}
