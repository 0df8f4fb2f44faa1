use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Versioned<T> {
    version: u64,
    value: T,
}

/// Snapshots waiting for listeners
///
/// At most one thread delivers at a time; others leave their snapshot in
/// `pending` and the running deliverer picks it up before it stops.
struct Delivery<T> {
    pending: Option<Versioned<T>>,
    delivered: u64,
    running: bool,
}

/// A value that tells its listeners when it changes
///
/// Every update is numbered under the value lock. Listeners are called
/// without any lock held and see versions in increasing order: a snapshot
/// older than one already handed out is dropped, and when several updates
/// land during one delivery only the newest is passed on. A listener may
/// read or update the observable again; a nested update is delivered after
/// the current one returns.
pub struct Observable<T> {
    value: Mutex<Versioned<T>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    delivery: Mutex<Delivery<T>>,
    next_id: AtomicU64,
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the deliverer role if a listener panics
struct DeliveryGuard<'a, T> {
    delivery: &'a Mutex<Delivery<T>>,
}

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            lock(self.delivery).running = false;
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(Versioned { version: 0, value }),
            listeners: Mutex::new(Vec::new()),
            delivery: Mutex::new(Delivery {
                pending: None,
                delivered: 0,
                running: false,
            }),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.value).value.clone()
    }

    /// Borrow the current value without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.value).value)
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Mutate the value and notify every listener
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, snapshot) = {
            let mut current = lock(&self.value);
            let result = f(&mut current.value);
            current.version += 1;
            (result, Versioned { version: current.version, value: current.value.clone() })
        };
        self.publish(snapshot);
        result
    }

    /// Mutate the value; listeners are only notified when `f` returns true
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let snapshot = {
            let mut current = lock(&self.value);
            if !f(&mut current.value) {
                return false;
            }
            current.version += 1;
            Versioned { version: current.version, value: current.value.clone() }
        };
        self.publish(snapshot);
        true
    }

    fn publish(&self, snapshot: Versioned<T>) {
        {
            let mut delivery = lock(&self.delivery);
            let superseded = snapshot.version <= delivery.delivered
                || delivery.pending.as_ref().is_some_and(|p| p.version >= snapshot.version);
            if superseded {
                return;
            }
            delivery.pending = Some(snapshot);
            if delivery.running {
                return;
            }
            delivery.running = true;
        }

        let _guard = DeliveryGuard { delivery: &self.delivery };
        loop {
            let next = {
                let mut delivery = lock(&self.delivery);
                match delivery.pending.take() {
                    Some(next) => {
                        delivery.delivered = next.version;
                        next
                    }
                    None => {
                        delivery.running = false;
                        return;
                    }
                }
            };

            let listeners: Vec<Listener<T>> = lock(&self.listeners)
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in listeners {
                listener(&next.value);
            }
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_update_notifies_with_snapshot() {
        let observable = Observable::new(0u32);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        observable.subscribe(move |v| sink.lock().unwrap().push(*v));

        observable.update(|v| *v += 1);
        observable.update(|v| *v += 2);

        assert_eq!(observable.get(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_update_if_false_is_silent() {
        let observable = Observable::new(String::from("a"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        observable.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!observable.update_if(|_| false));
        assert!(observable.update_if(|s| {
            s.push('b');
            true
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(observable.get(), "ab");
    }

    #[test]
    fn test_unsubscribe() {
        let observable = Observable::new(0u8);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = observable.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        observable.update(|v| *v = 1);
        assert!(observable.unsubscribe(id));
        assert!(!observable.unsubscribe(id));
        observable.update(|v| *v = 2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_update_delivered_after_current() {
        let observable = Arc::new(Observable::new(0u8));
        let inner = observable.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        observable.subscribe(move |v| {
            sink.lock().unwrap().push(*v);
            if *v == 1 {
                inner.update(|v| *v = 2);
            }
        });

        observable.update(|v| *v = 1);

        assert_eq!(observable.get(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_update_during_delivery_is_not_overtaken() {
        use std::sync::mpsc;

        let observable = Arc::new(Observable::new(0u8));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        observable.subscribe(move |v| {
            if *v == 1 {
                entered_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        observable.subscribe(move |v| sink.lock().unwrap().push(*v));

        let slow = observable.clone();
        let first = std::thread::spawn(move || slow.update(|v| *v = 1));
        entered_rx.recv().unwrap();

        // Returns at once; the thread already delivering hands it out next
        observable.update(|v| *v = 2);
        release_tx.send(()).unwrap();
        first.join().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_listener_may_read_back() {
        let observable = Arc::new(Observable::new(1u8));
        let inner = observable.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        observable.subscribe(move |_| {
            *sink.lock().unwrap() = Some(inner.get());
        });

        observable.update(|v| *v = 5);
        assert_eq!(*seen.lock().unwrap(), Some(5));
    }
}
