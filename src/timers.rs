use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Deferred callbacks keyed by assignment name, at most one per key.
///
/// Each scheduled callback receives a token. When it wakes up it must claim
/// its slot with [`Timers::complete`] and do nothing if that fails: the
/// timer has been cancelled or replaced after its sleep ended.
#[derive(Debug, Default)]
pub struct Timers {
    next_token: u64,
    pending: HashMap<String, (u64, JoinHandle<()>)>,
}

#[allow(dead_code)]
impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    /// Schedule `callback` to run after `delay`, replacing any timer already
    /// registered for `key`. Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, key: &str, delay: Duration, callback: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel(key);
        self.next_token += 1;
        let token = self.next_token;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(token);
        });
        debug!(key, token, ?delay, "timer scheduled");
        self.pending.insert(key.to_owned(), (token, handle));
    }

    /// Abort the timer registered for `key`, if any.
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some((token, handle)) => {
                handle.abort();
                debug!(key, token, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Release the slot of a timer that fired. Returns `false` if `token` is
    /// no longer the live timer for `key`.
    pub fn complete(&mut self, key: &str, token: u64) -> bool {
        match self.pending.get(key) {
            Some(&(current, _)) if current == token => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
