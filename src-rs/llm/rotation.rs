use std::sync::Mutex;

/// Round-robin over a provider's API keys, one key per request.
pub struct Rotator {
    keys: Vec<String>,
    next: Mutex<usize>,
}

impl Rotator {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            next: Mutex::new(0),
        }
    }

    pub fn next(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let mut idx = self.next.lock().ok()?;
        let key = self.keys[*idx].clone();
        *idx = (*idx + 1) % self.keys.len();
        Some(key)
    }
}
