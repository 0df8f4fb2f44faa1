/// Cleanup action returned by an effect's setup
pub type Teardown = Box<dyn FnOnce() + Send>;

/// A slot holding the teardown of the last setup that ran
///
/// Each `run` first tears down the previous setup, then runs the new one and
/// keeps whatever teardown it returns. Dropping the slot runs the pending
/// teardown.
#[derive(Default)]
pub struct Effect {
    teardown: Option<Teardown>,
}

impl Effect {
    pub fn new() -> Self {
        Self { teardown: None }
    }

    pub fn run<F>(&mut self, setup: F)
    where
        F: FnOnce() -> Option<Teardown>,
    {
        self.cleanup();
        self.teardown = setup();
    }

    /// Run the pending teardown, if any
    pub fn cleanup(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    #[cfg(test)]
    fn is_armed(&self) -> bool {
        self.teardown.is_some()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.cleanup();
    }
}
