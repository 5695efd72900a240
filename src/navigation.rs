#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Start {
        /// the target has work to resolve before it can be shown
        resolves: bool,
        /// an unload guard is active, completion will never be signalled
        unload_guarded: bool,
    },
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct LoadingState {
    loading: bool,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn handle(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::Start {
                resolves,
                unload_guarded,
            } => {
                if resolves && !unload_guarded {
                    self.loading = true;
                }
            }
            // a redirect can complete without ever announcing a resolve,
            // so always clear here
            NavigationEvent::Success | NavigationEvent::Error => self.loading = false,
        }
    }
}
