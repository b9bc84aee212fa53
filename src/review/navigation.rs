use std::cell::RefCell;

/// Routing collaborator.
pub trait Router {
    fn navigate(&self, path: &str);
}

/// Router for a single HTTP request: remembers the last navigation so the
/// handler can answer with a redirect.
#[derive(Debug, Default)]
pub struct RedirectRouter {
    target: RefCell<Option<String>>,
}

impl RedirectRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_target(&self) -> Option<String> {
        self.target.borrow_mut().take()
    }
}

impl Router for RedirectRouter {
    fn navigate(&self, path: &str) {
        *self.target.borrow_mut() = Some(path.to_string());
    }
}
