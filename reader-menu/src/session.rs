pub trait Session: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// The viewer's signed-in state, fixed for the life of the menu.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewerSession {
    authenticated: bool,
}

impl ViewerSession {
    pub fn new(authenticated: bool) -> Self {
        ViewerSession { authenticated }
    }
}

impl Session for ViewerSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
