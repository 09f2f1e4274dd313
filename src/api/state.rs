use derive_new::new;

use crate::database::Backend;

/// Shared state handed to every handler.
#[derive(Debug, Clone, new)]
pub struct App {
    pub database: Backend,
}
