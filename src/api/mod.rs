// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod sanitize {
    pub use crate::sanitize::*;
}

pub use crate::router;
