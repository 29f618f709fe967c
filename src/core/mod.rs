// Domain-layer modules and shared errors/models
pub mod visits {
    pub use crate::visits::*;
}

pub mod geo {
    pub use crate::geo::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
