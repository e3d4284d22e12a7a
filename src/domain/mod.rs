pub mod forecast;
pub mod observation;
pub mod status;
pub mod summary;

pub use forecast::*;
pub use observation::*;
pub use status::*;
pub use summary::*;
