pub mod layer;
pub mod policy;

pub use layer::admit;
pub use policy::{Admission, OriginPolicy, DEV_CLIENT_ORIGIN};
