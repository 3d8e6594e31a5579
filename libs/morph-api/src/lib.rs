pub mod converter;
pub mod descriptor;
pub mod error;
pub mod value;

pub use converter::{Convert, ConvertExt, Converting};
pub use descriptor::TypeDescriptor;
pub use error::{BoxError, ConvertError, ErrorKind};
pub use value::Value;
