pub mod primitives;
pub mod registry;
pub mod traits;

pub use registry::SymbolRegistry;
pub use traits::Primitive;
