//! Material normalization.
//!
//! Every material kind is reduced to a [`MaterialDescriptor`] with a stable
//! set of kebab-case keys. Built-in kinds are matched exhaustively; kinds
//! added at runtime go through [`MaterialSerializerRegistry`].

mod descriptor;
mod registry;
pub mod serializers;

pub use descriptor::{ConfigValue, ConfigurationSection, MaterialDescriptor};
pub use registry::{MaterialSerializer, MaterialSerializerRegistry};
