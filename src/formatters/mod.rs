//! Built-in formatters.
//!
//! Primitives and other scalar types are registered explicitly by
//! [`register_builtins`]. Containers are generic: their [`YamlType`](crate::YamlType)
//! impls build a formatter per instantiation on first use.

mod arrays;
mod binary;
#[cfg(feature = "chrono")]
mod chrono_format;
mod collections;
mod decimal;
mod duration;
mod nullable;
mod primitive;
#[cfg(feature = "url")]
mod url_format;
#[cfg(feature = "uuid")]
mod uuid_format;

pub use binary::Binary;
pub use decimal::Decimal;

use crate::registry::FormatterRegistry;

pub(crate) fn register_builtins(registry: &mut FormatterRegistry) {
    primitive::register(registry);
    registry.register::<Binary>(binary::BinaryFormatter);
    registry.register::<Decimal>(decimal::DecimalFormatter);
    registry.register::<std::time::Duration>(duration::DurationFormatter);
    #[cfg(feature = "chrono")]
    chrono_format::register(registry);
    #[cfg(feature = "uuid")]
    registry.register::<uuid::Uuid>(uuid_format::UuidFormatter);
    #[cfg(feature = "url")]
    registry.register::<url::Url>(url_format::UrlFormatter);
}
