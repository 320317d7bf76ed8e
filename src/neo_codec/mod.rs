//! Length-prefixed little-endian serialization used by every Neo structure.
//!
//! The codec is built around three pieces: [`Encoder`] and [`Decoder`] for
//! primitive little-endian and var-int I/O, and the [`NeoSerializable`]
//! contract implemented by every wire type in the crate.

pub use binary_decoder::Decoder;
pub use binary_encoder::Encoder;
pub use encode::{NeoSerializable, VarSizeTrait};
pub(crate) use encode::var_int_size;
pub use error::CodecError;

mod binary_decoder;
mod binary_encoder;
mod encode;
mod error;
