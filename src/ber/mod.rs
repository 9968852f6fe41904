//! BER (Basic Encoding Rules) codec.
//!
//! Encoding uses a reverse buffer ([`EncodeBuf`]) so constructed types can be
//! wrapped without pre-computing content lengths. Decoding is a cursor over
//! `Bytes` ([`Decoder`]) with typed reads.

mod decode;
mod encode;
pub mod length;
pub mod tag;

pub use decode::Decoder;
pub use encode::EncodeBuf;
pub use length::{MAX_LENGTH, decode_length, encode_length};
