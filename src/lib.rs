//! Ledger building blocks: fixed-width numbers, a canonical byte codec,
//! a null-padded Merkle tree and a proof-of-work challenge.

pub mod utils;
pub mod error;
pub mod buf;
pub mod hash;
pub mod number;
pub mod varint;
pub mod reader;
pub mod writer;
pub mod merkle;
pub mod compucha;
