pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod hex;

pub use checksum::{RunningChecksum, xor_checksum};
pub use decoder::{DecodeFailure, DecoderState, FrameDecoder};
pub use encoder::{encode_frame, encode_valid_frame};
