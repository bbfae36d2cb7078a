mod adapter;
mod assembly;
mod error;
mod pipeline;
mod result;
mod temp_image;

pub use adapter::{DetectorAdapter, RawDetection};
pub use assembly::{Assembler, PositionedCharacter};
pub use error::{ErrorKind, RecognizeError};
pub use pipeline::Recognizer;
pub use result::{PlateResponse, RecognitionResult};
pub use temp_image::TempImage;
