mod client;
mod types;

pub use client::ImageClient;
pub use types::{ImageAttachment, ImageOutcome, Txt2ImgRequest, Txt2ImgResponse, decode_image};
