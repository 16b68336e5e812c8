// OCR: trait-based abstraction over the external text recognition service.
//
// ProcessOcr shells out to an OCR script; HttpOcr calls a remote endpoint.
// The lookup pipeline only sees the OcrService trait.

pub mod http;
pub mod process;
pub mod traits;
