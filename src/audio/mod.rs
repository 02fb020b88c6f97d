pub mod backend;
pub mod capture;
pub mod file;
pub mod mic;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use capture::{AudioBuffer, AudioCapture};
pub use file::FileBackend;
pub use mic::{MicBackend, MicProgram};
