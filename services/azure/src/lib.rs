mod backend;
mod cancellation;
mod host;
mod recognize;
mod synthesize;

pub use backend::*;
pub use host::*;
pub use recognize::AzureRecognizer;
pub use synthesize::AzureSynthesizer;
