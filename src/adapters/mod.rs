// Adapters layer: concrete implementations of the domain ports (remote API, file storage).

pub mod http;
pub mod storage;
