//! Port adapters backed by external libraries.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
