pub mod mocks;
pub mod strategies;
pub mod stub_endpoint;
