mod dga;

pub use dga::DgaGateway;
