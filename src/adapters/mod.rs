// Adapters layer: concrete implementations of the domain ports (HTTP services, CSV, storage).

pub mod csv_io;
pub mod nominatim;
pub mod storage;
pub mod viacep;

pub use nominatim::NominatimClient;
pub use storage::LocalStorage;
pub use viacep::ViaCepClient;
