pub mod client;
pub mod types;

pub use client::{ApiError, CountrySource, RestCountriesClient, DEFAULT_BASE_URL};
pub use types::{Country, CountryName, Currency, Flags, NativeName, UNKNOWN};
