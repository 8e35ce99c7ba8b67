//! The scanner suite.

pub mod ansible;
pub mod credentials;
pub mod dotnet;
pub mod license;
pub mod urls;
pub mod verbose;

pub use ansible::AnsibleScanner;
pub use credentials::CredentialsScanner;
pub use dotnet::DotNetScanner;
pub use license::LicenseScanner;
pub use urls::UrlsScanner;
pub use verbose::VerboseScanner;
