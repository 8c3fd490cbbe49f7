// Twitter API access: credentials, HTTP client, retry policy.
//
// Each submodule handles one concern of talking to the v1.1 REST API.

pub mod client;
pub mod credentials;
pub mod error;
pub mod retry;
