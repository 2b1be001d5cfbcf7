//! PGP Mailto - encrypted contact form endpoint
//!
//! Accepts a contact form submission, encrypts it to a fixed OpenPGP public
//! key and returns a `mailto:` link whose body is the armored ciphertext.
//! Nothing is sent or stored server-side.
//!
//! Pipeline, in order:
//! - [`request`]: field validation and recipient resolution
//! - [`keys`]: recipient key loading, re-read on every request
//! - [`envelope`]: plaintext composition
//! - [`engine`]: OpenPGP encryption
//! - [`normalize`]: armored ciphertext extraction and checking
//! - [`mailto`]: link composition
//!
//! [`handler`] sequences the steps and [`http`] adapts them to hyper.

pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod http;
pub mod keys;
pub mod mailto;
pub mod normalize;
pub mod request;

#[cfg(test)]
mod test_support;
