//! Authentication primitives.
//!
//! Login happens outside this service; requests carry an HS256 access token
//! whose subject is the member id. See [`jwt`].

pub mod jwt;
