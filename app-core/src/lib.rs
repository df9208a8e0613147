#![warn(clippy::all, rust_2018_idioms)]

//! Toolkit-free plumbing shared by the petro-chart crates: a queue of user
//! commands applied to an application state, JSON document storage and a
//! small helper to turn foreign errors into messages.

pub mod event;
pub mod storage;
pub mod string_error;
